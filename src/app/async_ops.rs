//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and the worker
//! task that talks to the posts API.

use tokio::sync::mpsc;

use crate::api::{ApiError, HttpClient, PostApi};
use crate::composer::Payload;
use crate::models::Post;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Fetch the whole feed
    Load,
    /// Create a post from composer submission `ticket`
    Create { ticket: u64, payload: Payload },
    /// Update a post from composer submission `ticket`
    Update {
        id: i64,
        ticket: u64,
        payload: Payload,
    },
    /// Delete a post
    Delete { id: i64 },
    /// Like a post
    Like { id: i64 },
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// Feed fetched
    Loaded(Result<Vec<Post>, ApiError>),
    /// Post created
    Created {
        ticket: u64,
        result: Result<Post, ApiError>,
    },
    /// Post updated
    Updated {
        id: i64,
        ticket: u64,
        result: Result<Post, ApiError>,
    },
    /// Post deleted
    Deleted { id: i64, result: Result<(), ApiError> },
    /// Post liked
    Liked { id: i64, result: Result<Post, ApiError> },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

/// Spawn the async worker and return handles
pub fn spawn_worker(api: HttpClient) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            let Some(result) = execute(&api, cmd).await else {
                tracing::debug!("Worker shutting down");
                break;
            };
            if result_tx.send(result).await.is_err() {
                break;
            }
        }
    });

    AsyncHandle { cmd_tx, result_rx }
}

/// Run one command against the API; `None` means shut down
async fn execute(api: &HttpClient, cmd: AsyncCommand) -> Option<AsyncResult> {
    let result = match cmd {
        AsyncCommand::Shutdown => return None,
        AsyncCommand::Load => AsyncResult::Loaded(api.list_posts().await),
        AsyncCommand::Create { ticket, payload } => AsyncResult::Created {
            ticket,
            result: api.create_post(&payload).await,
        },
        AsyncCommand::Update {
            id,
            ticket,
            payload,
        } => AsyncResult::Updated {
            id,
            ticket,
            result: api.update_post(id, &payload).await,
        },
        AsyncCommand::Delete { id } => AsyncResult::Deleted {
            id,
            result: api.delete_post(id).await,
        },
        AsyncCommand::Like { id } => AsyncResult::Liked {
            id,
            result: api.like_post(id).await,
        },
    };
    Some(result)
}
