//! Remote posts API

pub mod http;

use std::path::PathBuf;

use thiserror::Error;

use crate::composer::Payload;
use crate::models::Post;

pub use http::HttpClient;

/// Failures talking to the posts API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never produced a response
    #[error("Network error: {0}")]
    Transport(String),
    /// Server answered with a non-success status
    #[error("Server returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable message from the response body, if any
        message: Option<String>,
    },
    /// Response body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
    /// A file selected for upload could not be read
    #[error("Cannot read {}: {reason}", .path.display())]
    File {
        /// Selected path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },
}

impl ApiError {
    /// Message to show the user, preferring the server's own wording
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// The remote API collaborator
#[allow(async_fn_in_trait)]
pub trait PostApi {
    /// Fetch the whole feed
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// Create a post
    async fn create_post(&self, payload: &Payload) -> Result<Post, ApiError>;

    /// Update a post
    async fn update_post(&self, id: i64, payload: &Payload) -> Result<Post, ApiError>;

    /// Delete a post
    async fn delete_post(&self, id: i64) -> Result<(), ApiError>;

    /// Like a post, returning it with the server-computed count
    async fn like_post(&self, id: i64) -> Result<Post, ApiError>;
}
