//! Feed list controller
//!
//! Owns the ordered list of posts for the session and keeps it in step with
//! the outcome of each API call. Every mutation trusts its own response;
//! the list is never re-fetched behind the user's back.
//!
//! The `apply_*` transitions are synchronous so the TUI can feed them the
//! results its worker receives. The `async` methods call a [`PostApi`] and
//! apply in one go.

use crate::api::{ApiError, PostApi};
use crate::composer::Payload;
use crate::models::Post;

/// Load state of the list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedState {
    /// Fetch in flight; the list is hidden until it settles
    #[default]
    Loading,
    /// At least one post
    Ready,
    /// Loaded, no posts
    Empty,
    /// Fetch failed; shown as an empty feed
    Failed(String),
}

/// A user-visible outcome of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Operation succeeded
    Info(String),
    /// Operation failed; local state is unchanged
    Error(String),
}

impl Notice {
    /// Text of the notice
    pub fn message(&self) -> &str {
        match self {
            Self::Info(m) | Self::Error(m) => m,
        }
    }

    /// Whether this reports a failure
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Ordered, newest-first list of posts
#[derive(Debug, Clone, Default)]
pub struct FeedList {
    posts: Vec<Post>,
    state: FeedState,
}

impl FeedList {
    /// Empty list waiting for its first load
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts in display order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Current load state
    pub const fn state(&self) -> &FeedState {
        &self.state
    }

    /// Whether a fetch is in flight
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FeedState::Loading)
    }

    /// Number of posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether there are no posts
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Look up a post by id
    pub fn get(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Position of a post in the list
    pub fn position(&self, id: i64) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    /// Enter the loading state ahead of a (re)load
    pub fn begin_load(&mut self) {
        self.state = FeedState::Loading;
    }

    /// Replace the list wholesale with the result of a fetch
    pub fn apply_loaded(&mut self, result: Result<Vec<Post>, ApiError>) -> Notice {
        match result {
            Ok(posts) => {
                self.posts = posts;
                self.settle();
                Notice::Info(format!("Loaded {} posts", self.posts.len()))
            }
            Err(e) => {
                tracing::warn!("Loading posts failed: {e}");
                self.posts.clear();
                self.state = FeedState::Failed(e.user_message());
                Notice::Error(format!("Could not load posts: {}", e.user_message()))
            }
        }
    }

    /// Prepend a newly created post
    pub fn apply_created(&mut self, result: Result<Post, ApiError>) -> Notice {
        match result {
            Ok(post) => {
                self.posts.insert(0, post);
                self.settle();
                Notice::Info("Posted".to_string())
            }
            Err(e) => failure("create the post", &e),
        }
    }

    /// Replace the post with `id` in place
    pub fn apply_updated(&mut self, id: i64, result: Result<Post, ApiError>) -> Notice {
        match result {
            Ok(post) => {
                self.replace(id, post);
                Notice::Info("Post updated".to_string())
            }
            Err(e) => failure("update the post", &e),
        }
    }

    /// Drop the post with `id`
    pub fn apply_removed(&mut self, id: i64, result: Result<(), ApiError>) -> Notice {
        match result {
            Ok(()) => {
                self.posts.retain(|p| p.id != id);
                self.settle();
                Notice::Info("Post deleted".to_string())
            }
            Err(e) => failure("delete the post", &e),
        }
    }

    /// Replace the post with `id` with the server's liked copy
    pub fn apply_liked(&mut self, id: i64, result: Result<Post, ApiError>) -> Notice {
        match result {
            Ok(post) => {
                let likes = post.likes;
                self.replace(id, post);
                Notice::Info(format!("Liked ({likes})"))
            }
            Err(e) => failure("like the post", &e),
        }
    }

    /// Fetch the whole feed
    pub async fn load(&mut self, api: &impl PostApi) -> Notice {
        self.begin_load();
        let result = api.list_posts().await;
        self.apply_loaded(result)
    }

    /// Create a post
    pub async fn create(&mut self, api: &impl PostApi, payload: &Payload) -> Notice {
        let result = api.create_post(payload).await;
        self.apply_created(result)
    }

    /// Update a post
    pub async fn update(&mut self, api: &impl PostApi, id: i64, payload: &Payload) -> Notice {
        let result = api.update_post(id, payload).await;
        self.apply_updated(id, result)
    }

    /// Delete a post
    pub async fn remove(&mut self, api: &impl PostApi, id: i64) -> Notice {
        let result = api.delete_post(id).await;
        self.apply_removed(id, result)
    }

    /// Like a post
    pub async fn like(&mut self, api: &impl PostApi, id: i64) -> Notice {
        let result = api.like_post(id).await;
        self.apply_liked(id, result)
    }

    fn replace(&mut self, id: i64, post: Post) {
        match self.posts.iter_mut().find(|p| p.id == id) {
            Some(slot) => *slot = post,
            None => tracing::debug!("Post {id} no longer in the list, dropping response"),
        }
    }

    fn settle(&mut self) {
        self.state = if self.posts.is_empty() {
            FeedState::Empty
        } else {
            FeedState::Ready
        };
    }
}

fn failure(action: &str, err: &ApiError) -> Notice {
    tracing::warn!("Failed to {action}: {err}");
    Notice::Error(format!("Failed to {action}: {}", err.user_message()))
}
