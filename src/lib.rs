//! # Murmur 🗨
//!
//! A terminal client for a self-hosted posts feed.
//!
//! ## Overview
//!
//! Murmur reads, writes, edits, likes and deletes short posts on a feed
//! served over HTTP. Posts carry text and optionally an image and a video,
//! either uploaded from a local file or linked by URL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │   Draw loop, key handling, async worker for API requests    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │    Composer     │ │      Feed       │ │     Config      │
//! │                 │ │                 │ │                 │
//! │ • Draft / seed  │ │ • Post list     │ │ • API endpoint  │
//! │ • Upload or URL │ │ • Load state    │ │ • Media origin  │
//! │ • Payload build │ │ • Notices       │ │ • Theme         │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │
//!          └─────────┬─────────┘
//!                    ▼
//! ┌─────────────────┐ ┌─────────────────┐
//! │       API       │ │     Models      │
//! │                 │ │                 │
//! │ • PostApi trait │ │ • Post          │
//! │ • HTTP client   │ │ • Media slots   │
//! │ • ApiError      │ │ • Video links   │
//! └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Posts API trait and its HTTP client
//! - [`app`]: TUI application state and event loop
//! - [`composer`]: Create/edit state machine and payload policy
//! - [`config`]: Configuration management
//! - [`feed`]: Feed list controller
//! - [`models`]: Data models (Post, media references)
//! - [`theme`]: Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use murmur::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/murmur/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::if_not_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod app;
pub mod composer;
pub mod config;
pub mod feed;
pub mod models;
pub mod paths;
pub mod theme;

// Re-export main types for convenience
pub use api::{ApiError, HttpClient, PostApi};
pub use app::AppState;
pub use composer::{Composer, Payload};
pub use config::Config;
pub use feed::{FeedList, FeedState, Notice};
pub use models::Post;
pub use theme::{Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// ASCII logo for the application
pub const LOGO: &str = r"
  _ __ ___  _   _ _ __ _ __ ___  _   _ _ __
 | '_ ` _ \| | | | '__| '_ ` _ \| | | | '__|
 | | | | | | |_| | |  | | | | | | |_| | |
 |_| |_| |_|\__,_|_|  |_| |_| |_|\__,_|_|
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
