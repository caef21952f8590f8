//! Data models for Murmur

mod media;
mod post;

pub use media::{FileError, LocalFile, MediaKind, MediaSlot, VideoLink, resolve_media_url};
pub use post::Post;
