//! Media references: attachment slots, local files, video links

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;
use thiserror::Error;
use url::Url;

/// One of the two media attachments a post can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaSlot {
    /// Image attachment
    Image,
    /// Video attachment
    Video,
}

impl MediaSlot {
    /// Both slots, in display order
    pub const fn all() -> [Self; 2] {
        [Self::Image, Self::Video]
    }

    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
        }
    }

    /// Multipart field name for an uploaded file
    pub const fn file_field(&self) -> &'static str {
        match self {
            Self::Image => "imageFile",
            Self::Video => "videoFile",
        }
    }

    /// Field name for a linked URL
    pub const fn url_field(&self) -> &'static str {
        match self {
            Self::Image => "imageUrl",
            Self::Video => "videoUrl",
        }
    }

    /// Field name for the removal flag
    pub const fn remove_field(&self) -> &'static str {
        match self {
            Self::Image => "removeImage",
            Self::Video => "removeVideo",
        }
    }
}

/// Broad media type declared for a local file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Image (JPEG, PNG, GIF, WebP)
    Image,
    /// Video (MP4, WebM, MOV)
    Video,
    /// Anything else
    Other,
}

/// Errors raised while selecting a local file
#[derive(Debug, Error)]
pub enum FileError {
    /// Path does not exist or cannot be read
    #[error("cannot read {path}: {source}")]
    Unreadable {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Path exists but is not a regular file
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
}

/// A file picked from the local filesystem, with its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// Location on disk
    pub path: PathBuf,
    /// File name sent with the upload
    pub file_name: String,
    /// Declared media type (from the extension)
    pub mime: mime::Mime,
    /// Size in bytes at selection time
    pub size: u64,
}

impl LocalFile {
    /// Select a file, checking that it exists and is a regular file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|source| FileError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Ok(Self::with_size(path, metadata.len()))
    }

    /// Describe a file without touching the filesystem
    pub fn with_size(path: impl AsRef<Path>, size: u64) -> Self {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            path: path.to_path_buf(),
            mime: mime_for_path(path),
            file_name,
            size,
        }
    }

    /// Broad media type
    pub fn kind(&self) -> MediaKind {
        let top = self.mime.type_();
        if top == mime::IMAGE {
            MediaKind::Image
        } else if top == mime::VIDEO {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }

    /// Whether a preview line should be shown for this file
    pub fn is_image(&self) -> bool {
        self.kind() == MediaKind::Image
    }

    /// Human readable size
    pub fn size_label(&self) -> String {
        const KIB: u64 = 1024;
        const MIB: u64 = KIB * 1024;
        if self.size >= MIB {
            format!("{:.1} MB", self.size as f64 / MIB as f64)
        } else if self.size >= KIB {
            format!("{:.1} KB", self.size as f64 / KIB as f64)
        } else {
            format!("{} B", self.size)
        }
    }
}

fn mime_for_path(path: &Path) -> mime::Mime {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let declared = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    declared.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

/// Resolve a media reference for display: absolute URLs pass through,
/// anything else is joined onto the media origin.
pub fn resolve_media_url(reference: &str, media_base: &str) -> String {
    let reference = reference.trim();
    if Url::parse(reference).is_ok_and(|u| u.has_host()) {
        return reference.to_string();
    }
    match Url::parse(media_base).and_then(|base| base.join(reference)) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!("Could not resolve media reference {reference}: {e}");
            format!("{}/{}", media_base.trim_end_matches('/'), reference.trim_start_matches('/'))
        }
    }
}

/// How a video reference should be presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLink {
    /// YouTube video, normalised to its embed URL
    YouTube {
        /// Embeddable player URL
        embed_url: String,
    },
    /// Facebook video, pointed at the video plugin
    Facebook {
        /// Embeddable player URL
        embed_url: String,
    },
    /// Plain video file
    Direct {
        /// Resolved file URL
        url: String,
    },
}

fn youtube_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").ok())
        .as_ref()
}

impl VideoLink {
    /// Classify a stored video reference
    pub fn classify(reference: &str, media_base: &str) -> Self {
        let reference = reference.trim();
        if reference.contains("youtube.com") || reference.contains("youtu.be") {
            Self::YouTube {
                embed_url: youtube_embed_url(reference),
            }
        } else if reference.contains("facebook.com") || reference.contains("fb.watch") {
            Self::Facebook {
                embed_url: reference.replacen("facebook.com", "facebook.com/plugins/video.php", 1),
            }
        } else {
            Self::Direct {
                url: resolve_media_url(reference, media_base),
            }
        }
    }

    /// URL to open for this video
    pub fn url(&self) -> &str {
        match self {
            Self::YouTube { embed_url } | Self::Facebook { embed_url } => embed_url,
            Self::Direct { url } => url,
        }
    }

    /// Short label for the card
    pub const fn label(&self) -> &'static str {
        match self {
            Self::YouTube { .. } => "YouTube video",
            Self::Facebook { .. } => "Facebook video",
            Self::Direct { .. } => "Video",
        }
    }
}

fn youtube_embed_url(reference: &str) -> String {
    if let Some((_, rest)) = reference.split_once("youtu.be/") {
        let id = rest.split(['?', '#', '&']).next().unwrap_or_default();
        return format!("https://www.youtube.com/embed/{id}");
    }
    youtube_id_pattern()
        .and_then(|re| re.captures(reference))
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|id| id.len() == 11)
        .map_or_else(
            || reference.to_string(),
            |id| format!("https://www.youtube.com/embed/{id}"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080";

    #[test]
    fn test_resolve_relative_reference() {
        assert_eq!(
            resolve_media_url("/uploads/a.png", BASE),
            "http://localhost:8080/uploads/a.png"
        );
        assert_eq!(
            resolve_media_url("http://x/a.png", BASE),
            "http://x/a.png"
        );
    }

    #[test]
    fn test_youtube_links() {
        let short = VideoLink::classify("https://youtu.be/dQw4w9WgXcQ?t=3", BASE);
        assert_eq!(short.url(), "https://www.youtube.com/embed/dQw4w9WgXcQ");

        let long = VideoLink::classify("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=x", BASE);
        assert_eq!(long.url(), "https://www.youtube.com/embed/dQw4w9WgXcQ");

        // Ids of the wrong length are left untouched
        let odd = VideoLink::classify("https://www.youtube.com/watch?v=abc", BASE);
        assert_eq!(odd.url(), "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_facebook_and_direct_links() {
        let fb = VideoLink::classify("https://www.facebook.com/watch/?v=42", BASE);
        assert_eq!(fb.label(), "Facebook video");
        assert_eq!(fb.url(), "https://www.facebook.com/plugins/video.php/watch/?v=42");

        let direct = VideoLink::classify("/uploads/clip.mp4", BASE);
        assert_eq!(
            direct,
            VideoLink::Direct {
                url: "http://localhost:8080/uploads/clip.mp4".to_string()
            }
        );
    }

    #[test]
    fn test_declared_media_type() {
        let image = LocalFile::with_size("/tmp/Cat.JPG", 2048);
        assert_eq!(image.file_name, "Cat.JPG");
        assert_eq!(image.mime, mime::IMAGE_JPEG);
        assert!(image.is_image());
        assert_eq!(image.size_label(), "2.0 KB");

        let video = LocalFile::with_size("clip.webm", 10);
        assert_eq!(video.kind(), MediaKind::Video);
        assert!(!video.is_image());

        let other = LocalFile::with_size("notes.txt", 10);
        assert_eq!(other.mime, mime::APPLICATION_OCTET_STREAM);
    }

    #[test]
    fn test_open_rejects_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LocalFile::open(dir.path()),
            Err(FileError::NotAFile(_))
        ));
        assert!(matches!(
            LocalFile::open(dir.path().join("missing.png")),
            Err(FileError::Unreadable { .. })
        ));

        let path = dir.path().join("pic.png");
        std::fs::write(&path, [0u8; 12]).unwrap();
        let file = LocalFile::open(&path).unwrap();
        assert_eq!(file.size, 12);
        assert_eq!(file.mime, mime::IMAGE_PNG);
    }
}
