//! Post model as served by the feed API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A post in the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Server-assigned identifier
    pub id: i64,
    /// Text body (may be empty when media is attached)
    #[serde(default)]
    pub content: String,
    /// Image reference, absolute or relative to the media origin
    #[serde(default)]
    pub image_url: Option<String>,
    /// Video reference, absolute or relative to the media origin
    #[serde(default)]
    pub video_url: Option<String>,
    /// Server-computed like count
    #[serde(default)]
    pub likes: u32,
    /// When the post was created
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    /// When the post was last updated
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create an empty post with the given id, timestamped now
    pub fn new(id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            content: String::new(),
            image_url: None,
            video_url: None,
            likes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Image reference, if set and not blank
    pub fn image(&self) -> Option<&str> {
        non_blank(self.image_url.as_deref())
    }

    /// Video reference, if set and not blank
    pub fn video(&self) -> Option<&str> {
        non_blank(self.video_url.as_deref())
    }

    /// Whether the post carries any media
    pub fn has_media(&self) -> bool {
        self.image().is_some() || self.video().is_some()
    }

    /// Whether the post was edited after creation
    pub fn is_edited(&self) -> bool {
        self.updated_at.signed_duration_since(self.created_at).num_seconds() > 1
    }

    /// Get a short preview of the content (for list display)
    pub fn preview(&self, max_chars: usize) -> String {
        let content = self.content.replace('\n', " ");
        if content.chars().count() <= max_chars {
            content
        } else {
            let head: String = content.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{head}...")
        }
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        relative_to(self.created_at, Utc::now())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn relative_to(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(then);

    if duration.num_seconds() < 60 {
        format!("{}s", duration.num_seconds().max(0))
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d", duration.num_days())
    } else {
        then.format("%b %d").to_string()
    }
}

/// Accepts RFC 3339 as well as zone-less ISO date-times, which are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
