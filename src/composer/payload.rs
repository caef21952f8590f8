//! Payload construction: validation and the media precedence policy
//!
//! Everything here is pure so the submission rules can be tested without a
//! terminal or a server.

use serde::Serialize;
use thiserror::Error;

use super::{ComposeMode, Draft, SlotDraft};
use crate::models::{LocalFile, MediaSlot};

/// Client-side validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No text and no media in any channel
    #[error("Write something or attach an image or video first")]
    Empty,
}

/// What a submission says about one media slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaField {
    /// Field omitted (nothing attached, or leave unchanged when editing)
    Absent,
    /// Link to remote media, carried verbatim
    Url(String),
    /// Upload a local file
    File(LocalFile),
    /// Drop the existing media (edit only)
    Remove,
}

/// Decide what a slot contributes to the payload.
///
/// Precedence is remove > file > URL > absent. A URL typed in the other
/// channel stays in the draft but is ignored while a file is selected.
/// Removal is only meaningful when editing an existing post.
pub fn resolve_slot(slot: &SlotDraft, mode: ComposeMode) -> MediaField {
    if slot.remove && mode.is_edit() {
        MediaField::Remove
    } else if let Some(file) = &slot.file {
        MediaField::File(file.clone())
    } else if !slot.url.trim().is_empty() {
        MediaField::Url(slot.url.clone())
    } else {
        MediaField::Absent
    }
}

/// Structured body, also used for the text fields of a multipart upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    /// Text body
    pub content: String,
    /// Linked image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Linked video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Remove the existing image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_image: Option<bool>,
    /// Remove the existing video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_video: Option<bool>,
}

impl PostBody {
    /// Plain text-only body
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Text form fields in wire order
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("content", self.content.clone())];
        if let Some(url) = &self.image_url {
            fields.push((MediaSlot::Image.url_field(), url.clone()));
        }
        if let Some(url) = &self.video_url {
            fields.push((MediaSlot::Video.url_field(), url.clone()));
        }
        if let Some(remove) = self.remove_image {
            fields.push((MediaSlot::Image.remove_field(), remove.to_string()));
        }
        if let Some(remove) = self.remove_video {
            fields.push((MediaSlot::Video.remove_field(), remove.to_string()));
        }
        fields
    }

    fn set(&mut self, slot: MediaSlot, field: &MediaField) {
        let (url, remove) = match slot {
            MediaSlot::Image => (&mut self.image_url, &mut self.remove_image),
            MediaSlot::Video => (&mut self.video_url, &mut self.remove_video),
        };
        match field {
            MediaField::Url(value) => *url = Some(value.clone()),
            MediaField::Remove => *remove = Some(true),
            MediaField::File(_) | MediaField::Absent => {}
        }
    }
}

/// Body for a submission that uploads at least one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    /// Text fields
    pub fields: PostBody,
    /// Image upload
    pub image_file: Option<LocalFile>,
    /// Video upload
    pub video_file: Option<LocalFile>,
}

impl MultipartBody {
    /// Files to attach, with their field names
    pub fn files(&self) -> impl Iterator<Item = (MediaSlot, &LocalFile)> {
        [
            (MediaSlot::Image, self.image_file.as_ref()),
            (MediaSlot::Video, self.video_file.as_ref()),
        ]
        .into_iter()
        .filter_map(|(slot, file)| file.map(|f| (slot, f)))
    }
}

/// Outbound payload, encoded the way the server must read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// JSON object, no binary content
    Structured(PostBody),
    /// multipart/form-data with one or more file parts
    Multipart(MultipartBody),
}

impl Payload {
    /// Whether the payload needs multipart encoding
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Text fields shared by both encodings
    pub const fn body(&self) -> &PostBody {
        match self {
            Self::Structured(body) => body,
            Self::Multipart(multipart) => &multipart.fields,
        }
    }
}

/// Validate a draft and build its payload.
///
/// Fails without side effects when the trimmed text is empty and neither
/// slot would leave media on the post (nothing set, or marked for removal).
pub fn validate_and_build(draft: &Draft, mode: ComposeMode) -> Result<Payload, ValidationError> {
    if draft.is_blank(mode) {
        return Err(ValidationError::Empty);
    }

    let mut fields = PostBody::text(draft.text.clone());
    let mut image_file = None;
    let mut video_file = None;

    for slot in MediaSlot::all() {
        let field = resolve_slot(draft.slot(slot), mode);
        fields.set(slot, &field);
        if let MediaField::File(file) = field {
            match slot {
                MediaSlot::Image => image_file = Some(file),
                MediaSlot::Video => video_file = Some(file),
            }
        }
    }

    if image_file.is_some() || video_file.is_some() {
        Ok(Payload::Multipart(MultipartBody {
            fields,
            image_file,
            video_file,
        }))
    } else {
        Ok(Payload::Structured(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> LocalFile {
        LocalFile::with_size("/tmp/a.png", 10)
    }

    fn video() -> LocalFile {
        LocalFile::with_size("/tmp/b.mp4", 10)
    }

    const EDIT: ComposeMode = ComposeMode::Edit { post_id: 1 };

    #[test]
    fn test_empty_and_whitespace_drafts_fail() {
        let mut draft = Draft::default();
        assert_eq!(
            validate_and_build(&draft, ComposeMode::Create),
            Err(ValidationError::Empty)
        );

        draft.text = "  \n\t ".to_string();
        draft.image.url = "   ".to_string();
        assert_eq!(
            validate_and_build(&draft, ComposeMode::Create),
            Err(ValidationError::Empty)
        );
    }

    #[test]
    fn test_remove_flag_alone_is_not_content() {
        let mut draft = Draft::default();
        draft.image.remove = true;
        assert_eq!(validate_and_build(&draft, EDIT), Err(ValidationError::Empty));
    }

    #[test]
    fn test_removed_seeded_url_is_not_content() {
        let mut draft = Draft::default();
        draft.image.url = "/uploads/a.png".to_string();
        draft.image.remove = true;
        assert_eq!(validate_and_build(&draft, EDIT), Err(ValidationError::Empty));

        // Still counts once the removal is undone
        draft.image.remove = false;
        let payload = validate_and_build(&draft, EDIT).unwrap();
        assert_eq!(payload.body().image_url.as_deref(), Some("/uploads/a.png"));
    }

    #[test]
    fn test_single_file_forces_multipart() {
        for slot in MediaSlot::all() {
            let mut draft = Draft::default();
            let file = match slot {
                MediaSlot::Image => image(),
                MediaSlot::Video => video(),
            };
            draft.slot_mut(slot).file = Some(file.clone());

            let Payload::Multipart(body) = validate_and_build(&draft, ComposeMode::Create).unwrap()
            else {
                panic!("expected multipart for {slot:?}");
            };
            let files: Vec<_> = body.files().collect();
            assert_eq!(files, vec![(slot, &file)]);
            assert_eq!(body.fields.content, "");
        }
    }

    #[test]
    fn test_urls_only_stay_structured_and_verbatim() {
        let mut draft = Draft::default();
        draft.image.url = " http://x/a.png".to_string();
        draft.video.url = "https://youtu.be/dQw4w9WgXcQ".to_string();

        let payload = validate_and_build(&draft, ComposeMode::Create).unwrap();
        assert!(!payload.is_multipart());
        assert_eq!(
            payload,
            Payload::Structured(PostBody {
                content: String::new(),
                image_url: Some(" http://x/a.png".to_string()),
                video_url: Some("https://youtu.be/dQw4w9WgXcQ".to_string()),
                remove_image: None,
                remove_video: None,
            })
        );
    }

    #[test]
    fn test_file_beats_url_in_same_slot() {
        let mut draft = Draft::default();
        draft.image.url = "http://x/a.png".to_string();
        draft.image.file = Some(image());
        draft.video.url = "http://x/v.mp4".to_string();

        assert_eq!(resolve_slot(&draft.image, ComposeMode::Create), MediaField::File(image()));

        let Payload::Multipart(body) = validate_and_build(&draft, ComposeMode::Create).unwrap() else {
            panic!("expected multipart");
        };
        assert_eq!(body.image_file, Some(image()));
        assert_eq!(body.fields.image_url, None);
        // The other slot still travels as a URL field
        assert_eq!(body.fields.video_url.as_deref(), Some("http://x/v.mp4"));
    }

    #[test]
    fn test_remove_only_applies_when_editing() {
        let mut draft = Draft::default();
        draft.text = "edited".to_string();
        draft.image.remove = true;
        draft.image.url = "http://x/old.png".to_string();

        let edit = validate_and_build(&draft, EDIT).unwrap();
        assert_eq!(edit.body().remove_image, Some(true));
        assert_eq!(edit.body().image_url, None);

        let create = validate_and_build(&draft, ComposeMode::Create).unwrap();
        assert_eq!(create.body().remove_image, None);
        assert_eq!(create.body().image_url.as_deref(), Some("http://x/old.png"));
    }

    #[test]
    fn test_body_serialization_uses_wire_names() {
        let body = PostBody {
            content: "edited".to_string(),
            remove_image: Some(true),
            ..PostBody::default()
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"content": "edited", "removeImage": true}));
        assert_eq!(
            body.form_fields(),
            vec![("content", "edited".to_string()), ("removeImage", "true".to_string())]
        );
    }
}
