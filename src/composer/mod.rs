//! Post composer: the create/edit data-entry flow
//!
//! The composer owns a [`Draft`] while it is open and never talks to the
//! network. [`Composer::submit`] hands back a [`Submission`]; the caller
//! sends its payload and reports the outcome through [`Composer::finish`]
//! with the submission's ticket.

mod payload;

pub use payload::{
    MediaField, MultipartBody, Payload, PostBody, ValidationError, resolve_slot,
    validate_and_build,
};

use thiserror::Error;

use crate::models::{LocalFile, MediaSlot, Post};

/// Input channel for media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// Pick a local file
    #[default]
    Upload,
    /// Type a remote URL
    Url,
}

impl Channel {
    /// The other channel
    pub const fn toggle(self) -> Self {
        match self {
            Self::Upload => Self::Url,
            Self::Url => Self::Upload,
        }
    }

    /// Tab label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Url => "URL",
        }
    }
}

/// Whether the composer creates a new post or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// New post
    #[default]
    Create,
    /// Existing post
    Edit {
        /// Target post
        post_id: i64,
    },
}

impl ComposeMode {
    /// Whether an existing post is being edited
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Edit { .. })
    }

    /// Target post, if editing
    pub const fn post_id(self) -> Option<i64> {
        match self {
            Self::Create => None,
            Self::Edit { post_id } => Some(post_id),
        }
    }
}

/// Draft state for one media slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotDraft {
    /// Pending local file
    pub file: Option<LocalFile>,
    /// URL text (kept even while a file is selected)
    pub url: String,
    /// Drop the existing media on save
    pub remove: bool,
}

impl SlotDraft {
    /// Channel whose value will be submitted for this slot
    pub const fn active_channel(&self) -> Channel {
        if self.file.is_some() {
            Channel::Upload
        } else {
            Channel::Url
        }
    }
}

/// Uncommitted composer state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Text body
    pub text: String,
    /// Image slot
    pub image: SlotDraft,
    /// Video slot
    pub video: SlotDraft,
}

impl Draft {
    /// Draft pre-filled from an existing post (files are never pre-filled)
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.content.clone(),
            image: SlotDraft {
                url: post.image_url.clone().unwrap_or_default(),
                ..SlotDraft::default()
            },
            video: SlotDraft {
                url: post.video_url.clone().unwrap_or_default(),
                ..SlotDraft::default()
            },
        }
    }

    /// Slot state
    pub const fn slot(&self, slot: MediaSlot) -> &SlotDraft {
        match slot {
            MediaSlot::Image => &self.image,
            MediaSlot::Video => &self.video,
        }
    }

    /// Mutable slot state
    pub const fn slot_mut(&mut self, slot: MediaSlot) -> &mut SlotDraft {
        match slot {
            MediaSlot::Image => &mut self.image,
            MediaSlot::Video => &mut self.video,
        }
    }

    /// No text, and no slot that would leave media on the post
    pub fn is_blank(&self, mode: ComposeMode) -> bool {
        self.text.trim().is_empty()
            && MediaSlot::all().into_iter().all(|slot| {
                matches!(
                    resolve_slot(self.slot(slot), mode),
                    MediaField::Absent | MediaField::Remove
                )
            })
    }
}

/// Why a submission was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Draft failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A previous submission is still awaiting its response
    #[error("Still saving the previous submission")]
    Pending,
    /// Nothing is being composed
    #[error("Composer is not open")]
    Closed,
}

/// An accepted submission, awaiting its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Identifies this submission when its outcome is reported
    pub ticket: u64,
    /// Request body to send
    pub payload: Payload,
}

/// The create/edit state machine
#[derive(Debug, Clone, Default)]
pub struct Composer {
    mode: ComposeMode,
    seed: Draft,
    draft: Draft,
    tab: Channel,
    open: bool,
    pending: bool,
    ticket: u64,
}

impl Composer {
    /// Create a closed composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Open with an empty draft, or seeded from `post` for editing
    pub fn open(&mut self, seed: Option<&Post>) {
        let (mode, seed) = match seed {
            Some(post) => (ComposeMode::Edit { post_id: post.id }, Draft::from_post(post)),
            None => (ComposeMode::Create, Draft::default()),
        };
        tracing::debug!("Opening composer in {mode:?}");
        self.mode = mode;
        self.draft = seed.clone();
        self.seed = seed;
        self.tab = Channel::Upload;
        self.open = true;
        self.pending = false;
    }

    /// Whether a draft is being composed
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether a submission is awaiting its response
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Create or edit
    pub const fn mode(&self) -> ComposeMode {
        self.mode
    }

    /// Current draft
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Visible input tab
    pub const fn tab(&self) -> Channel {
        self.tab
    }

    /// Replace the text body
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.draft.text = value.into();
    }

    /// Attach a local file to a slot; the slot's URL is kept but inert.
    ///
    /// A replacement file cancels a pending removal of the slot.
    pub fn select_file(&mut self, slot: MediaSlot, file: LocalFile) {
        tracing::debug!("Selected {} for {}", file.file_name, slot.label());
        let state = self.draft.slot_mut(slot);
        state.file = Some(file);
        state.remove = false;
    }

    /// Drop a slot's file, making its URL eligible again
    pub fn clear_file(&mut self, slot: MediaSlot) {
        self.draft.slot_mut(slot).file = None;
    }

    /// Set a slot's URL text
    pub fn set_url(&mut self, slot: MediaSlot, value: impl Into<String>) {
        self.draft.slot_mut(slot).url = value.into();
    }

    /// Switch the visible tab; entered values are left alone
    pub fn switch_channel(&mut self, tab: Channel) {
        self.tab = tab;
    }

    /// Toggle removal of a slot's existing media (edit only)
    pub fn toggle_remove(&mut self, slot: MediaSlot) -> bool {
        if !self.mode.is_edit() {
            return false;
        }
        let state = self.draft.slot_mut(slot);
        state.remove = !state.remove;
        state.remove
    }

    /// Validate and build the payload.
    ///
    /// On success the composer stays open and becomes pending until
    /// [`Composer::finish`] is called with the returned ticket.
    pub fn submit(&mut self) -> Result<Submission, SubmitError> {
        if !self.open {
            return Err(SubmitError::Closed);
        }
        if self.pending {
            return Err(SubmitError::Pending);
        }
        let payload = validate_and_build(&self.draft, self.mode)?;
        self.ticket += 1;
        self.pending = true;
        Ok(Submission {
            ticket: self.ticket,
            payload,
        })
    }

    /// Whether `ticket` belongs to the submission currently awaiting a response
    pub const fn awaits(&self, ticket: u64) -> bool {
        self.pending && self.ticket == ticket
    }

    /// Report the outcome of the network call for submission `ticket`.
    ///
    /// Outcomes of cancelled or superseded submissions are ignored and
    /// `false` is returned.
    pub fn finish(&mut self, ticket: u64, success: bool) -> bool {
        if !self.awaits(ticket) {
            tracing::debug!("Ignoring outcome of stale submission {ticket}");
            return false;
        }
        self.pending = false;
        if success {
            self.close();
        }
        true
    }

    /// Discard edits and close
    pub fn cancel(&mut self) {
        self.close();
    }

    /// Restore the seed values and close
    pub fn close(&mut self) {
        self.draft = self.seed.clone();
        self.tab = Channel::Upload;
        self.open = false;
        self.pending = false;
    }
}
