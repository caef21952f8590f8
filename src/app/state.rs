//! Application state

use crate::composer::{Channel, Composer};
use crate::config::Config;
use crate::feed::{FeedList, Notice};
use crate::models::{LocalFile, MediaSlot, Post};
use crate::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Browsing the feed
    #[default]
    Normal,
    /// Composer dialog open
    Compose,
    /// Asking before deleting a post
    ConfirmDelete {
        /// Post to delete
        post_id: i64,
    },
    /// Keybinding help
    Help,
    /// Theme picker
    ThemePicker,
}

/// Focused input in the composer dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeField {
    /// Text body
    #[default]
    Text,
    /// Image input (path or URL, depending on the tab)
    Image,
    /// Video input (path or URL, depending on the tab)
    Video,
}

impl ComposeField {
    /// Next field (Tab)
    pub const fn next(self) -> Self {
        match self {
            Self::Text => Self::Image,
            Self::Image => Self::Video,
            Self::Video => Self::Text,
        }
    }

    /// Previous field (Shift+Tab)
    pub const fn prev(self) -> Self {
        match self {
            Self::Text => Self::Video,
            Self::Image => Self::Text,
            Self::Video => Self::Image,
        }
    }

    /// Media slot behind this field
    pub const fn slot(self) -> Option<MediaSlot> {
        match self {
            Self::Text => None,
            Self::Image => Some(MediaSlot::Image),
            Self::Video => Some(MediaSlot::Video),
        }
    }
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Whether to quit
    pub should_quit: bool,
    /// Current theme
    pub theme: Theme,
    /// Current mode
    pub mode: Mode,

    /// The feed
    pub feed: FeedList,
    /// Selected post index
    pub selected: usize,
    /// Post that was selected when the running load started
    pub selected_id: Option<i64>,

    /// Create/edit flow
    pub composer: Composer,
    /// Focused composer input
    pub compose_field: ComposeField,
    /// Path typed for the image upload
    pub image_path: String,
    /// Path typed for the video upload
    pub video_path: String,

    /// Index in the theme picker
    pub theme_picker_index: usize,

    /// Status message (bottom bar)
    pub status: String,
    /// Whether the status reports a failure
    pub status_is_error: bool,
    /// Requests sent to the worker and not yet answered
    pub in_flight: usize,

    /// Tick counter for animations
    tick: u64,
}

impl AppState {
    /// Create a new app state
    pub fn new(config: Config) -> Self {
        let theme = config.theme;
        Self {
            config,
            should_quit: false,
            theme,
            mode: Mode::Normal,
            feed: FeedList::new(),
            selected: 0,
            selected_id: None,
            composer: Composer::new(),
            compose_field: ComposeField::Text,
            image_path: String::new(),
            video_path: String::new(),
            theme_picker_index: 0,
            status: String::new(),
            status_is_error: false,
            in_flight: 0,
            tick: 0,
        }
    }

    /// Tick for animations
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Get current tick
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Whether anything is waiting on the server
    pub const fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.feed.is_loading()
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_is_error = false;
    }

    /// Set a failure message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_is_error = true;
    }

    /// Show the outcome of an operation
    pub fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::Info(m) => self.set_status(m),
            Notice::Error(m) => self.set_error(format!("❌ {m}")),
        }
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status.clear();
        self.status_is_error = false;
    }

    /// Get the currently selected post; nothing is selectable while loading
    pub fn selected_post(&self) -> Option<&Post> {
        if self.feed.is_loading() {
            return None;
        }
        self.feed.posts().get(self.selected)
    }

    /// Start a (re)load, remembering which post was selected
    pub fn begin_reload(&mut self) {
        self.selected_id = self.selected_post().map(|p| p.id);
        self.feed.begin_load();
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if !self.feed.is_empty() {
            self.selected = (self.selected + 1).min(self.feed.len() - 1);
        }
    }

    /// Move selection up
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside the list
    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.feed.len().saturating_sub(1));
    }

    /// Open the composer, empty or seeded from a post
    pub fn open_compose(&mut self, seed: Option<&Post>) {
        self.composer.open(seed);
        self.compose_field = ComposeField::Text;
        self.image_path.clear();
        self.video_path.clear();
        self.mode = Mode::Compose;
    }

    /// Cancel the composer and return to the feed
    pub fn close_compose(&mut self) {
        self.composer.cancel();
        self.image_path.clear();
        self.video_path.clear();
        self.mode = Mode::Normal;
    }

    /// Path buffer for a slot
    pub fn path_input(&self, slot: MediaSlot) -> &str {
        match slot {
            MediaSlot::Image => &self.image_path,
            MediaSlot::Video => &self.video_path,
        }
    }

    fn path_input_mut(&mut self, slot: MediaSlot) -> &mut String {
        match slot {
            MediaSlot::Image => &mut self.image_path,
            MediaSlot::Video => &mut self.video_path,
        }
    }

    /// Insert a character into the focused composer field
    pub fn compose_push(&mut self, c: char) {
        match self.compose_field.slot() {
            None => {
                let mut text = self.composer.draft().text.clone();
                text.push(c);
                self.composer.set_text(text);
            }
            Some(slot) => match self.composer.tab() {
                Channel::Upload => self.path_input_mut(slot).push(c),
                Channel::Url => {
                    let mut url = self.composer.draft().slot(slot).url.clone();
                    url.push(c);
                    self.composer.set_url(slot, url);
                }
            },
        }
    }

    /// Delete the last character of the focused composer field
    pub fn compose_backspace(&mut self) {
        match self.compose_field.slot() {
            None => {
                let mut text = self.composer.draft().text.clone();
                text.pop();
                self.composer.set_text(text);
            }
            Some(slot) => match self.composer.tab() {
                Channel::Upload => {
                    self.path_input_mut(slot).pop();
                }
                Channel::Url => {
                    let mut url = self.composer.draft().slot(slot).url.clone();
                    url.pop();
                    self.composer.set_url(slot, url);
                }
            },
        }
    }

    /// Select (or clear) the file typed into a slot's path input
    pub fn select_typed_file(&mut self, slot: MediaSlot) -> bool {
        let typed = self.path_input(slot).trim().to_string();
        if typed.is_empty() {
            self.composer.clear_file(slot);
            return true;
        }
        let already = self
            .composer
            .draft()
            .slot(slot)
            .file
            .as_ref()
            .is_some_and(|f| f.path.as_os_str() == typed.as_str());
        if already {
            return true;
        }
        match LocalFile::open(expand_home(&typed)) {
            Ok(file) => {
                self.set_status(format!("Attached {} ({})", file.file_name, file.size_label()));
                self.composer.select_file(slot, file);
                true
            }
            Err(e) => {
                self.set_error(format!("⚠ {e}"));
                false
            }
        }
    }

    /// Apply a theme and remember it
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.config.theme = theme;
    }
}

fn expand_home(path: &str) -> std::path::PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => std::path::PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_posts(n: i64) -> AppState {
        let mut state = AppState::new(Config::default());
        state
            .feed
            .apply_loaded(Ok((1..=n).map(Post::new).collect()));
        state
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut state = state_with_posts(2);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        state.select_prev();
        state.select_prev();
        assert_eq!(state.selected, 0);

        state.selected = 1;
        state.feed.apply_removed(2, Ok(()));
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_nothing_selected_while_reloading() {
        let mut state = state_with_posts(3);
        state.selected = 2;
        state.begin_reload();

        assert_eq!(state.selected_id, Some(3));
        assert!(state.selected_post().is_none());
    }

    #[test]
    fn test_typing_follows_field_and_tab() {
        let mut state = AppState::new(Config::default());
        state.open_compose(None);

        state.compose_push('h');
        state.compose_push('i');
        assert_eq!(state.composer.draft().text, "hi");

        state.compose_field = ComposeField::Image;
        state.compose_push('a');
        assert_eq!(state.image_path, "a");
        assert_eq!(state.composer.draft().image.url, "");

        state.composer.switch_channel(Channel::Url);
        state.compose_push('u');
        state.compose_backspace();
        state.compose_push('x');
        assert_eq!(state.composer.draft().image.url, "x");
        // Path typed on the other tab is kept
        assert_eq!(state.image_path, "a");
    }

    #[test]
    fn test_select_typed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"0000").unwrap();

        let mut state = AppState::new(Config::default());
        state.open_compose(None);
        state.video_path = path.display().to_string();
        assert!(state.select_typed_file(MediaSlot::Video));
        assert_eq!(
            state.composer.draft().video.file.as_ref().map(|f| f.size),
            Some(4)
        );

        state.image_path = dir.path().join("nope.png").display().to_string();
        assert!(!state.select_typed_file(MediaSlot::Image));
        assert!(state.status_is_error);

        state.video_path.clear();
        assert!(state.select_typed_file(MediaSlot::Video));
        assert!(state.composer.draft().video.file.is_none());
    }
}
