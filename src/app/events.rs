//! Event handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::async_ops::AsyncCommand;
use super::state::{AppState, Mode};
use crate::composer::{Channel, SubmitError, Submission};
use crate::models::{MediaSlot, VideoLink, resolve_media_url};
use crate::theme::Theme;

/// Handle key events, returning an optional async command
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    // Handle mode-specific input first
    match state.mode {
        Mode::ThemePicker => {
            handle_theme_picker_key(state, key);
            return None;
        }
        Mode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                state.mode = Mode::Normal;
            }
            return None;
        }
        Mode::Compose => {
            return handle_compose_key(state, key);
        }
        Mode::ConfirmDelete { post_id } => {
            return handle_confirm_delete_key(state, key, post_id);
        }
        Mode::Normal => {}
    }

    handle_feed_key(state, key)
}

fn handle_feed_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            state.should_quit = true;
            None
        }
        (_, KeyCode::Char('?') | KeyCode::F(1)) => {
            state.mode = Mode::Help;
            None
        }
        (_, KeyCode::Char('t')) => {
            state.theme_picker_index = Theme::all()
                .iter()
                .position(|t| *t == state.theme.inner())
                .unwrap_or(0);
            state.mode = Mode::ThemePicker;
            None
        }

        // Navigation
        (_, KeyCode::Char('j') | KeyCode::Down) => {
            state.select_next();
            None
        }
        (_, KeyCode::Char('k') | KeyCode::Up) => {
            state.select_prev();
            None
        }
        (_, KeyCode::Char('g') | KeyCode::Home) => {
            state.selected = 0;
            None
        }
        (_, KeyCode::Char('G') | KeyCode::End) => {
            state.selected = state.feed.len().saturating_sub(1);
            None
        }

        // Actions
        (_, KeyCode::Char('n')) => {
            state.open_compose(None);
            None
        }
        (_, KeyCode::Char('e')) => {
            let Some(post) = state.selected_post().cloned() else {
                return None;
            };
            state.open_compose(Some(&post));
            None
        }
        (_, KeyCode::Char('d') | KeyCode::Delete) => {
            if let Some(post_id) = state.selected_post().map(|p| p.id) {
                state.mode = Mode::ConfirmDelete { post_id };
            }
            None
        }
        (_, KeyCode::Char('l' | 'L')) => {
            let id = state.selected_post()?.id;
            state.set_status("Liking...");
            Some(AsyncCommand::Like { id })
        }
        (_, KeyCode::Char('r')) | (_, KeyCode::F(5)) => {
            state.begin_reload();
            state.set_status("Loading posts...");
            Some(AsyncCommand::Load)
        }
        (_, KeyCode::Char('o')) => {
            open_media(state, MediaSlot::Image);
            None
        }
        (_, KeyCode::Char('v')) => {
            open_media(state, MediaSlot::Video);
            None
        }
        (_, KeyCode::Esc) => {
            state.clear_status();
            None
        }
        _ => None,
    }
}

/// Open the selected post's image (falling back to its video) or video in the browser
fn open_media(state: &mut AppState, prefer: MediaSlot) {
    let Some(post) = state.selected_post() else {
        return;
    };
    let base = state.config.media_base_url.as_str();
    let image = post.image().map(|r| resolve_media_url(r, base));
    let video = post.video().map(|r| VideoLink::classify(r, base).url().to_string());
    let target = match prefer {
        MediaSlot::Image => image.or(video),
        MediaSlot::Video => video,
    };

    let Some(url) = target else {
        state.set_status("This post has no media to open");
        return;
    };
    match open::that(&url) {
        Ok(()) => state.set_status("✓ Opened in browser"),
        Err(e) => {
            tracing::warn!("Failed to open {url}: {e}");
            state.set_error(format!("⚠ Could not open {url}"));
        }
    }
}

fn handle_compose_key(state: &mut AppState, key: KeyEvent) -> Option<AsyncCommand> {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            state.close_compose();
            None
        }
        (KeyModifiers::CONTROL, KeyCode::Enter | KeyCode::Char('s')) => submit_compose(state),

        // Field focus
        (_, KeyCode::Tab) => {
            state.compose_field = state.compose_field.next();
            None
        }
        (_, KeyCode::BackTab) => {
            state.compose_field = state.compose_field.prev();
            None
        }

        // Upload / URL tab
        (_, KeyCode::F(2)) | (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
            let tab = state.composer.tab().toggle();
            state.composer.switch_channel(tab);
            None
        }

        // Remove existing media
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
            let Some(slot) = state.compose_field.slot() else {
                return None;
            };
            if !state.composer.mode().is_edit() {
                state.set_status("Nothing to remove on a new post");
            } else if state.composer.toggle_remove(slot) {
                state.set_status(format!("{} will be removed", slot.label()));
            } else {
                state.set_status(format!("{} will be kept", slot.label()));
            }
            None
        }

        (_, KeyCode::Enter) => {
            match state.compose_field.slot() {
                None => state.compose_push('\n'),
                Some(slot) if state.composer.tab() == Channel::Upload => {
                    state.select_typed_file(slot);
                }
                Some(_) => state.compose_field = state.compose_field.next(),
            }
            None
        }
        (_, KeyCode::Backspace) => {
            state.compose_backspace();
            None
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            state.compose_push(c);
            None
        }
        _ => None,
    }
}

/// Attach any typed paths, then validate the draft into a request
fn submit_compose(state: &mut AppState) -> Option<AsyncCommand> {
    for slot in MediaSlot::all() {
        if !state.select_typed_file(slot) {
            return None;
        }
    }

    match state.composer.submit() {
        Ok(Submission { ticket, payload }) => {
            state.set_status("Saving...");
            match state.composer.mode().post_id() {
                None => Some(AsyncCommand::Create { ticket, payload }),
                Some(id) => Some(AsyncCommand::Update {
                    id,
                    ticket,
                    payload,
                }),
            }
        }
        Err(SubmitError::Pending) => {
            state.set_status("Still saving...");
            None
        }
        Err(e) => {
            state.set_error(format!("⚠ {e}"));
            None
        }
    }
}

fn handle_confirm_delete_key(state: &mut AppState, key: KeyEvent, post_id: i64) -> Option<AsyncCommand> {
    match key.code {
        KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
            state.mode = Mode::Normal;
            state.set_status("Deleting...");
            Some(AsyncCommand::Delete { id: post_id })
        }
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            None
        }
        _ => None,
    }
}

fn handle_theme_picker_key(state: &mut AppState, key: KeyEvent) {
    let themes = Theme::all();
    let len = themes.len();

    match key.code {
        KeyCode::Esc => {
            // Restore the saved theme
            state.theme = state.config.theme;
            state.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            let selected_theme = Theme::from(themes[state.theme_picker_index]);
            state.set_theme(selected_theme);
            state.mode = Mode::Normal;
            state.set_status(format!("✓ Theme set to {}", selected_theme.name()));
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.theme_picker_index = (state.theme_picker_index + 1) % len;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.theme_picker_index = state.theme_picker_index.checked_sub(1).unwrap_or(len - 1);
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            state.theme_picker_index = 0;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        KeyCode::End | KeyCode::Char('G') => {
            state.theme_picker_index = len - 1;
            state.theme = Theme::from(themes[state.theme_picker_index]);
        }
        _ => {}
    }
}
