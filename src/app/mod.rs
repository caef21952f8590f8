//! TUI Application module

mod async_ops;
mod events;
mod state;
mod ui;

pub use state::{AppState, ComposeField, Mode};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::api::HttpClient;
use crate::config::Config;

use async_ops::{AsyncCommand, AsyncHandle, AsyncResult, spawn_worker};

/// Run the TUI application
pub fn run() -> Result<()> {
    // Create tokio runtime
    let rt = Runtime::new()?;

    // Load config
    let config = Config::load()?;
    let client = HttpClient::from_config(&config)?;
    tracing::info!("Using posts API at {}", client.posts_url());

    // Spawn async worker
    let async_handle = rt.block_on(async { spawn_worker(client) });

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut state, async_handle);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save config on exit
    state.config.save()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    mut async_handle: AsyncHandle,
) -> Result<()> {
    // Initial fetch
    state.begin_reload();
    dispatch(state, &async_handle, AsyncCommand::Load);

    loop {
        // Process any async results
        while let Ok(result) = async_handle.result_rx.try_recv() {
            handle_async_result(state, result);
        }

        // Draw UI
        terminal.draw(|frame| ui::render(frame, state))?;

        // Handle events
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(cmd) = events::handle_key(state, key)
        {
            dispatch(state, &async_handle, cmd);
        }

        // Tick for animations
        state.tick();

        if state.should_quit {
            // Shutdown async worker
            let _ = async_handle.cmd_tx.blocking_send(AsyncCommand::Shutdown);
            break;
        }
    }

    Ok(())
}

/// Hand a command to the worker, tracking it as in flight
fn dispatch(state: &mut AppState, async_handle: &AsyncHandle, cmd: AsyncCommand) {
    tracing::debug!("Dispatching {cmd:?}");
    if async_handle.cmd_tx.blocking_send(cmd).is_err() {
        tracing::error!("Worker is gone, dropping command");
        state.set_error("❌ Background worker stopped; restart murmur");
        return;
    }
    state.in_flight += 1;
}

fn handle_async_result(state: &mut AppState, result: AsyncResult) {
    state.in_flight = state.in_flight.saturating_sub(1);

    match result {
        AsyncResult::Loaded(result) => {
            let notice = state.feed.apply_loaded(result);
            // Keep the cursor on the same post across reloads
            if let Some(index) = state.selected_id.and_then(|id| state.feed.position(id)) {
                state.selected = index;
            }
            state.notify(notice);
        }
        AsyncResult::Created { ticket, result } => {
            let ok = result.is_ok();
            let notice = state.feed.apply_created(result);
            finish_compose(state, ticket, ok);
            if ok {
                // The new post is prepended
                state.selected = 0;
            }
            state.notify(notice);
        }
        AsyncResult::Updated { id, ticket, result } => {
            let ok = result.is_ok();
            let notice = state.feed.apply_updated(id, result);
            finish_compose(state, ticket, ok);
            state.notify(notice);
        }
        AsyncResult::Deleted { id, result } => {
            let notice = state.feed.apply_removed(id, result);
            state.notify(notice);
        }
        AsyncResult::Liked { id, result } => {
            let notice = state.feed.apply_liked(id, result);
            state.notify(notice);
        }
    }

    state.clamp_selection();
}

/// Settle the composer after submission `ticket` came back
fn finish_compose(state: &mut AppState, ticket: u64, success: bool) {
    // Cancelled or superseded while the request was in flight
    if !state.composer.finish(ticket, success) {
        return;
    }
    if success && state.mode == Mode::Compose {
        state.image_path.clear();
        state.video_path.clear();
        state.mode = Mode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::composer::SubmitError;
    use crate::models::Post;

    fn post(id: i64, content: &str) -> Post {
        let mut post = Post::new(id);
        post.content = content.to_string();
        post
    }

    fn submitting_state() -> (AppState, u64) {
        let mut state = AppState::new(Config::default());
        state.feed.apply_loaded(Ok(vec![post(1, "old")]));
        state.selected = 0;
        state.open_compose(None);
        state.composer.set_text("new");
        let ticket = state.composer.submit().unwrap().ticket;
        state.in_flight = 1;
        (state, ticket)
    }

    fn created(ticket: u64, result: Result<Post, ApiError>) -> AsyncResult {
        AsyncResult::Created { ticket, result }
    }

    #[test]
    fn test_created_post_closes_composer_and_is_selected() {
        let (mut state, ticket) = submitting_state();
        state.select_next();
        handle_async_result(&mut state, created(ticket, Ok(post(2, "new"))));

        assert_eq!(state.mode, Mode::Normal);
        assert!(!state.composer.is_open());
        assert_eq!(state.feed.posts()[0].id, 2);
        assert_eq!(state.selected, 0);
        assert_eq!(state.in_flight, 0);
        assert!(!state.status_is_error);
    }

    #[test]
    fn test_failed_create_keeps_draft_open() {
        let (mut state, ticket) = submitting_state();
        handle_async_result(
            &mut state,
            created(ticket, Err(ApiError::Transport("connection refused".to_string()))),
        );

        assert_eq!(state.mode, Mode::Compose);
        assert!(state.composer.is_open());
        assert!(!state.composer.is_pending());
        assert_eq!(state.composer.draft().text, "new");
        assert!(state.status_is_error);
        assert_eq!(state.feed.len(), 1);
    }

    #[test]
    fn test_result_after_cancel_still_updates_feed() {
        let (mut state, ticket) = submitting_state();
        state.close_compose();
        handle_async_result(&mut state, created(ticket, Ok(post(2, "new"))));

        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.feed.len(), 2);
    }

    #[test]
    fn test_cancelled_submission_failure_leaves_new_draft_pending() {
        let (mut state, first) = submitting_state();
        state.close_compose();

        state.open_compose(None);
        state.composer.set_text("second");
        let second = state.composer.submit().unwrap().ticket;
        state.in_flight += 1;

        handle_async_result(
            &mut state,
            created(first, Err(ApiError::Transport("connection reset".to_string()))),
        );

        assert!(state.composer.is_pending());
        assert_eq!(state.composer.submit(), Err(SubmitError::Pending));
        assert_eq!(state.mode, Mode::Compose);

        handle_async_result(&mut state, created(second, Ok(post(3, "second"))));
        assert!(!state.composer.is_open());
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn test_cancelled_submission_success_does_not_close_new_draft() {
        let (mut state, first) = submitting_state();
        state.close_compose();

        state.open_compose(None);
        state.composer.set_text("second");
        state.composer.submit().unwrap();

        handle_async_result(&mut state, created(first, Ok(post(2, "new"))));

        assert_eq!(state.mode, Mode::Compose);
        assert!(state.composer.is_open());
        assert!(state.composer.is_pending());
        assert_eq!(state.composer.draft().text, "second");
        assert_eq!(state.feed.len(), 2);
    }

    #[test]
    fn test_reload_keeps_selected_post() {
        let mut state = AppState::new(Config::default());
        state.feed.apply_loaded(Ok(vec![post(1, "a"), post(2, "b")]));
        state.selected = 1;
        state.begin_reload();
        state.in_flight = 1;

        // Someone else posted meanwhile
        handle_async_result(
            &mut state,
            AsyncResult::Loaded(Ok(vec![post(3, "c"), post(1, "a"), post(2, "b")])),
        );

        assert_eq!(state.selected, 2);
        assert_eq!(state.selected_post().map(|p| p.id), Some(2));
    }

    #[test]
    fn test_delete_result_clamps_selection() {
        let mut state = AppState::new(Config::default());
        state.feed.apply_loaded(Ok(vec![post(1, "a"), post(2, "b")]));
        state.selected = 1;
        state.in_flight = 1;
        handle_async_result(&mut state, AsyncResult::Deleted { id: 2, result: Ok(()) });

        assert_eq!(state.selected, 0);
        assert_eq!(state.feed.len(), 1);
    }

    #[test]
    fn test_like_failure_leaves_count() {
        let mut state = AppState::new(Config::default());
        let mut liked = post(1, "a");
        liked.likes = 4;
        state.feed.apply_loaded(Ok(vec![liked]));
        handle_async_result(
            &mut state,
            AsyncResult::Liked {
                id: 1,
                result: Err(ApiError::Status {
                    status: 404,
                    message: Some("Post not found".to_string()),
                }),
            },
        );

        assert_eq!(state.feed.posts()[0].likes, 4);
        assert!(state.status.contains("Post not found"));
    }
}
