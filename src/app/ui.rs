//! UI rendering for the TUI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::state::{AppState, ComposeField, Mode};
use crate::composer::{Channel, ComposeMode};
use crate::feed::FeedState;
use crate::models::{MediaSlot, Post, VideoLink, resolve_media_url};
use crate::theme::{Theme, ThemeColors};

/// Murmur icon
const ICON: &str = "🗨";

/// Spinner animation frames
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Content lines shown per card in the feed list
const CARD_LINES: usize = 3;

/// Main render function
pub fn render(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();

    // Set background
    let area = frame.area();
    let bg_block = Block::default().style(Style::default().bg(colors.bg));
    frame.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Feed
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, state, chunks[0]);
    render_feed(frame, state, chunks[1]);
    render_status_bar(frame, state, chunks[2]);

    // Render modal dialogs
    match state.mode {
        Mode::Help => render_help_popup(frame, state),
        Mode::ThemePicker => render_theme_picker(frame, state),
        Mode::Compose => render_compose_popup(frame, state),
        Mode::ConfirmDelete { post_id } => render_delete_dialog(frame, state, post_id),
        Mode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let count = match state.feed.state() {
        FeedState::Ready => format!("{} posts", state.feed.len()),
        FeedState::Loading => "loading".to_string(),
        FeedState::Empty => "no posts".to_string(),
        FeedState::Failed(_) => "offline".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(state.config.api_url.as_str(), colors.text_muted()),
        Span::styled("  ·  ", colors.text_muted()),
        Span::styled(count, colors.text_info()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.border(false))
            .title(format!(" {ICON} Murmur "))
            .title_style(colors.title()),
    );

    frame.render_widget(header, area);
}

fn render_feed(frame: &mut Frame, state: &AppState, area: Rect) {
    // Layout: [Feed 50%] [Detail 50%]
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_post_list(frame, state, horizontal[0]);
    render_detail(frame, state, horizontal[1]);
}

fn render_post_list(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let block = Block::default()
        .title(" 📰 Feed ")
        .title_style(colors.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.border(state.mode == Mode::Normal));

    let placeholder = match state.feed.state() {
        FeedState::Loading => Some(vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled("⏳ Loading...", colors.text_muted()),
            ]),
        ]),
        FeedState::Empty => Some(vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  ℹ ", colors.text_info()),
                Span::styled("No posts yet. Be the first to post something!", colors.text_muted()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", colors.text_muted()),
                Span::styled("[n]", colors.key_hint()),
                Span::styled(" to write one", colors.text_muted()),
            ]),
        ]),
        FeedState::Failed(message) => Some(vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  ⚠ ", colors.text_error()),
                Span::styled("Could not load posts", colors.text_error()),
            ]),
            Line::from(vec![
                Span::styled("    ", Style::default()),
                Span::styled(message.as_str(), colors.text_muted()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", colors.text_muted()),
                Span::styled("[r]", colors.key_hint()),
                Span::styled(" to retry", colors.text_muted()),
            ]),
        ]),
        _ => None,
    };

    if let Some(lines) = placeholder {
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let width = area.width.saturating_sub(3) as usize;
    let items: Vec<ListItem> = state
        .feed
        .posts()
        .iter()
        .enumerate()
        .map(|(i, post)| post_card(post, i == state.selected, width, &colors))
        .collect();

    let list = List::new(items).block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// One feed entry: header line, wrapped preview, spacer
fn post_card<'a>(post: &Post, selected: bool, width: usize, colors: &ThemeColors) -> ListItem<'a> {
    // Full-width background for the selected card
    let base = if selected {
        colors.selected()
    } else {
        Style::default()
    };

    let mut badges = String::new();
    if post.image().is_some() {
        badges.push_str(" 🖼");
    }
    if post.video().is_some() {
        badges.push_str(" 🎬");
    }
    let edited = if post.is_edited() { " · edited" } else { "" };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            pad(&format!(" #{} · {}{edited}", post.id, post.relative_time()), width.saturating_sub(12)),
            base.patch(colors.text_muted()),
        ),
        Span::styled(format!("♥ {:<4}", post.likes), base.patch(colors.likes(post.likes))),
        Span::styled(pad(&badges, 6), base.patch(colors.media_badge())),
    ])];

    let body_width = width.saturating_sub(4).max(8);
    if post.content.trim().is_empty() {
        lines.push(Line::styled(
            pad("   (media only)", width),
            base.patch(colors.text_muted()),
        ));
    } else {
        let wrapped = textwrap::wrap(&post.content, body_width);
        let truncated = wrapped.len() > CARD_LINES;
        for (n, chunk) in wrapped.iter().take(CARD_LINES).enumerate() {
            let ellipsis = if truncated && n + 1 == CARD_LINES { "…" } else { "" };
            lines.push(Line::styled(
                pad(&format!("   {chunk}{ellipsis}"), width),
                base.patch(colors.text()),
            ));
        }
    }

    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn render_detail(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let block = Block::default()
        .title(" 📝 Post ")
        .title_style(colors.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(colors.border(false));

    let Some(post) = state.selected_post() else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::styled("  Select a post", colors.text_muted()),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let base = state.config.media_base_url.as_str();
    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  #{}", post.id), colors.title()),
            Span::styled(format!("  {}", post.relative_time()), colors.text_muted()),
        ]),
        Line::from(vec![Span::styled(
            format!("  {}", post.created_at.format("%Y-%m-%d %H:%M UTC")),
            colors.text_muted(),
        )]),
    ];
    if post.is_edited() {
        content.push(Line::from(vec![Span::styled(
            format!("  edited {}", post.updated_at.format("%Y-%m-%d %H:%M UTC")),
            colors.text_muted().add_modifier(Modifier::ITALIC),
        )]));
    }
    content.push(Line::from(""));

    for line in post.content.lines() {
        content.push(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(line, colors.text()),
        ]));
    }

    if post.has_media() {
        content.push(Line::from(""));
    }
    if let Some(image) = post.image() {
        content.push(Line::from(vec![
            Span::styled("  🖼 Image  ", colors.media_badge()),
            Span::styled(resolve_media_url(image, base), colors.text_info()),
        ]));
    }
    if let Some(video) = post.video() {
        let link = VideoLink::classify(video, base);
        content.push(Line::from(vec![
            Span::styled(format!("  🎬 {}  ", link.label()), colors.media_badge()),
            Span::styled(link.url().to_string(), colors.text_info()),
        ]));
    }

    content.push(Line::from(""));
    content.push(Line::from("  ─────────────────────────────────"));
    content.push(Line::from(""));
    let noun = if post.likes == 1 { "like" } else { "likes" };
    content.push(Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(format!("♥ {} {noun}", post.likes), colors.likes(post.likes)),
    ]));
    content.push(Line::from(""));

    let mut hints = vec![
        Span::styled("  ", Style::default()),
        Span::styled("l", colors.key_hint()),
        Span::styled(" like  ", colors.text_muted()),
        Span::styled("e", colors.key_hint()),
        Span::styled(" edit  ", colors.text_muted()),
        Span::styled("d", colors.key_hint()),
        Span::styled(" delete", colors.text_muted()),
    ];
    if post.image().is_some() {
        hints.push(Span::styled("  o", colors.key_hint()));
        hints.push(Span::styled(" open image", colors.text_muted()));
    }
    if post.video().is_some() {
        hints.push(Span::styled("  v", colors.key_hint()));
        hints.push(Span::styled(" open video", colors.text_muted()));
    }
    content.push(Line::from(hints));

    let detail = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

fn render_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let colors = state.theme.colors();

    let loading_indicator = if state.is_busy() {
        let frame_idx = (state.current_tick() / 2) as usize % SPINNER.len();
        format!("{} ", SPINNER[frame_idx])
    } else {
        String::new()
    };

    let content = if state.status.is_empty() {
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_accent()),
            Span::styled("n", colors.key_hint()),
            Span::styled(": new  ", colors.text_muted()),
            Span::styled("e", colors.key_hint()),
            Span::styled(": edit  ", colors.text_muted()),
            Span::styled("d", colors.key_hint()),
            Span::styled(": delete  ", colors.text_muted()),
            Span::styled("l", colors.key_hint()),
            Span::styled(": like  ", colors.text_muted()),
            Span::styled("r", colors.key_hint()),
            Span::styled(": reload  ", colors.text_muted()),
            Span::styled("?", colors.key_hint()),
            Span::styled(": help  ", colors.text_muted()),
            Span::styled("q", colors.key_hint()),
            Span::styled(": quit", colors.text_muted()),
        ]
    } else {
        let style = if state.status_is_error {
            colors.text_error()
        } else {
            colors.text_accent()
        };
        vec![
            Span::styled(" ", Style::default()),
            Span::styled(loading_indicator, colors.text_accent()),
            Span::styled(state.status.as_str(), style),
        ]
    };

    let status = Paragraph::new(Line::from(content)).style(Style::default().bg(colors.bg_popup));
    frame.render_widget(status, area);
}

fn render_compose_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let composer = &state.composer;
    let draft = composer.draft();

    let popup_area = centered_rect(60, 60, frame.area());

    // Clear and add background
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg_popup)),
        popup_area,
    );

    let focus = |field: ComposeField| {
        if state.compose_field == field {
            colors.tab_active()
        } else {
            colors.text_muted()
        }
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Text", focus(ComposeField::Text))]),
    ];

    if draft.text.is_empty() {
        content.push(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled("What's on your mind?", colors.text_muted()),
        ]));
    } else {
        for line in draft.text.split('\n') {
            content.push(Line::from(vec![
                Span::styled("  ", Style::default()),
                Span::styled(line, colors.text()),
            ]));
        }
    }
    let text_end = content.len();
    content.push(Line::from(""));

    // Upload | URL tabs
    let tab_span = |tab: Channel| {
        let style = if composer.tab() == tab {
            colors.selected()
        } else {
            colors.tab()
        };
        Span::styled(format!(" {} ", tab.label()), style)
    };
    content.push(Line::from(vec![
        Span::styled("  Media  ", colors.text_muted()),
        tab_span(Channel::Upload),
        Span::styled(" │ ", colors.text_muted()),
        tab_span(Channel::Url),
    ]));
    content.push(Line::from(""));

    for (slot, field) in [
        (MediaSlot::Image, ComposeField::Image),
        (MediaSlot::Video, ComposeField::Video),
    ] {
        content.extend(media_lines(state, slot, field, &colors));
    }

    content.push(Line::from(""));
    if composer.is_pending() {
        content.push(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled("Saving...", colors.text_warning()),
        ]));
    } else {
        let mut hints = vec![
            Span::styled("  ", Style::default()),
            Span::styled("Tab", colors.key_hint()),
            Span::styled(" field  ", colors.text_muted()),
            Span::styled("F2", colors.key_hint()),
            Span::styled(" upload/url  ", colors.text_muted()),
        ];
        if composer.mode().is_edit() {
            hints.push(Span::styled("Ctrl+R", colors.key_hint()));
            hints.push(Span::styled(" remove  ", colors.text_muted()));
        }
        hints.extend([
            Span::styled("Ctrl+S", colors.key_hint()),
            Span::styled(" save  ", colors.text_muted()),
            Span::styled("Esc", colors.key_hint()),
            Span::styled(" cancel", colors.text_muted()),
        ]);
        content.push(Line::from(hints));
    }

    let title = match composer.mode() {
        ComposeMode::Create => " 📝 Create Post ".to_string(),
        ComposeMode::Edit { post_id } => format!(" ✏️ Edit Post #{post_id} "),
    };

    let compose = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(colors.border(true))
            .style(Style::default().bg(colors.bg_popup))
            .title(title)
            .title_style(colors.title()),
    );
    frame.render_widget(compose, popup_area);

    // Cursor at the end of the text body
    if state.compose_field == ComposeField::Text && !composer.is_pending() {
        let last_line = draft.text.rsplit('\n').next().unwrap_or_default();
        let cursor_x = popup_area.x + 3 + last_line.width() as u16;
        let cursor_y = popup_area.y + text_end as u16;
        if cursor_x < popup_area.right().saturating_sub(1)
            && cursor_y < popup_area.bottom().saturating_sub(1)
        {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

/// Input row for one media slot, plus preview / removal lines
fn media_lines<'a>(
    state: &'a AppState,
    slot: MediaSlot,
    field: ComposeField,
    colors: &ThemeColors,
) -> Vec<Line<'a>> {
    let composer = &state.composer;
    let draft = composer.draft().slot(slot);
    let focused = state.compose_field == field;

    let icon = match slot {
        MediaSlot::Image => "🖼",
        MediaSlot::Video => "🎬",
    };
    let label_style = if focused {
        colors.tab_active()
    } else {
        colors.text_muted()
    };
    let marker = if focused { "▸" } else { " " };

    let (value, placeholder) = match composer.tab() {
        Channel::Upload => (state.path_input(slot), "path to a file, Enter to attach"),
        Channel::Url => (draft.url.as_str(), "https://..."),
    };
    let value_span = if value.is_empty() {
        Span::styled(placeholder, colors.text_muted())
    } else {
        Span::styled(value, colors.text())
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {marker}{icon} {:<6} ", slot.label()), label_style),
        value_span,
    ])];

    if let Some(file) = &draft.file {
        lines.push(Line::from(vec![
            Span::styled("      ✓ ", colors.text_success()),
            Span::styled(
                format!("{} ({}, {})", file.file_name, file.size_label(), file.mime),
                colors.text_success(),
            ),
        ]));
        if file.is_image() {
            lines.push(Line::from(vec![
                Span::styled("      Preview: ", colors.text_muted()),
                Span::styled(file.path.display().to_string(), colors.media_badge()),
            ]));
        }
        if draft.remove {
            lines.push(Line::styled(
                "      File ignored while removal is marked (Ctrl+R to keep)",
                colors.text_warning(),
            ));
        }
    }

    let url_shadowed = composer.tab() == Channel::Url && draft.active_channel() == Channel::Upload;
    if url_shadowed && !draft.url.trim().is_empty() {
        lines.push(Line::styled(
            "      URL ignored while a file is attached",
            colors.text_warning(),
        ));
    }

    if draft.remove {
        lines.push(Line::styled(
            format!("      ✗ current {} will be removed", slot.label().to_lowercase()),
            colors.text_error(),
        ));
    }

    lines
}

fn render_delete_dialog(frame: &mut Frame, state: &AppState, post_id: i64) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 30, frame.area());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg_popup)),
        popup_area,
    );

    let preview = state
        .feed
        .get(post_id)
        .map(|p| p.preview(60))
        .unwrap_or_default();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to delete this post?",
            colors.text(),
        )),
        Line::from(Span::styled("This action cannot be undone.", colors.text_warning())),
        Line::from(""),
        Line::from(Span::styled(format!("\"{preview}\""), colors.text_muted())),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", colors.key_hint()),
            Span::styled(" delete   ", colors.text_muted()),
            Span::styled("n", colors.key_hint()),
            Span::styled(" cancel", colors.text_muted()),
        ]),
    ];

    let dialog = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.text_error())
                .style(Style::default().bg(colors.bg_popup))
                .title(" 🗑 Delete Post ")
                .title_style(colors.text_error()),
        );
    frame.render_widget(dialog, popup_area);
}

fn render_help_popup(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 70, frame.area());

    // Solid background to cover everything underneath
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.bg_popup)),
        popup_area,
    );

    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            format!("  {title}"),
            colors.text_accent().add_modifier(Modifier::BOLD),
        )])
    };
    let key = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("    {keys:<14}"), colors.key_hint()),
            Span::styled(action, colors.text()),
        ])
    };

    let help_content = vec![
        Line::from(""),
        section("Feed"),
        key("j/k ↑/↓", "Move selection"),
        key("g/G", "First / last post"),
        key("r F5", "Reload posts"),
        key("n", "New post"),
        key("e", "Edit selected post"),
        key("d", "Delete selected post"),
        key("l", "Like selected post"),
        key("o", "Open image in browser"),
        key("v", "Open video in browser"),
        Line::from(""),
        section("Composer"),
        key("Tab/S-Tab", "Next / previous field"),
        key("F2 Ctrl+T", "Switch Upload / URL"),
        key("Enter", "Attach typed file"),
        key("Ctrl+R", "Toggle removing media"),
        key("Ctrl+S", "Save"),
        key("Esc", "Cancel"),
        Line::from(""),
        section("General"),
        key("t", "Theme picker"),
        key("?", "This help"),
        key("q Ctrl+C", "Quit"),
    ];

    let help = Paragraph::new(help_content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(colors.border(true))
                .style(Style::default().bg(colors.bg_popup))
                .title(" ⌨ Keyboard Shortcuts ")
                .title_style(colors.title()),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}

fn render_theme_picker(frame: &mut Frame, state: &AppState) {
    let colors = state.theme.colors();
    let popup_area = centered_rect(50, 70, frame.area());

    frame.render_widget(Clear, popup_area);
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), popup_area);

    let themes = Theme::all();
    let items: Vec<ListItem> = themes
        .iter()
        .enumerate()
        .map(|(i, theme_name)| {
            let palette = theme_name.palette();
            let selected = i == state.theme_picker_index;

            let label = format!(
                "  {} {} ",
                if selected { "▸" } else { " " },
                theme_name.display_name()
            );
            let style = if selected {
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg).bg(colors.bg)
            };

            ListItem::new(Line::from(vec![
                Span::styled(label, style),
                Span::styled("█", Style::default().fg(palette.accent).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.secondary).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.success).bg(colors.bg)),
                Span::styled("█", Style::default().fg(palette.warning).bg(colors.bg)),
            ]))
        })
        .collect();

    let theme_list = List::new(items)
        .style(Style::default().bg(colors.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(colors.border(true))
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(colors.bg))
                .title(format!(
                    " 🎨 Select Theme ({}/{}) ",
                    state.theme_picker_index + 1,
                    themes.len()
                ))
                .title_bottom(Line::from(" ↑↓ navigate │ ↵ apply │ Esc cancel ").centered()),
        );

    let mut list_state = ListState::default();
    list_state.select(Some(state.theme_picker_index));
    frame.render_stateful_widget(theme_list, popup_area, &mut list_state);
}

/// Pad `text` with spaces to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    if used >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - used))
    }
}

/// Helper function to create a centered rect
const fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_width = r.width * percent_x / 100;
    let popup_height = r.height * percent_y / 100;
    Rect {
        x: r.x + (r.width.saturating_sub(popup_width)) / 2,
        y: r.y + (r.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(ratatui::buffer::Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_feed_placeholders() {
        let mut state = AppState::new(Config::default());
        assert!(draw(&state).contains("Loading..."));

        state.feed.apply_loaded(Ok(Vec::new()));
        assert!(draw(&state).contains("No posts yet. Be the first to post something!"));
    }

    #[test]
    fn test_reload_hides_stale_list() {
        let mut state = AppState::new(Config::default());
        let mut post = Post::new(1);
        post.content = "stale entry".to_string();
        state.feed.apply_loaded(Ok(vec![post]));
        assert!(draw(&state).contains("stale entry"));

        state.begin_reload();
        let screen = draw(&state);
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("stale entry"));
    }

    #[test]
    fn test_compose_warns_about_ignored_inputs() {
        let mut post = Post::new(3);
        post.content = "old".to_string();
        post.image_url = Some("http://x/a.png".to_string());
        let mut state = AppState::new(Config::default());
        state.feed.apply_loaded(Ok(vec![post.clone()]));
        state.open_compose(Some(&post));

        let file = crate::models::LocalFile::with_size("b.png", 3);
        state.composer.select_file(MediaSlot::Image, file);
        state.composer.switch_channel(Channel::Url);
        assert!(draw(&state).contains("URL ignored while a file is attached"));

        state.composer.toggle_remove(MediaSlot::Image);
        assert!(draw(&state).contains("File ignored while removal is marked"));
    }

    #[test]
    fn test_compose_popup_titles() {
        let mut state = AppState::new(Config::default());
        state.open_compose(None);
        assert!(draw(&state).contains("Create Post"));

        let mut post = Post::new(3);
        post.content = "old".to_string();
        state.feed.apply_loaded(Ok(vec![post.clone()]));
        state.open_compose(Some(&post));
        assert!(draw(&state).contains("Edit Post #3"));
    }

    #[test]
    fn test_delete_dialog_text() {
        let mut state = AppState::new(Config::default());
        state.feed.apply_loaded(Ok(vec![Post::new(1)]));
        state.mode = Mode::ConfirmDelete { post_id: 1 };
        let screen = draw(&state);
        assert!(screen.contains("Are you sure you want to delete this post?"));
        assert!(screen.contains("This action cannot be undone."));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("🖼", 4).width(), 4);
        assert_eq!(pad("toolong", 3), "toolong");
    }
}
