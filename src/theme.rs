//! Colour themes.
//!
//! Palettes come from the `ratatui-themes` crate; [`ThemeColors`] maps a
//! palette onto the styles the feed screen uses.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// All available theme names.
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    /// Next theme in rotation
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.next())
    }

    /// Display name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Styles for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }

    /// Inner `ThemeName`
    #[must_use]
    pub const fn inner(&self) -> ThemeName {
        self.0
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved colours for the feed UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Screen background
    pub bg: Color,
    /// Popup background, slightly lifted from `bg`
    pub bg_popup: Color,
    /// Body text
    pub fg: Color,
    /// Secondary text (timestamps, hints)
    pub muted: Color,
    /// Accent for titles and focus
    pub accent: Color,
    /// Second accent for key hints and badges
    pub secondary: Color,
    /// Success notices
    pub success: Color,
    /// Pending / warning notices
    pub warning: Color,
    /// Failures and destructive actions
    pub error: Color,
    /// Informational highlights
    pub info: Color,
    /// Selection background
    pub selection: Color,
}

impl ThemeColors {
    /// Map a palette onto UI colours
    #[must_use]
    pub fn from_palette(p: ThemePalette) -> Self {
        Self {
            bg: p.bg,
            bg_popup: lift(p.bg, 12),
            fg: p.fg,
            muted: p.muted,
            accent: p.accent,
            secondary: p.secondary,
            success: p.success,
            warning: p.warning,
            error: p.error,
            info: p.info,
            selection: p.selection,
        }
    }

    /// Body text
    #[must_use]
    pub fn text(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Secondary text
    #[must_use]
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Accent text
    #[must_use]
    pub fn text_accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Informational text
    #[must_use]
    pub fn text_info(&self) -> Style {
        Style::default().fg(self.info)
    }

    /// Success text
    #[must_use]
    pub fn text_success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Warning text
    #[must_use]
    pub fn text_warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Error text
    #[must_use]
    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Heading style
    #[must_use]
    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Border style; focused borders use the accent
    #[must_use]
    pub fn border(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.muted })
    }

    /// Selected card / field
    #[must_use]
    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Inactive tab
    #[must_use]
    pub fn tab(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Active tab
    #[must_use]
    pub fn tab_active(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Key hint (for shortcuts)
    #[must_use]
    pub fn key_hint(&self) -> Style {
        Style::default()
            .fg(self.secondary)
            .add_modifier(Modifier::BOLD)
    }

    /// Like counter, highlighted once a post has any likes
    #[must_use]
    pub fn likes(&self, count: u32) -> Style {
        if count > 0 {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            self.text_muted()
        }
    }

    /// Media attachment badge
    #[must_use]
    pub fn media_badge(&self) -> Style {
        Style::default().fg(self.info).add_modifier(Modifier::ITALIC)
    }
}

fn lift(color: Color, amount: u8) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            r.saturating_add(amount),
            g.saturating_add(amount),
            b.saturating_add(amount),
        ),
        other => other,
    }
}
