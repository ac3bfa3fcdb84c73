//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use crate::surface::{Palette, Tone};

/// Color palette.
pub struct Theme;

impl Theme {
    pub const HEADER_BG: Color = Color::Blue;
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const SUCCESS: Color = Color::Green;
    pub const DANGER: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const ACCENT: Color = Color::Cyan;

    pub const GAUGE_NOMINAL: Color = Color::Cyan;
    pub const GAUGE_OVERCLOCK: Color = Color::LightRed;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG)
    }

    /// Header bar style.
    pub fn header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Field label in the info sections.
    pub fn label() -> Style {
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD)
    }

    pub fn section_title() -> Style {
        Style::default()
            .fg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Theme::WARNING)
    }

    pub fn critical() -> Style {
        Style::default()
            .fg(Theme::DANGER)
            .add_modifier(Modifier::BOLD)
    }

    /// Control that has focus.
    pub fn focused() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Theme::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Control with a request in flight.
    pub fn disabled() -> Style {
        Style::default()
            .fg(Theme::FG_DIM)
            .add_modifier(Modifier::ITALIC)
    }

    /// Help key style (highlighted keys in the footer).
    pub fn help_key() -> Style {
        Style::default().fg(Theme::WARNING)
    }

    pub fn tone(tone: Tone) -> Style {
        match tone {
            Tone::Neutral => Self::default(),
            Tone::Success => Style::default().fg(Theme::SUCCESS),
            Tone::Danger => Style::default().fg(Theme::DANGER),
            Tone::Active => Style::default()
                .fg(Color::Black)
                .bg(Theme::SUCCESS)
                .add_modifier(Modifier::BOLD),
            Tone::Inactive => Self::dim(),
        }
    }

    pub fn gauge(palette: Palette) -> Style {
        match palette {
            Palette::Nominal => Style::default().fg(Theme::GAUGE_NOMINAL),
            Palette::Overclock => Style::default()
                .fg(Theme::GAUGE_OVERCLOCK)
                .add_modifier(Modifier::BOLD),
        }
    }
}
