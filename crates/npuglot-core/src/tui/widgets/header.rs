//! Header widget showing time, mode and the latest message.

use chrono::{DateTime, Local, TimeZone};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use crate::fmt::truncate;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Renders the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, last_timestamp: Option<i64>) {
    let chunks = Layout::horizontal([
        Constraint::Length(22), // Time
        Constraint::Length(10), // Mode
        Constraint::Length(24), // Title
        Constraint::Min(20),    // Message
    ])
    .split(area);

    let timestamp = last_timestamp.unwrap_or_else(|| Local::now().timestamp());
    let time_str = Local
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "----".to_string());
    frame.render_widget(Paragraph::new(time_str).style(Styles::header()), chunks[0]);

    let mode_str = if !state.is_live {
        " DEMO "
    } else if state.paused {
        " PAUSED "
    } else {
        " LIVE "
    };
    frame.render_widget(Paragraph::new(mode_str).style(Styles::header()), chunks[1]);

    let title = format!("npuglot {}", crate::VERSION);
    frame.render_widget(Paragraph::new(title).style(Styles::header()), chunks[2]);

    // Local message first, then write outcome, then read failure.
    let (text, style) = if let Some(msg) = &state.status_message {
        (msg.clone(), Styles::header().patch(Styles::warning()))
    } else if let Some((n, _)) = &state.notification {
        let style = if n.is_error() {
            Styles::header().patch(Styles::critical())
        } else {
            Styles::header()
        };
        (n.message.clone(), style)
    } else if let Some(err) = &state.last_error {
        (
            format!("read failed: {}", err),
            Styles::header().patch(Styles::critical()),
        )
    } else {
        (String::new(), Styles::header())
    };
    let text = truncate(&text, chunks[3].width as usize);
    frame.render_widget(Paragraph::new(text).style(style), chunks[3]);
}
