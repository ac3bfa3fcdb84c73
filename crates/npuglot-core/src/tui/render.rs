//! Main rendering logic for the TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::view::Dashboard;

use super::state::{AppState, InputMode, PopupState};
use super::style::Styles;
use super::widgets::{
    NPU_HEIGHT, cpu_height, render_cpu, render_flows, render_header, render_npu,
    render_overclock_confirm, render_quit_confirm,
};

/// Main render function.
pub fn render(frame: &mut Frame, state: &AppState, dashboard: &Dashboard) {
    let area = frame.area();
    let surface = dashboard.surface();

    let chunks = Layout::vertical([
        Constraint::Length(1),                   // Header
        Constraint::Length(cpu_height(surface)), // CPU
        Constraint::Length(NPU_HEIGHT),          // NPU
        Constraint::Min(5),                      // Flows
        Constraint::Length(1),                   // Key help
    ])
    .split(area);

    render_header(frame, chunks[0], state, dashboard.last_timestamp());
    render_cpu(frame, chunks[1], surface, state);
    render_npu(frame, chunks[2], surface);
    render_flows(frame, chunks[3], surface, state);
    render_help_line(frame, chunks[4], state);

    // Popups last, over everything.
    match state.popup {
        PopupState::QuitConfirm => render_quit_confirm(frame, area),
        PopupState::OverclockConfirm { mhz } => render_overclock_confirm(frame, area, mhz),
        PopupState::None => {}
    }
}

fn render_help_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let keys: &[(&str, &str)] = match state.input_mode {
        InputMode::Normal => &[
            ("q", "quit"),
            ("p", "pause"),
            ("r", "refresh"),
            ("Tab", "controls"),
            ("↑↓", "scroll"),
        ],
        InputMode::Editing => &[
            ("↑↓", "choose"),
            ("0-9", "type"),
            ("Enter", "apply"),
            ("Tab", "next"),
            ("Esc", "leave"),
        ],
    };
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(format!(" {}", key), Styles::help_key()),
                Span::styled(format!(" {} ", what), Styles::dim()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
