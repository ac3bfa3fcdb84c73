//! CPU frequency section: gauge, governors, cores and controls.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::surface::{NodeId, Surface};
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Rows needed by the section, borders included.
pub fn cpu_height(surface: &Surface) -> u16 {
    let controls = NodeId::CONTROLS.iter().any(|id| surface.is_mounted(*id));
    if controls { 6 } else { 5 }
}

pub fn render_cpu(frame: &mut Frame, area: Rect, surface: &Surface, state: &AppState) {
    let block = Block::default()
        .title(Span::styled(" CPU Frequency ", Styles::section_title()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1), // Gauge
        Constraint::Length(1), // Governors
        Constraint::Length(1), // Cores
        Constraint::Length(1), // Controls
    ])
    .split(inner);

    render_gauge(frame, rows[0], surface);

    let mut governors = vec![Span::styled("Governor:  ", Styles::label())];
    match surface.badges(NodeId::GovernorBadges) {
        Some(badges) if !badges.is_empty() => {
            for badge in badges {
                governors.push(Span::styled(format!(" {} ", badge.text), Styles::tone(badge.tone)));
                governors.push(Span::raw(" "));
            }
        }
        _ => governors.push(Span::raw("N/A")),
    }
    frame.render_widget(Paragraph::new(Line::from(governors)), rows[1]);

    let cores = Line::from(vec![
        Span::styled("CPU Cores: ", Styles::label()),
        Span::raw(surface.text(NodeId::CpuCount).unwrap_or("-").to_string()),
    ]);
    frame.render_widget(Paragraph::new(cores), rows[2]);

    let mut controls = Vec::new();
    if let Some(select) = surface.select(NodeId::GovernorSelect) {
        controls.extend(control_spans(
            "Set governor",
            select.selected_label(),
            state.focus == Some(NodeId::GovernorSelect),
            select.disabled,
        ));
    }
    if let Some(select) = surface.select(NodeId::MaxFreqSelect) {
        controls.extend(control_spans(
            "Max frequency",
            select.selected_label(),
            state.focus == Some(NodeId::MaxFreqSelect),
            select.disabled,
        ));
    }
    if let Some(input) = surface.input(NodeId::OverclockInput) {
        let focused = state.focus == Some(NodeId::OverclockInput);
        let value = if focused {
            format!("{}█", input.value)
        } else if input.value.is_empty() {
            "----".to_string()
        } else {
            input.value.clone()
        };
        controls.extend(control_spans("Overclock MHz", &value, focused, input.disabled));
    }
    if !controls.is_empty() {
        frame.render_widget(Paragraph::new(Line::from(controls)), rows[3]);
    }
}

fn render_gauge(frame: &mut Frame, area: Rect, surface: &Surface) {
    let cols = Layout::horizontal([
        Constraint::Length(10),
        Constraint::Min(10),
        Constraint::Length(10),
    ])
    .split(area);

    let min_label = surface.text(NodeId::FreqMinLabel).unwrap_or("");
    let max_label = surface.text(NodeId::FreqMaxLabel).unwrap_or("");
    frame.render_widget(Paragraph::new(min_label.to_string()).style(Styles::dim()), cols[0]);
    frame.render_widget(
        Paragraph::new(format!("{:>10}", max_label)).style(Styles::dim()),
        cols[2],
    );

    let label = surface.text(NodeId::FreqText).unwrap_or("N/A").to_string();
    match surface.fill(NodeId::FreqFill) {
        Some(fill) if fill.percent.is_some() => {
            let percent = fill.percent.unwrap_or(0).min(100) as u16;
            let gauge = Gauge::default()
                .gauge_style(Styles::gauge(fill.palette))
                .percent(percent)
                .label(label);
            frame.render_widget(gauge, cols[1]);
        }
        _ => {
            frame.render_widget(Paragraph::new(label).style(Styles::dim()), cols[1]);
        }
    }
}

fn control_spans(label: &str, value: &str, focused: bool, disabled: bool) -> Vec<Span<'static>> {
    let style = if disabled {
        Styles::disabled()
    } else if focused {
        Styles::focused()
    } else {
        Styles::default()
    };
    let value = if disabled {
        format!("[ {} … ]", value)
    } else {
        format!("[ {} ]", value)
    };
    vec![
        Span::styled(format!("{}: ", label), Styles::label()),
        Span::styled(value, style),
        Span::raw("   "),
    ]
}
