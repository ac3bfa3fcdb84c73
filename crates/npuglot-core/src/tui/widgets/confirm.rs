//! Confirmation popups: quit and high overclock.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::control::OVERCLOCK_CONFIRM_ABOVE_MHZ;

/// Centered popup area (50% width, fixed height), clamped.
fn popup_area(area: Rect) -> Rect {
    let popup_width = (area.width * 50 / 100).clamp(40, 64).min(area.width);
    let popup_height = area.height.clamp(7, 9);

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(area.x + popup_x, area.y + popup_y, popup_width, popup_height)
}

fn render_popup(frame: &mut Frame, area: Rect, title: &str, border: Color, content: Vec<Line>) {
    let popup_area = popup_area(area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn key_line(keys: &[&'static str], what: &'static str) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" or ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!(" → {}", what),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

/// Renders a centered quit confirmation popup.
pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(Span::styled(
            "Are you sure you want to quit?",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        key_line(&["Enter", "q"], "quit"),
        key_line(&["Esc", "n"], "cancel"),
    ];
    render_popup(frame, area, " Exit npuglot ", Color::Cyan, content);
}

/// Renders the confirmation for an overclock above the safe threshold.
pub fn render_overclock_confirm(frame: &mut Frame, area: Rect, mhz: u32) {
    let content = vec![
        Line::from(Span::styled(
            format!("Set CPU PLL to {} MHz?", mhz),
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(
            format!(
                "Above {} MHz the SoC may become unstable.",
                OVERCLOCK_CONFIRM_ABOVE_MHZ
            ),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        key_line(&["Enter", "y"], "apply"),
        key_line(&["Esc", "n"], "cancel"),
    ];
    render_popup(frame, area, " Confirm overclock ", Color::Red, content);
}
