//! NPU information section.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::surface::{NodeId, Surface};
use crate::tui::style::Styles;

pub const NPU_HEIGHT: u16 = 7;

pub fn render_npu(frame: &mut Frame, area: Rect, surface: &Surface) {
    let block = Block::default()
        .title(Span::styled(" NPU Information ", Styles::section_title()))
        .borders(Borders::ALL);

    let row = |label: &'static str, id: NodeId| {
        Line::from(vec![
            Span::styled(format!("{:<22}", label), Styles::label()),
            Span::raw(surface.text(id).unwrap_or("-").to_string()),
        ])
    };

    let status = match surface.badge(NodeId::NpuStatus) {
        Some(badge) => Span::styled(badge.text.clone(), Styles::tone(badge.tone)),
        None => Span::raw("-"),
    };

    let lines = vec![
        row("NPU Firmware Version", NodeId::NpuVersion),
        Line::from(vec![
            Span::styled(format!("{:<22}", "NPU Status"), Styles::label()),
            status,
        ]),
        row("NPU Clock / Cores", NodeId::NpuClock),
        row("Reserved Memory", NodeId::NpuMemory),
        row("Offload Statistics", NodeId::NpuOffload),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
