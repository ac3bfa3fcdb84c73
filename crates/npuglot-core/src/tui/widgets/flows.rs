//! PPE flow-offload table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::surface::{NodeId, Surface};
use crate::tui::state::AppState;
use crate::tui::style::Styles;

const WIDTHS: [Constraint; 8] = [
    Constraint::Length(6),  // Index
    Constraint::Length(5),  // State
    Constraint::Length(10), // Type
    Constraint::Fill(1),    // Original Flow
    Constraint::Fill(1),    // New Flow
    Constraint::Length(36), // Ethernet
    Constraint::Length(9),  // Packets
    Constraint::Length(11), // Bytes
];

pub fn render_flows(frame: &mut Frame, area: Rect, surface: &Surface, state: &AppState) {
    let block = Block::default()
        .title(Span::styled(
            " PPE Flow Offload Entries ",
            Styles::section_title(),
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(inner);

    let summary = surface.text(NodeId::FlowSummary).unwrap_or("");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(summary.to_string(), Styles::dim()))),
        chunks[0],
    );

    let Some(table) = surface.table(NodeId::FlowTable) else {
        return;
    };

    let header = Row::new(table.header.iter().map(|h| Cell::from(*h))).style(Styles::table_header());
    let rows = table.rows.iter().skip(state.flow_scroll).map(|row| {
        let cells = row.cells();
        Row::new(cells.into_iter().enumerate().map(|(i, text)| {
            let cell = Cell::from(text.to_string());
            if i == 1 {
                cell.style(Styles::tone(row.state.tone))
            } else {
                cell
            }
        }))
    });

    let widget = Table::new(rows, WIDTHS).header(header).column_spacing(1);
    frame.render_widget(widget, chunks[1]);
}
