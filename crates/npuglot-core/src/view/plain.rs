//! Plain-text dump of a surface, used by headless mode.

use std::fmt::Write;

use crate::surface::{Badge, NodeId, Surface};

fn badge_list(badges: &[Badge]) -> String {
    if badges.is_empty() {
        return "N/A".to_string();
    }
    badges
        .iter()
        .map(|b| match b.tone {
            crate::surface::Tone::Active => format!("[{}]", b.text),
            _ => b.text.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders every mounted node as `label: value` lines followed by the flow
/// table. Nodes that are not mounted are left out.
pub fn render_plain(surface: &Surface) -> String {
    let mut out = String::new();
    let text = |id| surface.text(id).unwrap_or("-");

    let _ = writeln!(out, "CPU");
    if let Some(fill) = surface.fill(NodeId::FreqFill) {
        let bar = match fill.percent {
            Some(p) => format!("{p}%"),
            None => "unavailable".to_string(),
        };
        let _ = writeln!(
            out,
            "  Frequency:  {} [{} .. {}] {}",
            text(NodeId::FreqText),
            text(NodeId::FreqMinLabel),
            text(NodeId::FreqMaxLabel),
            bar
        );
    }
    if let Some(badges) = surface.badges(NodeId::GovernorBadges) {
        let _ = writeln!(out, "  Governors:  {}", badge_list(badges));
    }
    let _ = writeln!(out, "  Cores:      {}", text(NodeId::CpuCount));

    let _ = writeln!(out, "NPU");
    let _ = writeln!(out, "  Version:    {}", text(NodeId::NpuVersion));
    if let Some(status) = surface.badge(NodeId::NpuStatus) {
        let _ = writeln!(out, "  Status:     {}", status.text);
    }
    let _ = writeln!(out, "  Clock:      {}", text(NodeId::NpuClock));
    let _ = writeln!(out, "  Memory:     {}", text(NodeId::NpuMemory));
    let _ = writeln!(out, "  Offload:    {}", text(NodeId::NpuOffload));

    let _ = writeln!(out, "PPE flows ({})", text(NodeId::FlowSummary));
    if let Some(table) = surface.table(NodeId::FlowTable) {
        let _ = writeln!(out, "  {}", table.header.join("\t"));
        for row in &table.rows {
            let _ = writeln!(out, "  {}", row.cells().join("\t"));
        }
    }
    out
}
