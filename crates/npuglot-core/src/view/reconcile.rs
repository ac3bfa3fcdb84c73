//! In-place reconciliation of the surface against a fresh snapshot.
//!
//! Every field is updated independently: a node that is not mounted is
//! recorded as skipped and the remaining fields still update. Controls under
//! an edit lock keep the user's pending value.

use tracing::trace;

use crate::model::PollSnapshot;
use crate::surface::{Badge, NodeId, SelectOption, Surface};

use super::common::{
    FreqBar, flow_rows, flow_summary, governor_badges, governor_options, max_freq_options,
    npu_clock_text, npu_memory_text, npu_offload_text, npu_status_badge, npu_version_text,
};

/// What one reconciliation pass touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Nodes written with the new snapshot's values.
    pub updated: Vec<NodeId>,
    /// Nodes that were not mounted.
    pub skipped: Vec<NodeId>,
    /// Controls left untouched because the user is editing them.
    pub held: Vec<NodeId>,
}

impl ReconcileReport {
    fn record(&mut self, id: NodeId, mounted: bool) {
        if mounted {
            self.updated.push(id);
        } else {
            self.skipped.push(id);
        }
    }

    fn text(&mut self, surface: &mut Surface, id: NodeId, value: String) {
        let slot = surface.text_mut(id);
        let mounted = slot.is_some();
        if let Some(slot) = slot {
            *slot = value;
        }
        self.record(id, mounted);
    }

    fn badge(&mut self, surface: &mut Surface, id: NodeId, value: Badge) {
        let slot = surface.badge_mut(id);
        let mounted = slot.is_some();
        if let Some(slot) = slot {
            *slot = value;
        }
        self.record(id, mounted);
    }

    fn badges(&mut self, surface: &mut Surface, id: NodeId, value: Vec<Badge>) {
        let slot = surface.badges_mut(id);
        let mounted = slot.is_some();
        if let Some(slot) = slot {
            *slot = value;
        }
        self.record(id, mounted);
    }

    /// Forces the select to the device value unless it is edit-locked.
    fn select(
        &mut self,
        surface: &mut Surface,
        id: NodeId,
        options: Vec<SelectOption>,
        value: String,
    ) {
        let Some(select) = surface.select_mut(id) else {
            self.skipped.push(id);
            return;
        };
        if select.edit_lock {
            self.held.push(id);
            return;
        }
        select.options = options;
        select.value = value;
        self.updated.push(id);
    }
}

/// Patches `surface` to match `snapshot`.
///
/// Idempotent: applying the same snapshot twice leaves the surface as one
/// application does. The flow table body is cleared and rebuilt with at
/// most `row_cap` rows; the summary counts the full entry list.
pub fn reconcile(surface: &mut Surface, snapshot: &PollSnapshot, row_cap: usize) -> ReconcileReport {
    let status = &snapshot.status;
    let flows = &snapshot.flows;
    let mut report = ReconcileReport::default();

    // Frequency bar: label, fill width and palette from the same gauge.
    let bar = FreqBar::from_status(status);
    report.text(surface, NodeId::FreqText, bar.text);
    let fill = surface.fill_mut(NodeId::FreqFill);
    let mounted = fill.is_some();
    if let Some(fill) = fill {
        *fill = bar.fill;
    }
    report.record(NodeId::FreqFill, mounted);
    report.text(surface, NodeId::FreqMinLabel, bar.min_label);
    report.text(surface, NodeId::FreqMaxLabel, bar.max_label);

    report.badges(surface, NodeId::GovernorBadges, governor_badges(status));
    report.text(surface, NodeId::CpuCount, status.cpu_count.to_string());

    report.select(
        surface,
        NodeId::GovernorSelect,
        governor_options(status),
        status.cpu_governor.clone(),
    );
    report.select(
        surface,
        NodeId::MaxFreqSelect,
        max_freq_options(status),
        status.cpu_max_freq.to_string(),
    );

    report.text(surface, NodeId::NpuVersion, npu_version_text(status));
    report.badge(surface, NodeId::NpuStatus, npu_status_badge(status));
    report.text(surface, NodeId::NpuClock, npu_clock_text(status));
    report.text(surface, NodeId::NpuMemory, npu_memory_text(status));
    report.text(surface, NodeId::NpuOffload, npu_offload_text(status));

    report.text(surface, NodeId::FlowSummary, flow_summary(flows));
    match surface.table_mut(NodeId::FlowTable) {
        Some(table) => {
            table.rows.clear();
            table.rows.extend(flow_rows(flows, row_cap));
            report.updated.push(NodeId::FlowTable);
        }
        None => report.skipped.push(NodeId::FlowTable),
    }

    trace!(
        updated = report.updated.len(),
        skipped = report.skipped.len(),
        held = report.held.len(),
        "surface reconciled"
    );
    report
}
