//! Dashboard view: initial render and per-poll reconciliation.

mod common;
mod plain;
mod reconcile;

pub use common::{FLOW_HEADER, FreqBar, flow_summary};
pub use plain::render_plain;
pub use reconcile::{ReconcileReport, reconcile};

use crate::model::PollSnapshot;
use crate::surface::{Fill, FlowTable, Input, Node, NodeId, Select, Surface};

/// Optional features of the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Mount the governor / max-frequency / overclock controls.
    pub controls: bool,
}

/// Builds the complete surface for `snapshot`.
///
/// Nodes are mounted empty and then filled by [`reconcile`], so the first
/// frame and every later poll share one derivation path.
pub fn render_initial(snapshot: &PollSnapshot, caps: Capabilities, row_cap: usize) -> Surface {
    let mut surface = Surface::new();

    for id in [
        NodeId::FreqMinLabel,
        NodeId::FreqText,
        NodeId::FreqMaxLabel,
        NodeId::CpuCount,
        NodeId::NpuVersion,
        NodeId::NpuClock,
        NodeId::NpuMemory,
        NodeId::NpuOffload,
        NodeId::FlowSummary,
    ] {
        surface.mount(id, Node::Text(String::new()));
    }
    surface.mount(NodeId::FreqFill, Node::Fill(Fill::default()));
    surface.mount(NodeId::GovernorBadges, Node::Badges(Vec::new()));
    surface.mount(NodeId::NpuStatus, Node::Badge(Default::default()));
    surface.mount(
        NodeId::FlowTable,
        Node::Table(FlowTable {
            header: FLOW_HEADER.to_vec(),
            rows: Vec::new(),
        }),
    );

    if caps.controls {
        surface.mount(NodeId::GovernorSelect, Node::Select(Select::default()));
        surface.mount(NodeId::MaxFreqSelect, Node::Select(Select::default()));
        surface.mount(NodeId::OverclockInput, Node::Input(Input::default()));
    }

    reconcile(&mut surface, snapshot, row_cap);
    surface
}

/// A surface together with the settings it was rendered with.
#[derive(Debug, Clone)]
pub struct Dashboard {
    surface: Surface,
    capabilities: Capabilities,
    row_cap: usize,
    last_timestamp: Option<i64>,
}

impl Dashboard {
    /// Dashboard with nothing mounted yet. Polls before [`Dashboard::mount`]
    /// are skipped node by node.
    pub fn new(capabilities: Capabilities, row_cap: usize) -> Self {
        Self {
            surface: Surface::new(),
            capabilities,
            row_cap,
            last_timestamp: None,
        }
    }

    /// Performs the initial render.
    pub fn mount(&mut self, snapshot: &PollSnapshot) {
        self.surface = render_initial(snapshot, self.capabilities, self.row_cap);
        self.last_timestamp = Some(snapshot.timestamp);
    }

    pub fn apply(&mut self, snapshot: &PollSnapshot) -> ReconcileReport {
        let report = reconcile(&mut self.surface, snapshot, self.row_cap);
        if !report.updated.is_empty() {
            self.last_timestamp = Some(snapshot.timestamp);
        }
        report
    }

    /// Timestamp of the snapshot last shown, unix seconds.
    pub fn last_timestamp(&self) -> Option<i64> {
        self.last_timestamp
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.ids().next().is_some()
    }
}
