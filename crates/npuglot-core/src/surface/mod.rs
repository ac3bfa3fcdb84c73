//! Rendered surface: addressable display nodes.
//!
//! The surface is built once by [`crate::view::render_initial`] and then
//! mutated in place by every poll. Nodes are keyed by stable [`NodeId`]s.
//! Lookups of ids that are not mounted return `None`; callers skip them.

mod node;

pub use node::{Badge, Fill, FlowRow, FlowTable, Input, Node, Palette, Select, SelectOption, Tone};

use std::collections::BTreeMap;

/// Stable identifiers of the display nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    FreqMinLabel,
    FreqText,
    FreqFill,
    FreqMaxLabel,
    GovernorBadges,
    CpuCount,
    GovernorSelect,
    MaxFreqSelect,
    OverclockInput,
    NpuVersion,
    NpuStatus,
    NpuClock,
    NpuMemory,
    NpuOffload,
    FlowSummary,
    FlowTable,
}

impl NodeId {
    /// Interactive controls, in focus order.
    pub const CONTROLS: [NodeId; 3] = [
        NodeId::GovernorSelect,
        NodeId::MaxFreqSelect,
        NodeId::OverclockInput,
    ];

    pub fn is_control(self) -> bool {
        Self::CONTROLS.contains(&self)
    }
}

/// Display nodes by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    nodes: BTreeMap<NodeId, Node>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, id: NodeId, node: Node) {
        self.nodes.insert(id, node);
    }

    pub fn unmount(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.get(id)? {
            Node::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match self.get_mut(id)? {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn badge(&self, id: NodeId) -> Option<&Badge> {
        match self.get(id)? {
            Node::Badge(b) => Some(b),
            _ => None,
        }
    }

    pub fn badge_mut(&mut self, id: NodeId) -> Option<&mut Badge> {
        match self.get_mut(id)? {
            Node::Badge(b) => Some(b),
            _ => None,
        }
    }

    pub fn badges(&self, id: NodeId) -> Option<&[Badge]> {
        match self.get(id)? {
            Node::Badges(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    pub fn badges_mut(&mut self, id: NodeId) -> Option<&mut Vec<Badge>> {
        match self.get_mut(id)? {
            Node::Badges(b) => Some(b),
            _ => None,
        }
    }

    pub fn fill(&self, id: NodeId) -> Option<&Fill> {
        match self.get(id)? {
            Node::Fill(f) => Some(f),
            _ => None,
        }
    }

    pub fn fill_mut(&mut self, id: NodeId) -> Option<&mut Fill> {
        match self.get_mut(id)? {
            Node::Fill(f) => Some(f),
            _ => None,
        }
    }

    pub fn select(&self, id: NodeId) -> Option<&Select> {
        match self.get(id)? {
            Node::Select(s) => Some(s),
            _ => None,
        }
    }

    pub fn select_mut(&mut self, id: NodeId) -> Option<&mut Select> {
        match self.get_mut(id)? {
            Node::Select(s) => Some(s),
            _ => None,
        }
    }

    pub fn input(&self, id: NodeId) -> Option<&Input> {
        match self.get(id)? {
            Node::Input(i) => Some(i),
            _ => None,
        }
    }

    pub fn input_mut(&mut self, id: NodeId) -> Option<&mut Input> {
        match self.get_mut(id)? {
            Node::Input(i) => Some(i),
            _ => None,
        }
    }

    pub fn table(&self, id: NodeId) -> Option<&FlowTable> {
        match self.get(id)? {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn table_mut(&mut self, id: NodeId) -> Option<&mut FlowTable> {
        match self.get_mut(id)? {
            Node::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Marks a control as under exclusive user edit (or releases it).
    /// Returns `false` if the id is not a mounted control.
    pub fn set_edit_lock(&mut self, id: NodeId, locked: bool) -> bool {
        match self.get_mut(id) {
            Some(Node::Select(s)) => {
                s.edit_lock = locked;
                true
            }
            Some(Node::Input(i)) => {
                i.edit_lock = locked;
                true
            }
            _ => false,
        }
    }

    pub fn is_edit_locked(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(Node::Select(s)) => s.edit_lock,
            Some(Node::Input(i)) => i.edit_lock,
            _ => false,
        }
    }

    /// Disables or re-enables a control. Returns `false` if not mounted.
    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> bool {
        match self.get_mut(id) {
            Some(Node::Select(s)) => {
                s.disabled = disabled;
                true
            }
            Some(Node::Input(i)) => {
                i.disabled = disabled;
                true
            }
            _ => false,
        }
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        match self.get(id) {
            Some(Node::Select(s)) => s.disabled,
            Some(Node::Input(i)) => i.disabled,
            _ => false,
        }
    }
}
