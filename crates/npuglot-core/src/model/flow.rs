//! PPE flow-offload table entries.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::lenient;

/// Ethernet pair reported for entries without L2 rewrite.
pub const ETH_NONE: &str = "00:00:00:00:00:00->00:00:00:00:00:00";

/// Binding state of a flow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// `BND`: hardware-accelerated.
    Bound,
    /// `UNB`: known but not offloaded.
    Unbound,
    /// Any other state string (e.g. `INV`, `DRP`). Counted in totals only.
    Other,
}

/// One row of the `getPpeEntries` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlowEntry {
    #[serde(deserialize_with = "lenient")]
    pub index: u64,
    #[serde(deserialize_with = "lenient")]
    pub state: String,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: String,
    #[serde(deserialize_with = "lenient")]
    pub orig: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub new_flow: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub eth: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub packets: u64,
    #[serde(deserialize_with = "lenient")]
    pub bytes: u64,
}

impl FlowEntry {
    pub fn state_kind(&self) -> FlowState {
        match self.state.as_str() {
            "BND" => FlowState::Bound,
            "UNB" => FlowState::Unbound,
            _ => FlowState::Other,
        }
    }

    /// Ethernet column: `-` for the all-zero pair, empty when absent.
    pub fn eth_display(&self) -> &str {
        match self.eth.as_deref() {
            Some(ETH_NONE) => "-",
            Some(eth) => eth,
            None => "",
        }
    }

    pub fn orig_display(&self) -> &str {
        non_empty_or_dash(self.orig.as_deref())
    }

    pub fn new_flow_display(&self) -> &str {
        non_empty_or_dash(self.new_flow.as_deref())
    }
}

fn non_empty_or_dash(s: Option<&str>) -> &str {
    match s {
        Some(s) if !s.is_empty() => s,
        _ => "-",
    }
}

/// Ordered flow table as returned by the device. Never truncated here;
/// the display cap is applied by the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub entries: Vec<FlowEntry>,
}

impl FlowSnapshot {
    /// Decodes `{ "entries": [...] }`.
    ///
    /// A missing or non-array `entries` yields an empty table. Entries that
    /// fail to decode are kept as defaulted rows so totals stay faithful.
    pub fn from_value(value: Value) -> Self {
        let entries = match value {
            Value::Object(mut map) => match map.remove("entries") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        let entries = entries
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).unwrap_or_else(|e| {
                    warn!(error = %e, "flow entry did not decode, keeping defaulted row");
                    FlowEntry::default()
                })
            })
            .collect();

        Self { entries }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn count(&self, state: FlowState) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state_kind() == state)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_states(states: &[&str]) -> FlowSnapshot {
        FlowSnapshot {
            entries: states
                .iter()
                .map(|s| FlowEntry {
                    state: s.to_string(),
                    ..FlowEntry::default()
                })
                .collect(),
        }
    }

    #[test]
    fn counts_other_states_in_total_only() {
        let flows = with_states(&["BND", "BND", "UNB", "FOO"]);
        assert_eq!(flows.total(), 4);
        assert_eq!(flows.count(FlowState::Bound), 2);
        assert_eq!(flows.count(FlowState::Unbound), 1);
        assert_eq!(flows.count(FlowState::Other), 1);
    }

    #[test]
    fn decodes_entries_in_order() {
        let flows = FlowSnapshot::from_value(json!({
            "entries": [
                {"index": 7, "state": "BND", "type": "IPv4 5T", "orig": "a", "new_flow": "b",
                 "eth": "aa:bb:cc:dd:ee:ff->11:22:33:44:55:66", "packets": 3, "bytes": 180},
                {"index": 2, "state": "UNB", "type": "IPv6 5T"}
            ]
        }));
        assert_eq!(flows.total(), 2);
        assert_eq!(flows.entries[0].index, 7);
        assert_eq!(flows.entries[0].kind, "IPv4 5T");
        assert_eq!(flows.entries[1].index, 2);
        assert_eq!(flows.entries[1].orig_display(), "-");
        assert_eq!(flows.entries[1].eth_display(), "");
    }

    #[test]
    fn non_array_entries_is_empty() {
        assert_eq!(FlowSnapshot::from_value(json!({"entries": "nope"})).total(), 0);
        assert_eq!(FlowSnapshot::from_value(json!({})).total(), 0);
        assert_eq!(FlowSnapshot::from_value(Value::Null).total(), 0);
    }

    #[test]
    fn malformed_entry_still_counted() {
        let flows = FlowSnapshot::from_value(json!({"entries": [42, {"state": "BND"}]}));
        assert_eq!(flows.total(), 2);
        assert_eq!(flows.entries[0], FlowEntry::default());
        assert_eq!(flows.count(FlowState::Bound), 1);
    }

    #[test]
    fn bad_counter_keeps_state() {
        let flows = FlowSnapshot::from_value(json!({
            "entries": [
                {"index": "12", "state": "BND", "packets": -5, "bytes": 96.0},
                {"index": 3.5, "state": "UNB", "eth": 0}
            ]
        }));
        assert_eq!(flows.count(FlowState::Bound), 1);
        assert_eq!(flows.count(FlowState::Unbound), 1);
        assert_eq!(flows.entries[0].index, 12);
        assert_eq!(flows.entries[0].packets, 0);
        assert_eq!(flows.entries[0].bytes, 96);
        assert_eq!(flows.entries[1].index, 0);
        assert_eq!(flows.entries[1].eth.as_deref(), Some("0"));
    }

    #[test]
    fn zero_eth_pair_shows_dash() {
        let entry = FlowEntry {
            eth: Some(ETH_NONE.to_string()),
            ..FlowEntry::default()
        };
        assert_eq!(entry.eth_display(), "-");
    }
}
