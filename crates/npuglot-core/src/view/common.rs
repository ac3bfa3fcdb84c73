//! Derived display values shared by the initial render and reconciliation.

use crate::fmt::{aggregate_memory, format_bytes, format_freq_mhz, format_npu_clock, format_offload, format_packets};
use crate::metrics::normalize_frequency;
use crate::model::{FlowEntry, FlowSnapshot, FlowState, StatusSnapshot};
use crate::surface::{Badge, Fill, FlowRow, Palette, SelectOption, Tone};

/// Flow table column titles.
pub const FLOW_HEADER: [&str; 8] = [
    "Index",
    "State",
    "Type",
    "Original Flow",
    "New Flow",
    "Ethernet",
    "Packets",
    "Bytes",
];

/// The three parts of the frequency bar, computed together so they never
/// disagree within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqBar {
    pub text: String,
    pub fill: Fill,
    pub min_label: String,
    pub max_label: String,
}

impl FreqBar {
    pub fn from_status(status: &StatusSnapshot) -> Self {
        match normalize_frequency(
            status.cpu_hw_freq,
            status.cpu_min_freq,
            status.cpu_max_freq,
            status.pll_freq_mhz,
        ) {
            Some(gauge) => Self {
                text: gauge.label,
                fill: Fill {
                    percent: Some(gauge.percent),
                    palette: if gauge.overclocked {
                        Palette::Overclock
                    } else {
                        Palette::Nominal
                    },
                },
                min_label: gauge.min_label,
                max_label: gauge.bound_label,
            },
            None => Self {
                text: format_freq_mhz(status.cpu_hw_freq),
                fill: Fill::default(),
                min_label: format_freq_mhz(status.cpu_min_freq),
                max_label: format_freq_mhz(status.cpu_max_freq),
            },
        }
    }
}

pub fn governor_badges(status: &StatusSnapshot) -> Vec<Badge> {
    status
        .governors()
        .into_iter()
        .map(|gov| {
            let tone = if gov == status.cpu_governor {
                Tone::Active
            } else {
                Tone::Inactive
            };
            Badge::new(gov, tone)
        })
        .collect()
}

pub fn governor_options(status: &StatusSnapshot) -> Vec<SelectOption> {
    status
        .governors()
        .into_iter()
        .map(|gov| SelectOption {
            value: gov.to_string(),
            label: gov.to_string(),
        })
        .collect()
}

pub fn max_freq_options(status: &StatusSnapshot) -> Vec<SelectOption> {
    status
        .available_freqs()
        .into_iter()
        .map(|khz| SelectOption {
            value: khz.to_string(),
            label: format_freq_mhz(khz),
        })
        .collect()
}

pub fn npu_status_badge(status: &StatusSnapshot) -> Badge {
    let tone = if status.npu_loaded {
        Tone::Success
    } else {
        Tone::Danger
    };
    Badge::new(status.npu_status_text(), tone)
}

pub fn npu_version_text(status: &StatusSnapshot) -> String {
    match status.npu_version.as_deref() {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "Not available".to_string(),
    }
}

pub fn npu_clock_text(status: &StatusSnapshot) -> String {
    format!(
        "{} / {} cores",
        format_npu_clock(status.npu_clock),
        status.npu_cores
    )
}

pub fn npu_memory_text(status: &StatusSnapshot) -> String {
    format!(
        "{} ({} regions)",
        aggregate_memory(&status.memory_regions),
        status.memory_regions.len()
    )
}

pub fn npu_offload_text(status: &StatusSnapshot) -> String {
    format_offload(status.offload_packets, status.offload_bytes)
}

/// Summary line. Counts use every entry, not just the displayed rows.
pub fn flow_summary(flows: &FlowSnapshot) -> String {
    format!(
        "Total: {} | Bound: {} | Unbound: {}",
        flows.total(),
        flows.count(FlowState::Bound),
        flows.count(FlowState::Unbound)
    )
}

pub fn flow_row(entry: &FlowEntry) -> FlowRow {
    let tone = match entry.state_kind() {
        FlowState::Bound => Tone::Success,
        _ => Tone::Neutral,
    };
    FlowRow {
        index: entry.index.to_string(),
        state: Badge::new(entry.state.clone(), tone),
        kind: entry.kind.clone(),
        orig: entry.orig_display().to_string(),
        new_flow: entry.new_flow_display().to_string(),
        eth: entry.eth_display().to_string(),
        packets: format_packets(entry.packets),
        bytes: format_bytes(entry.bytes),
    }
}

/// First `cap` entries in their given order.
pub fn flow_rows(flows: &FlowSnapshot, cap: usize) -> impl Iterator<Item = FlowRow> + '_ {
    flows.entries.iter().take(cap).map(flow_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryRegion;

    #[test]
    fn freq_bar_unavailable_without_max() {
        let status = StatusSnapshot {
            cpu_hw_freq: 1_000_000,
            ..StatusSnapshot::default()
        };
        let bar = FreqBar::from_status(&status);
        assert_eq!(bar.fill.percent, None);
        assert_eq!(bar.text, "1000 MHz");
        assert_eq!(bar.max_label, "N/A");
    }

    #[test]
    fn freq_bar_overclock_palette() {
        let status = StatusSnapshot {
            cpu_hw_freq: 1_400_000,
            cpu_min_freq: 500_000,
            cpu_max_freq: 1_400_000,
            pll_freq_mhz: 1600,
            ..StatusSnapshot::default()
        };
        let bar = FreqBar::from_status(&status);
        assert_eq!(bar.fill.percent, Some(100));
        assert_eq!(bar.fill.palette, Palette::Overclock);
        assert_eq!(bar.text, "1600 MHz (OC)");
        assert_eq!(bar.max_label, "1600 MHz");
    }

    #[test]
    fn governor_badges_highlight_active() {
        let status = StatusSnapshot {
            cpu_avail_governors: " ondemand  performance ".to_string(),
            cpu_governor: "performance".to_string(),
            ..StatusSnapshot::default()
        };
        let badges = governor_badges(&status);
        assert_eq!(badges.len(), 2);
        assert_eq!(badges[0].tone, Tone::Inactive);
        assert_eq!(badges[1], Badge::new("performance", Tone::Active));
    }

    #[test]
    fn npu_texts() {
        let status = StatusSnapshot {
            npu_clock: Some(500_000_000),
            npu_cores: 2,
            memory_regions: vec![
                MemoryRegion {
                    size: "512 KiB".to_string(),
                    ..MemoryRegion::default()
                },
                MemoryRegion {
                    size: "2 MiB".to_string(),
                    ..MemoryRegion::default()
                },
            ],
            ..StatusSnapshot::default()
        };
        assert_eq!(npu_clock_text(&status), "500 MHz / 2 cores");
        assert_eq!(npu_memory_text(&status), "3 MiB (2 regions)");
        assert_eq!(npu_version_text(&status), "Not available");
        assert_eq!(npu_status_badge(&status), Badge::new("Not Active", Tone::Danger));
    }

    #[test]
    fn max_freq_options_use_khz_values() {
        let status = StatusSnapshot {
            cpu_avail_freqs: "500000 1400000 junk".to_string(),
            ..StatusSnapshot::default()
        };
        let options = max_freq_options(&status);
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].value, "1400000");
        assert_eq!(options[1].label, "1400 MHz");
    }
}
