//! Shared formatting helpers.
//!
//! All pure formatting functions (no ratatui styles, no layout) live here.
//! Every function is total: degenerate input maps to a sentinel string.

use crate::model::MemoryRegion;

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format byte count with base-1024 scaling and two decimals.
///
/// `0` -> `"0 B"`, `1024` -> `"1.00 KB"`, `1536` -> `"1.50 KB"`.
/// Values past the terabyte range stay in TB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while unit < BYTE_UNITS.len() - 1 && scaled >= 1024.0 {
        scaled /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", round2(scaled), BYTE_UNITS[unit])
}

/// Two-decimal rounding with ties away from zero: `1.125` -> `1.13`.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Format packet count with decimal K/M suffixes.
///
/// `0` -> `"0"`, `999` -> `"999"`, `1500` -> `"1.50K"`, `2_500_000` -> `"2.50M"`.
pub fn format_packets(packets: u64) -> String {
    if packets == 0 {
        "0".to_string()
    } else if packets >= 1_000_000 {
        format!("{:.2}M", round2(packets as f64 / 1_000_000.0))
    } else if packets >= 1_000 {
        format!("{:.2}K", round2(packets as f64 / 1_000.0))
    } else {
        packets.to_string()
    }
}

/// Format a kHz frequency as whole MHz, `"N/A"` for zero.
pub fn format_freq_mhz(khz: u64) -> String {
    if khz == 0 {
        return "N/A".to_string();
    }
    format!("{} MHz", (khz as f64 / 1000.0).round() as u64)
}

/// Format an NPU clock given in Hz as whole MHz, `"N/A"` when absent or zero.
pub fn format_npu_clock(hz: Option<u64>) -> String {
    match hz {
        Some(hz) if hz > 0 => format!("{} MHz", (hz as f64 / 1_000_000.0).round() as u64),
        _ => "N/A".to_string(),
    }
}

/// Sum reserved-memory region sizes and format the total.
///
/// Each size string is scanned for `<digits><spaces>(KiB|MiB|GiB|KB|MB|GB)`
/// (case-insensitive, first match wins). Unparsable entries contribute 0.
/// Totals of at least 1024 KiB are shown as rounded MiB.
pub fn aggregate_memory(regions: &[MemoryRegion]) -> String {
    let total_kib = regions
        .iter()
        .filter_map(|r| parse_size_kib(&r.size))
        .fold(0u64, u64::saturating_add);

    if total_kib >= 1024 {
        format!("{} MiB", (total_kib as f64 / 1024.0).round() as u64)
    } else {
        format!("{} KiB", total_kib)
    }
}

/// Extracts the first `<number> <unit>` pair from a size string, in KiB.
fn parse_size_kib(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let digits = &s[start..pos];

        let mut unit_start = pos;
        while unit_start < bytes.len() && bytes[unit_start].is_ascii_whitespace() {
            unit_start += 1;
        }

        if let Some(multiplier) = unit_multiplier(&s[unit_start..]) {
            // Digit runs too long for u64 saturate rather than drop the region.
            let value = digits.parse::<u64>().unwrap_or(u64::MAX);
            return Some(value.saturating_mul(multiplier));
        }
    }

    None
}

/// KiB multiplier for the unit the string starts with.
fn unit_multiplier(rest: &str) -> Option<u64> {
    const UNITS: [(&str, u64); 6] = [
        ("KIB", 1),
        ("MIB", 1024),
        ("GIB", 1024 * 1024),
        ("KB", 1),
        ("MB", 1024),
        ("GB", 1024 * 1024),
    ];
    UNITS.iter().find_map(|&(unit, mult)| {
        rest.get(..unit.len())
            .filter(|head| head.eq_ignore_ascii_case(unit))
            .map(|_| mult)
    })
}

/// Offload counter line: `"1.50K packets / 2.00 MB"`.
pub fn format_offload(packets: u64, bytes: u64) -> String {
    format!("{} packets / {}", format_packets(packets), format_bytes(bytes))
}

/// Truncate string to max chars with unicode ellipsis (`…`).
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(sizes: &[&str]) -> Vec<MemoryRegion> {
        sizes
            .iter()
            .map(|s| MemoryRegion {
                size: s.to_string(),
                ..MemoryRegion::default()
            })
            .collect()
    }

    #[test]
    fn bytes_unit_boundaries() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1), "1.00 B");
        assert_eq!(format_bytes(1023), "1023.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1152), "1.13 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_bytes(1024u64.pow(4)), "1.00 TB");
        assert_eq!(format_bytes(2048 * 1024u64.pow(4)), "2048.00 TB");
    }

    #[test]
    fn packets_suffixes() {
        assert_eq!(format_packets(0), "0");
        assert_eq!(format_packets(999), "999");
        assert_eq!(format_packets(1000), "1.00K");
        assert_eq!(format_packets(1500), "1.50K");
        assert_eq!(format_packets(2_500_000), "2.50M");
        assert_eq!(format_packets(1125), "1.13K");
        assert_eq!(format_packets(1375), "1.38K");
        assert_eq!(format_packets(2_625_000), "2.63M");
    }

    #[test]
    fn freq_mhz() {
        assert_eq!(format_freq_mhz(0), "N/A");
        assert_eq!(format_freq_mhz(1_400_000), "1400 MHz");
        assert_eq!(format_freq_mhz(1_199_600), "1200 MHz");
        assert_eq!(format_freq_mhz(500), "1 MHz");
    }

    #[test]
    fn npu_clock() {
        assert_eq!(format_npu_clock(None), "N/A");
        assert_eq!(format_npu_clock(Some(0)), "N/A");
        assert_eq!(format_npu_clock(Some(500_000_000)), "500 MHz");
    }

    #[test]
    fn memory_mixed_units() {
        assert_eq!(aggregate_memory(&regions(&["512 KiB", "2 MiB"])), "3 MiB");
        assert_eq!(aggregate_memory(&regions(&["1GB"])), "1024 MiB");
        assert_eq!(aggregate_memory(&regions(&["100 kb", "200 KB"])), "300 KiB");
        assert_eq!(aggregate_memory(&regions(&["1024 KiB"])), "1 MiB");
    }

    #[test]
    fn memory_ignores_unparsable() {
        assert_eq!(aggregate_memory(&regions(&["bogus"])), "0 KiB");
        assert_eq!(aggregate_memory(&regions(&["", "12 bytes", "4 MiB"])), "4 MiB");
        assert_eq!(aggregate_memory(&[]), "0 KiB");
    }

    #[test]
    fn memory_size_found_inside_text() {
        // First number followed by a unit wins, earlier bare numbers are skipped.
        assert_eq!(aggregate_memory(&regions(&["0x8000 (64 KiB)"])), "64 KiB");
        assert_eq!(aggregate_memory(&regions(&["12 34 MiB"])), "34 MiB");
    }

    #[test]
    fn offload_line() {
        assert_eq!(format_offload(1500, 1024), "1.50K packets / 1.00 KB");
        assert_eq!(format_offload(0, 0), "0 packets / 0 B");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 4), "abc…");
    }
}
