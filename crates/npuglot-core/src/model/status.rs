//! Scalar CPU/NPU state at one poll instant.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::lenient;

/// One reserved-memory region of the NPU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryRegion {
    #[serde(deserialize_with = "lenient")]
    pub name: String,
    /// Free-form size such as `"512 KiB"` or `"2MiB"`.
    #[serde(deserialize_with = "lenient")]
    pub size: String,
}

/// Result of the `getStatus` call.
///
/// Frequencies are in kHz except `npu_clock` (Hz) and `pll_freq_mhz` (MHz).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    #[serde(deserialize_with = "lenient")]
    pub cpu_hw_freq: u64,
    #[serde(deserialize_with = "lenient")]
    pub cpu_min_freq: u64,
    #[serde(deserialize_with = "lenient")]
    pub cpu_max_freq: u64,
    /// Space separated governor names.
    #[serde(deserialize_with = "lenient")]
    pub cpu_avail_governors: String,
    #[serde(deserialize_with = "lenient")]
    pub cpu_governor: String,
    #[serde(deserialize_with = "lenient")]
    pub cpu_count: u32,
    /// Space separated kHz values.
    #[serde(deserialize_with = "lenient")]
    pub cpu_avail_freqs: String,
    #[serde(deserialize_with = "lenient")]
    pub npu_version: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub npu_loaded: bool,
    #[serde(deserialize_with = "lenient")]
    pub npu_device: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub npu_clock: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub npu_cores: u32,
    #[serde(deserialize_with = "lenient")]
    pub memory_regions: Vec<MemoryRegion>,
    #[serde(deserialize_with = "lenient")]
    pub offload_packets: u64,
    #[serde(deserialize_with = "lenient")]
    pub offload_bytes: u64,
    /// PLL output in MHz; 0, negative or absent means "not overclocked".
    #[serde(deserialize_with = "lenient")]
    pub pll_freq_mhz: i64,
}

impl StatusSnapshot {
    /// Decodes a raw response field by field.
    ///
    /// A field with the wrong type takes its default without affecting the
    /// others; only a response that is not an object at all yields the
    /// all-default snapshot.
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        match serde_json::from_value(value) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "status response did not decode, using defaults");
                Self::default()
            }
        }
    }

    /// Advertised governors, empty tokens dropped.
    pub fn governors(&self) -> Vec<&str> {
        self.cpu_avail_governors.split_whitespace().collect()
    }

    /// Advertised operating points in kHz. Non-numeric tokens are skipped.
    pub fn available_freqs(&self) -> Vec<u64> {
        self.cpu_avail_freqs
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect()
    }

    /// NPU status badge text.
    pub fn npu_status_text(&self) -> String {
        if !self.npu_loaded {
            return "Not Active".to_string();
        }
        match self.npu_device.as_deref() {
            Some(device) if !device.is_empty() => format!("Active ({})", device),
            _ => "Active".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_response() {
        let status = StatusSnapshot::from_value(json!({
            "cpu_hw_freq": 1_200_000,
            "cpu_min_freq": 500_000,
            "cpu_max_freq": 1_400_000,
            "cpu_avail_governors": "performance  schedutil ",
            "cpu_governor": "schedutil",
            "cpu_count": 4,
            "cpu_avail_freqs": "500000 1000000 1400000",
            "npu_version": "2.0.1",
            "npu_loaded": true,
            "npu_device": "npu@1e900000",
            "npu_clock": 400_000_000u64,
            "npu_cores": 2,
            "memory_regions": [{"name": "fw", "size": "512 KiB"}],
            "offload_packets": 10,
            "offload_bytes": 2048,
            "pll_freq_mhz": 0
        }));
        assert_eq!(status.cpu_hw_freq, 1_200_000);
        assert_eq!(status.governors(), vec!["performance", "schedutil"]);
        assert_eq!(status.available_freqs(), vec![500_000, 1_000_000, 1_400_000]);
        assert_eq!(status.memory_regions.len(), 1);
        assert_eq!(status.npu_status_text(), "Active (npu@1e900000)");
    }

    #[test]
    fn missing_and_null_fields_default() {
        let status = StatusSnapshot::from_value(json!({
            "cpu_max_freq": null,
            "npu_loaded": null,
            "memory_regions": null,
            "npu_version": null
        }));
        assert_eq!(status, StatusSnapshot::default());
        assert_eq!(status.npu_status_text(), "Not Active");
    }

    #[test]
    fn malformed_response_defaults() {
        assert_eq!(StatusSnapshot::from_value(json!("oops")), StatusSnapshot::default());
        assert_eq!(StatusSnapshot::from_value(Value::Null), StatusSnapshot::default());
    }

    #[test]
    fn bad_field_keeps_its_siblings() {
        let status = StatusSnapshot::from_value(json!({
            "cpu_hw_freq": 1_200_000,
            "cpu_max_freq": 1_400_000,
            "cpu_count": "four",
            "npu_loaded": true,
            "offload_packets": 1500,
            "pll_freq_mhz": -1
        }));
        assert_eq!(status.cpu_count, 0);
        assert_eq!(status.cpu_hw_freq, 1_200_000);
        assert_eq!(status.cpu_max_freq, 1_400_000);
        assert_eq!(status.pll_freq_mhz, -1);
        assert_eq!(status.offload_packets, 1500);
        assert_eq!(status.npu_status_text(), "Active");
    }

    #[test]
    fn numbers_as_floats_and_strings() {
        let status = StatusSnapshot::from_value(json!({
            "cpu_hw_freq": 1_200_000.0,
            "cpu_max_freq": "1400000",
            "npu_loaded": true,
            "npu_clock": "oops",
            "npu_cores": 2.0,
            "memory_regions": [{"name": "fw", "size": "512 KiB"}, "junk"]
        }));
        assert_eq!(status.cpu_hw_freq, 1_200_000);
        assert_eq!(status.cpu_max_freq, 1_400_000);
        assert!(status.npu_loaded);
        assert_eq!(status.npu_clock, None);
        assert_eq!(status.npu_cores, 2);
        assert_eq!(status.memory_regions.len(), 2);
        assert_eq!(status.memory_regions[0].size, "512 KiB");
        assert_eq!(status.memory_regions[1], MemoryRegion::default());
    }

    #[test]
    fn active_without_device_name() {
        let status = StatusSnapshot {
            npu_loaded: true,
            npu_device: Some(String::new()),
            ..StatusSnapshot::default()
        };
        assert_eq!(status.npu_status_text(), "Active");
    }
}
