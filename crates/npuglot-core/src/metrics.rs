//! Frequency bar normalization.
//!
//! Maps a live CPU frequency onto a `[0, 100]` bar position against the
//! nominal `[min, max]` range. When the PLL is programmed above the nominal
//! maximum the bar is pinned to 100% and labelled as overclocked.

use crate::fmt::format_freq_mhz;

/// Normalized frequency bar values. All fields derive from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqGauge {
    /// Fill position, always within `0..=100`.
    pub percent: u8,
    /// Text drawn over the bar.
    pub label: String,
    /// Text at the left end of the bar.
    pub min_label: String,
    /// Text at the right end of the bar.
    pub bound_label: String,
    /// Selects the warning palette instead of the nominal one.
    pub overclocked: bool,
}

/// Normalizes a frequency reading for the bar.
///
/// All frequencies in kHz except `pll_mhz`, where zero or negative means
/// the PLL is not overclocked. Returns `None` when `max_khz`
/// is zero: no bar can be drawn without an upper bound.
pub fn normalize_frequency(
    hw_khz: u64,
    min_khz: u64,
    max_khz: u64,
    pll_mhz: i64,
) -> Option<FreqGauge> {
    if max_khz == 0 {
        return None;
    }

    let pll_khz = u64::try_from(pll_mhz).unwrap_or(0).saturating_mul(1000);
    let overclocked = pll_khz > max_khz;

    let (value, bound) = if overclocked {
        (pll_khz, pll_khz)
    } else {
        (hw_khz, max_khz)
    };

    let label = if overclocked {
        format!("{} MHz (OC)", pll_mhz)
    } else {
        format_freq_mhz(hw_khz)
    };

    Some(FreqGauge {
        percent: bar_percent(value, min_khz, bound),
        label,
        min_label: format_freq_mhz(min_khz),
        bound_label: format_freq_mhz(bound),
        overclocked,
    })
}

/// `round((value - min) / (bound - min) * 100)` clamped to `0..=100`;
/// a degenerate range yields 0.
fn bar_percent(value: u64, min: u64, bound: u64) -> u8 {
    if bound == min {
        return 0;
    }
    let span = bound as f64 - min as f64;
    let pct = ((value as f64 - min as f64) / span * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
