//! Device snapshots as delivered by the status endpoint.
//!
//! Both snapshot kinds are lenient: missing fields, `null` values and
//! wrongly shaped responses decode to documented defaults instead of errors,
//! so a degraded read still produces something the view can display.

mod flow;
mod status;

pub use flow::{ETH_NONE, FlowEntry, FlowSnapshot, FlowState};
pub use status::{MemoryRegion, StatusSnapshot};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One poll tick's pair of reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    pub status: StatusSnapshot,
    pub flows: FlowSnapshot,
    /// Unix seconds at which the tick was taken.
    pub timestamp: i64,
}

/// Per-field decoding that never fails: a value of the wrong shape becomes
/// `None` and the field falls back to its default.
pub(crate) trait Lenient: Default + Sized {
    fn from_json(value: &Value) -> Option<Self>;
}

/// Deserializes any JSON value, mapping `null` and non-conforming values to
/// `T::default()`. Only the field itself is affected, never its siblings.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Lenient,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::from_json(&value).unwrap_or_default())
}

/// Integral value of a JSON number or numeric string (`3`, `3.0`, `"3"`).
fn integral(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n.fract() == 0.0).then_some(n)
}

impl Lenient for u64 {
    fn from_json(value: &Value) -> Option<Self> {
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        integral(value)
            .filter(|n| *n >= 0.0 && *n <= u64::MAX as f64)
            .map(|n| n as u64)
    }
}

impl Lenient for u32 {
    fn from_json(value: &Value) -> Option<Self> {
        u64::from_json(value).and_then(|n| u32::try_from(n).ok())
    }
}

impl Lenient for i64 {
    fn from_json(value: &Value) -> Option<Self> {
        if let Some(n) = value.as_i64() {
            return Some(n);
        }
        integral(value)
            .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
            .map(|n| n as i64)
    }
}

impl Lenient for bool {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Lenient for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl<T: Lenient> Lenient for Option<T> {
    fn from_json(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }
        Some(T::from_json(value))
    }
}

impl Lenient for Vec<MemoryRegion> {
    fn from_json(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        Some(
            items
                .iter()
                .map(|item| MemoryRegion::deserialize(item).unwrap_or_default())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_from_floats_and_strings() {
        assert_eq!(u64::from_json(&json!(1_200_000)), Some(1_200_000));
        assert_eq!(u64::from_json(&json!(1_200_000.0)), Some(1_200_000));
        assert_eq!(u64::from_json(&json!(" 42 ")), Some(42));
        assert_eq!(u64::from_json(&json!(1.5)), None);
        assert_eq!(u64::from_json(&json!(-1)), None);
        assert_eq!(u64::from_json(&json!("four")), None);
        assert_eq!(i64::from_json(&json!(-1)), Some(-1));
        assert_eq!(i64::from_json(&json!("-3")), Some(-3));
        assert_eq!(u32::from_json(&json!(5_000_000_000u64)), None);
    }

    #[test]
    fn bools_and_strings() {
        assert_eq!(bool::from_json(&json!(true)), Some(true));
        assert_eq!(bool::from_json(&json!(1)), Some(true));
        assert_eq!(bool::from_json(&json!("0")), Some(false));
        assert_eq!(bool::from_json(&json!([])), None);
        assert_eq!(String::from_json(&json!(7)), Some("7".to_string()));
        assert_eq!(String::from_json(&json!({})), None);
    }

    #[test]
    fn option_keeps_null_and_drops_garbage() {
        assert_eq!(Option::<u64>::from_json(&Value::Null), Some(None));
        assert_eq!(Option::<u64>::from_json(&json!("x")), Some(None));
        assert_eq!(Option::<u64>::from_json(&json!(9)), Some(Some(9)));
    }
}
