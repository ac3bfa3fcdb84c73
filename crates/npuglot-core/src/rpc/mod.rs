//! Transport abstraction for the device's remote procedures.
//!
//! Reads return raw JSON; decoding into snapshots is lenient and lives in
//! [`crate::model`]. Writes return a [`WriteReply`] classifying the device
//! answer.
//!
//! ```text
//!        ┌──────────────┐
//!        │   NpuRpc     │ (trait)
//!        └──────┬───────┘
//!        ┌──────┴───────┐
//! ┌──────▼──────┐ ┌─────▼─────┐
//! │ UbusClient  │ │  MockRpc  │
//! │ (HTTP)      │ │ (Testing) │
//! └─────────────┘ └───────────┘
//! ```

pub mod mock;
#[cfg(feature = "ubus")]
mod ubus;

pub use mock::MockRpc;
#[cfg(feature = "ubus")]
pub use ubus::UbusClient;

use serde_json::Value;

/// Error type for remote calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Request could not be delivered or the reply could not be read.
    Transport(String),
    /// Endpoint answered with a non-zero status code.
    Status { code: i64, message: String },
    /// Reply did not have the expected envelope.
    Protocol(String),
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "transport error: {}", msg),
            RpcError::Status { code, message } => {
                write!(f, "call failed with status {}: {}", code, message)
            }
            RpcError::Protocol(msg) => write!(f, "protocol error: {}", msg),
        }
    }
}

impl std::error::Error for RpcError {}

/// Device answer to a write command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteReply {
    /// `{result: "ok"}`. Overclock replies also carry the applied frequency
    /// and the PLL programming values, kept as the raw JSON text.
    Applied {
        actual_mhz: Option<String>,
        pcw: Option<String>,
        posdiv: Option<String>,
    },
    /// `{error: "..."}`.
    Rejected(String),
    /// Anything else.
    Unexpected(String),
}

impl WriteReply {
    pub fn from_value(value: &Value) -> Self {
        if let Some(err) = value.get("error") {
            let msg = match err {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return WriteReply::Rejected(msg);
        }

        if value.get("result").and_then(Value::as_str) == Some("ok") {
            return WriteReply::Applied {
                actual_mhz: verbatim(value, "actual_mhz"),
                pcw: verbatim(value, "pcw"),
                posdiv: verbatim(value, "posdiv"),
            };
        }

        WriteReply::Unexpected(value.to_string())
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, WriteReply::Applied { .. })
    }
}

/// Field as the device sent it: strings unquoted, numbers untouched.
fn verbatim(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Remote procedures of the status endpoint.
///
/// Implementations must be shareable across threads: the provider issues
/// both reads of a tick concurrently and writes run on worker threads.
pub trait NpuRpc: Send + Sync {
    /// Scalar CPU/NPU status.
    fn fetch_status(&self) -> Result<Value, RpcError>;

    /// Flow-offload table as `{ "entries": [...] }`.
    fn fetch_flows(&self) -> Result<Value, RpcError>;

    fn set_governor(&self, governor: &str) -> Result<WriteReply, RpcError>;

    fn set_max_freq(&self, khz: u64) -> Result<WriteReply, RpcError>;

    fn set_overclock(&self, mhz: u32) -> Result<WriteReply, RpcError>;
}
