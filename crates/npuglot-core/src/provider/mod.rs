//! Provider abstraction for per-tick snapshot sources.
//!
//! A provider always yields a snapshot: a failed read degrades to the
//! defaulted snapshot and is reported through `last_error()`, so the view
//! shows `N/A`/zero values instead of freezing.

mod live;

pub use live::LiveProvider;

use crate::model::PollSnapshot;
use crate::rpc::RpcError;

/// Error types that can occur while taking a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The scalar status read failed.
    Status(RpcError),
    /// The flow table read failed.
    Flows(RpcError),
    /// Both reads failed.
    Both { status: RpcError, flows: RpcError },
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Status(e) => write!(f, "status read failed: {}", e),
            ProviderError::Flows(e) => write!(f, "flow table read failed: {}", e),
            ProviderError::Both { status, .. } => write!(f, "device unreachable: {}", status),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Source of poll snapshots.
pub trait SnapshotProvider {
    /// Takes a new snapshot. Never fails; see `last_error()` for degraded reads.
    fn advance(&mut self) -> PollSnapshot;

    /// Returns the error of the last `advance()`, if any read failed.
    fn last_error(&self) -> Option<&ProviderError>;

    /// Returns `true` if this provider talks to a live device.
    fn is_live(&self) -> bool {
        true
    }
}
