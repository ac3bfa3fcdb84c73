//! Live data provider backed by an [`NpuRpc`] transport.

use std::sync::Arc;
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::model::{FlowSnapshot, PollSnapshot, StatusSnapshot};
use crate::rpc::{NpuRpc, RpcError};

use super::{ProviderError, SnapshotProvider};

/// Provider for real-time device data.
///
/// Issues the status and flow-table reads of a tick concurrently and waits
/// for both. The pair is not atomic on the device side.
pub struct LiveProvider<R: NpuRpc> {
    rpc: Arc<R>,
    last_error: Option<ProviderError>,
    ticks: u64,
}

impl<R: NpuRpc> LiveProvider<R> {
    pub fn new(rpc: Arc<R>) -> Self {
        Self {
            rpc,
            last_error: None,
            ticks: 0,
        }
    }

    fn fetch_both(&self) -> (Result<StatusSnapshot, RpcError>, Result<FlowSnapshot, RpcError>) {
        let rpc = &*self.rpc;
        thread::scope(|s| {
            let flows = s.spawn(|| rpc.fetch_flows().map(FlowSnapshot::from_value));
            let status = rpc.fetch_status().map(StatusSnapshot::from_value);
            let flows = flows
                .join()
                .unwrap_or_else(|_| Err(RpcError::Transport("flow read aborted".to_string())));
            (status, flows)
        })
    }
}

impl<R: NpuRpc> SnapshotProvider for LiveProvider<R> {
    fn advance(&mut self) -> PollSnapshot {
        let t0 = Instant::now();
        let (status, flows) = self.fetch_both();
        self.ticks += 1;

        self.last_error = match (&status, &flows) {
            (Ok(_), Ok(_)) => None,
            (Err(e), Ok(_)) => Some(ProviderError::Status(e.clone())),
            (Ok(_), Err(e)) => Some(ProviderError::Flows(e.clone())),
            (Err(s), Err(f)) => Some(ProviderError::Both {
                status: s.clone(),
                flows: f.clone(),
            }),
        };

        if let Some(ref e) = self.last_error {
            warn!(error = %e, tick = self.ticks, "degraded poll, showing defaults");
        }

        let snapshot = PollSnapshot {
            status: status.unwrap_or_default(),
            flows: flows.unwrap_or_default(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0),
        };

        debug!(
            duration_ms = t0.elapsed().as_millis() as u64,
            tick = self.ticks,
            flows = snapshot.flows.total(),
            "snapshot fetched"
        );
        snapshot
    }

    fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_ref()
    }
}
