//! In-memory transport for tests and demo mode.
//!
//! Holds the JSON the device would return and records every write call.
//! Reads and writes can be made to fail to exercise degraded paths.

use std::sync::Mutex;

use serde_json::{Value, json};

use super::{NpuRpc, RpcError, WriteReply};

/// A write call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Governor(String),
    MaxFreq(u64),
    Overclock(u32),
}

#[derive(Debug, Default)]
struct MockState {
    status: Value,
    flows: Value,
    fail_reads: bool,
    write_reply: Option<Result<Value, RpcError>>,
    writes: Vec<WriteCall>,
    reads: usize,
}

/// Scripted device.
#[derive(Debug, Default)]
pub struct MockRpc {
    state: Mutex<MockState>,
}

impl MockRpc {
    pub fn new(status: Value, flows: Value) -> Self {
        Self {
            state: Mutex::new(MockState {
                status,
                flows,
                ..MockState::default()
            }),
        }
    }

    /// A router with four cores at 1.2 GHz, loaded NPU and a few flows.
    pub fn typical_device() -> Self {
        Self::new(
            json!({
                "cpu_hw_freq": 1_200_000,
                "cpu_min_freq": 500_000,
                "cpu_max_freq": 1_400_000,
                "cpu_avail_governors": "ondemand performance schedutil",
                "cpu_governor": "schedutil",
                "cpu_count": 4,
                "cpu_avail_freqs": "500000 800000 1000000 1200000 1400000",
                "npu_version": "2.1.0",
                "npu_loaded": true,
                "npu_device": "1e900000.npu",
                "npu_clock": 500_000_000u64,
                "npu_cores": 2,
                "memory_regions": [
                    {"name": "npu-firmware", "size": "512 KiB"},
                    {"name": "npu-pkt", "size": "2 MiB"}
                ],
                "offload_packets": 1_500,
                "offload_bytes": 3 * 1024 * 1024,
                "pll_freq_mhz": 0
            }),
            json!({
                "entries": [
                    {"index": 12, "state": "BND", "type": "IPv4 5T",
                     "orig": "192.168.1.10:51514->1.1.1.1:443", "new_flow": "203.0.113.5:51514->1.1.1.1:443",
                     "eth": "00:11:22:33:44:55->66:77:88:99:aa:bb", "packets": 2_500_000, "bytes": 3_221_225_472u64},
                    {"index": 40, "state": "UNB", "type": "IPv4 3T",
                     "orig": "192.168.1.11:5353->224.0.0.251:5353",
                     "eth": "00:00:00:00:00:00->00:00:00:00:00:00", "packets": 12, "bytes": 1_024},
                    {"index": 41, "state": "INV", "type": "IPv6 5T"}
                ]
            }),
        )
    }

    pub fn set_status(&self, status: Value) {
        self.lock().status = status;
    }

    pub fn set_flows(&self, flows: Value) {
        self.lock().flows = flows;
    }

    /// Makes every read return a transport error.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Reply returned by every write. Defaults to `{result: "ok"}`.
    pub fn reply_writes_with(&self, reply: Result<Value, RpcError>) {
        self.lock().write_reply = Some(reply);
    }

    /// Write calls received so far.
    pub fn writes(&self) -> Vec<WriteCall> {
        self.lock().writes.clone()
    }

    /// Number of read calls received so far (status and flows).
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not wedge the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self, pick: fn(&MockState) -> &Value) -> Result<Value, RpcError> {
        let mut state = self.lock();
        state.reads += 1;
        if state.fail_reads {
            return Err(RpcError::Transport("connection refused".to_string()));
        }
        Ok(pick(&state).clone())
    }

    fn write(&self, call: WriteCall) -> Result<WriteReply, RpcError> {
        let mut state = self.lock();
        state.writes.push(call);
        match &state.write_reply {
            Some(Ok(value)) => Ok(WriteReply::from_value(value)),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(WriteReply::from_value(&json!({"result": "ok"}))),
        }
    }
}

impl NpuRpc for MockRpc {
    fn fetch_status(&self) -> Result<Value, RpcError> {
        self.read(|s| &s.status)
    }

    fn fetch_flows(&self) -> Result<Value, RpcError> {
        self.read(|s| &s.flows)
    }

    fn set_governor(&self, governor: &str) -> Result<WriteReply, RpcError> {
        self.write(WriteCall::Governor(governor.to_string()))
    }

    fn set_max_freq(&self, khz: u64) -> Result<WriteReply, RpcError> {
        self.write(WriteCall::MaxFreq(khz))
    }

    fn set_overclock(&self, mhz: u32) -> Result<WriteReply, RpcError> {
        self.write(WriteCall::Overclock(mhz))
    }
}
