//! LuCI `/ubus` JSON-RPC transport.
//!
//! Every call is a JSON-RPC 2.0 `call` request with params
//! `[session, object, method, args]`. A successful reply carries
//! `result: [0, data]`; a non-zero first element is the ubus status code.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use tracing::{debug, trace};

use super::{NpuRpc, RpcError, WriteReply};
use crate::config::DashboardConfig;

const METHOD_STATUS: &str = "getStatus";
const METHOD_FLOWS: &str = "getPpeEntries";
const METHOD_SET_GOVERNOR: &str = "setGovernor";
const METHOD_SET_MAX_FREQ: &str = "setMaxFreq";
const METHOD_SET_OVERCLOCK: &str = "setOverclock";

/// Blocking HTTP client for one device.
pub struct UbusClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    session: String,
    object: String,
    next_id: AtomicU64,
}

impl UbusClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, RpcError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.rpc_timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            session: config.session.clone(),
            object: config.object.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    fn call(&self, method: &str, args: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "call",
            "params": [self.session, self.object, method, args],
        });
        trace!(id, method, "ubus call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("HTTP {}", status)));
        }

        let body: Value = response
            .json()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let data = unwrap_envelope(body)?;
        debug!(id, method, "ubus call completed");
        Ok(data)
    }

    fn write(&self, method: &str, args: Value) -> Result<WriteReply, RpcError> {
        self.call(method, args).map(|v| WriteReply::from_value(&v))
    }
}

/// Extracts `data` from `{ result: [0, data] }`.
fn unwrap_envelope(body: Value) -> Result<Value, RpcError> {
    if let Some(err) = body.get("error") {
        return Err(RpcError::Status {
            code: err.get("code").and_then(Value::as_i64).unwrap_or(-1),
            message: err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let Some(Value::Array(mut result)) = body.get("result").cloned() else {
        return Err(RpcError::Protocol("missing result array".to_string()));
    };
    if result.is_empty() {
        return Err(RpcError::Protocol("empty result array".to_string()));
    }

    let code = result[0].as_i64().unwrap_or(-1);
    if code != 0 {
        return Err(RpcError::Status {
            code,
            message: ubus_status_name(code).to_string(),
        });
    }

    // `[0]` alone is a valid reply for calls without data.
    Ok(if result.len() > 1 {
        result.swap_remove(1)
    } else {
        Value::Object(Default::default())
    })
}

fn ubus_status_name(code: i64) -> &'static str {
    match code {
        1 => "invalid command",
        2 => "invalid argument",
        3 => "method not found",
        4 => "not found",
        5 => "no data",
        6 => "permission denied",
        7 => "timeout",
        8 => "not supported",
        _ => "unknown error",
    }
}

impl NpuRpc for UbusClient {
    fn fetch_status(&self) -> Result<Value, RpcError> {
        self.call(METHOD_STATUS, json!({}))
    }

    fn fetch_flows(&self) -> Result<Value, RpcError> {
        self.call(METHOD_FLOWS, json!({}))
    }

    fn set_governor(&self, governor: &str) -> Result<WriteReply, RpcError> {
        self.write(METHOD_SET_GOVERNOR, json!({ "governor": governor }))
    }

    fn set_max_freq(&self, khz: u64) -> Result<WriteReply, RpcError> {
        self.write(METHOD_SET_MAX_FREQ, json!({ "freq": khz }))
    }

    fn set_overclock(&self, mhz: u32) -> Result<WriteReply, RpcError> {
        self.write(METHOD_SET_OVERCLOCK, json!({ "freq": mhz }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_success() {
        let data = unwrap_envelope(json!({"jsonrpc": "2.0", "id": 1, "result": [0, {"a": 1}]}));
        assert_eq!(data, Ok(json!({"a": 1})));
    }

    #[test]
    fn envelope_without_data() {
        assert_eq!(unwrap_envelope(json!({"result": [0]})), Ok(json!({})));
    }

    #[test]
    fn envelope_status_code() {
        let err = unwrap_envelope(json!({"result": [6]})).unwrap_err();
        assert_eq!(
            err,
            RpcError::Status {
                code: 6,
                message: "permission denied".to_string()
            }
        );
    }

    #[test]
    fn envelope_jsonrpc_error() {
        let err =
            unwrap_envelope(json!({"error": {"code": -32002, "message": "Access denied"}}))
                .unwrap_err();
        assert_eq!(
            err,
            RpcError::Status {
                code: -32002,
                message: "Access denied".to_string()
            }
        );
    }

    #[test]
    fn envelope_garbage() {
        assert!(matches!(
            unwrap_envelope(json!({"foo": 1})),
            Err(RpcError::Protocol(_))
        ));
    }
}
