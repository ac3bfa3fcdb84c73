//! Runtime configuration.

use std::time::Duration;

/// Default LuCI JSON-RPC endpoint on the router.
pub const DEFAULT_ENDPOINT: &str = "http://192.168.1.1/ubus";

/// Anonymous ubus session id.
pub const ANONYMOUS_SESSION: &str = "00000000000000000000000000000000";

/// ubus object exposing the status and control procedures.
pub const DEFAULT_OBJECT: &str = "luci.airoha_npu";

/// Poll interval of the status view.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Flow rows shown in the table. Summary counts always use the full list.
pub const DEFAULT_FLOW_ROW_CAP: usize = 100;

/// Timeout applied to every remote call.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything needed to run a dashboard against one device.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// URL of the JSON-RPC endpoint.
    pub endpoint: String,
    /// Session token passed with every call.
    pub session: String,
    /// ubus object name.
    pub object: String,
    pub poll_interval: Duration,
    pub rpc_timeout: Duration,
    pub flow_row_cap: usize,
    /// Mount governor/frequency/overclock controls.
    pub controls: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            session: ANONYMOUS_SESSION.to_string(),
            object: DEFAULT_OBJECT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            flow_row_cap: DEFAULT_FLOW_ROW_CAP,
            controls: false,
        }
    }
}
