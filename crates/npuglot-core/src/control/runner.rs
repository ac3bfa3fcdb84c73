//! Runs write commands on worker threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::rpc::{NpuRpc, RpcError, WriteReply};
use crate::surface::{NodeId, Surface};

use super::{Command, Notification};

struct Settled {
    command: Command,
    /// `None` if the worker panicked.
    outcome: Option<Result<WriteReply, RpcError>>,
    elapsed: Duration,
}

/// Executes commands without blocking the caller.
///
/// At most one request per control is in flight. The control is disabled on
/// [`submit`](Self::submit) and re-enabled when the result is collected by
/// [`drain`](Self::drain) or [`wait`](Self::wait), whatever the outcome.
///
/// A panicking write is caught and reported as a failure only when panics
/// unwind. The release profile sets `panic = "abort"`, so there a panic in
/// the transport ends the process.
pub struct CommandRunner<R: NpuRpc + 'static> {
    rpc: Arc<R>,
    tx: Sender<Settled>,
    rx: Receiver<Settled>,
    in_flight: Vec<NodeId>,
}

impl<R: NpuRpc + 'static> CommandRunner<R> {
    pub fn new(rpc: Arc<R>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rpc,
            tx,
            rx,
            in_flight: Vec::new(),
        }
    }

    /// Starts `command`. Returns `false` if its control already has a
    /// request in flight; nothing is sent in that case.
    pub fn submit(&mut self, command: Command, surface: &mut Surface) -> bool {
        let control = command.control();
        if self.in_flight.contains(&control) {
            debug!(?control, "request already in flight, ignoring");
            return false;
        }
        self.in_flight.push(control);
        surface.set_disabled(control, true);
        debug!(?command, "submitting write");

        let rpc = Arc::clone(&self.rpc);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let t0 = Instant::now();
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| command.execute(rpc.as_ref()))).ok();
            let _ = tx.send(Settled {
                command,
                outcome,
                elapsed: t0.elapsed(),
            });
        });
        true
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Collects every settled command without blocking.
    pub fn drain(&mut self, surface: &mut Surface) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(settled) = self.rx.try_recv() {
            out.push(self.settle(settled, surface));
        }
        out
    }

    /// Blocks up to `timeout` for the next settled command.
    pub fn wait(&mut self, surface: &mut Surface, timeout: Duration) -> Option<Notification> {
        match self.rx.recv_timeout(timeout) {
            Ok(settled) => Some(self.settle(settled, surface)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn settle(&mut self, settled: Settled, surface: &mut Surface) -> Notification {
        let control = settled.command.control();
        self.in_flight.retain(|c| *c != control);
        surface.set_disabled(control, false);

        let notification = Notification::for_outcome(&settled.command, settled.outcome.as_ref());
        let duration_ms = settled.elapsed.as_millis() as u64;
        if notification.is_error() {
            warn!(duration_ms, message = %notification.message, "write failed");
        } else {
            info!(duration_ms, message = %notification.message, "write applied");
        }
        notification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{NoticeLevel, OverclockPlan, check_overclock};
    use crate::model::PollSnapshot;
    use crate::rpc::MockRpc;
    use crate::rpc::mock::WriteCall;
    use crate::view::{Capabilities, render_initial};
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn surface() -> Surface {
        render_initial(
            &PollSnapshot::default(),
            Capabilities { controls: true },
            100,
        )
    }

    #[test]
    fn out_of_range_overclock_never_sent() {
        let rpc = Arc::new(MockRpc::typical_device());
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        if let Ok(plan) = check_overclock("1700") {
            runner.submit(Command::SetOverclock(plan.mhz()), &mut surface);
        }
        assert_eq!(runner.in_flight(), 0);
        assert!(runner.wait(&mut surface, Duration::from_millis(50)).is_none());
        assert!(rpc.writes().is_empty());
    }

    #[test]
    fn high_overclock_waits_for_confirmation() {
        let rpc = Arc::new(MockRpc::typical_device());
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        let plan = check_overclock("1450").unwrap();
        assert_eq!(plan, OverclockPlan::Confirm(1450));
        // Declined: nothing happens.
        assert!(rpc.writes().is_empty());

        // Accepted.
        runner.submit(Command::SetOverclock(plan.mhz()), &mut surface);
        runner.wait(&mut surface, TIMEOUT).unwrap();
        assert_eq!(rpc.writes(), vec![WriteCall::Overclock(1450)]);
    }

    #[test]
    fn nominal_overclock_sends_immediately() {
        let rpc = Arc::new(MockRpc::typical_device());
        rpc.reply_writes_with(Ok(json!({
            "result": "ok", "actual_mhz": 1000, "pcw": 2621440, "posdiv": 2
        })));
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        let OverclockPlan::Send(mhz) = check_overclock("1000").unwrap() else {
            panic!("1000 MHz must not need confirmation");
        };
        assert!(runner.submit(Command::SetOverclock(mhz), &mut surface));
        assert!(surface.is_disabled(NodeId::OverclockInput));

        let n = runner.wait(&mut surface, TIMEOUT).unwrap();
        assert_eq!(n.level, NoticeLevel::Info);
        assert!(n.message.contains("PCW 2621440, POSDIV 2"));
        assert!(!surface.is_disabled(NodeId::OverclockInput));
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn control_reenabled_on_rejection() {
        let rpc = Arc::new(MockRpc::typical_device());
        rpc.reply_writes_with(Ok(json!({"error": "Invalid governor"})));
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        runner.submit(Command::SetGovernor("turbo".to_string()), &mut surface);
        assert!(surface.is_disabled(NodeId::GovernorSelect));
        let n = runner.wait(&mut surface, TIMEOUT).unwrap();
        assert!(n.is_error());
        assert!(!surface.is_disabled(NodeId::GovernorSelect));
    }

    #[test]
    fn control_reenabled_on_transport_failure() {
        let rpc = Arc::new(MockRpc::typical_device());
        rpc.reply_writes_with(Err(RpcError::Transport("connection reset".to_string())));
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        runner.submit(Command::SetMaxFreq(1_200_000), &mut surface);
        let n = runner.wait(&mut surface, TIMEOUT).unwrap();
        assert!(n.message.contains("connection reset"));
        assert!(!surface.is_disabled(NodeId::MaxFreqSelect));
    }

    #[test]
    fn unexpected_reply_is_failure() {
        let rpc = Arc::new(MockRpc::typical_device());
        rpc.reply_writes_with(Ok(json!({"result": "maybe"})));
        let mut runner = CommandRunner::new(rpc);
        let mut surface = surface();

        runner.submit(Command::SetMaxFreq(800_000), &mut surface);
        let n = runner.wait(&mut surface, TIMEOUT).unwrap();
        assert!(n.is_error());
        assert!(!surface.is_disabled(NodeId::MaxFreqSelect));
    }

    struct PanickingRpc;

    impl NpuRpc for PanickingRpc {
        fn fetch_status(&self) -> Result<serde_json::Value, RpcError> {
            Ok(json!({}))
        }
        fn fetch_flows(&self) -> Result<serde_json::Value, RpcError> {
            Ok(json!({}))
        }
        fn set_governor(&self, _: &str) -> Result<WriteReply, RpcError> {
            panic!("boom")
        }
        fn set_max_freq(&self, _: u64) -> Result<WriteReply, RpcError> {
            panic!("boom")
        }
        fn set_overclock(&self, _: u32) -> Result<WriteReply, RpcError> {
            panic!("boom")
        }
    }

    #[test]
    fn control_reenabled_when_worker_panics() {
        let mut runner = CommandRunner::new(Arc::new(PanickingRpc));
        let mut surface = surface();

        runner.submit(Command::SetGovernor("ondemand".to_string()), &mut surface);
        let n = runner.wait(&mut surface, TIMEOUT).unwrap();
        assert!(n.is_error());
        assert!(!surface.is_disabled(NodeId::GovernorSelect));
    }

    #[test]
    fn one_request_per_control() {
        let rpc = Arc::new(MockRpc::typical_device());
        let mut runner = CommandRunner::new(rpc.clone());
        let mut surface = surface();

        assert!(runner.submit(Command::SetGovernor("ondemand".to_string()), &mut surface));
        assert!(!runner.submit(Command::SetGovernor("performance".to_string()), &mut surface));
        // Different control is independent.
        assert!(runner.submit(Command::SetMaxFreq(1_000_000), &mut surface));

        runner.wait(&mut surface, TIMEOUT).unwrap();
        runner.wait(&mut surface, TIMEOUT).unwrap();
        assert_eq!(runner.in_flight(), 0);
        assert!(runner.drain(&mut surface).is_empty());
        assert_eq!(rpc.writes().len(), 2);
    }
}
