//! Periodic fetch-and-reconcile.
//!
//! The host owns the timing. The core only registers one callback with a
//! [`Scheduler`]; [`TickScheduler`] is the host implementation the terminal
//! event loop drives.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::provider::SnapshotProvider;
use crate::view::Dashboard;

/// Callback invoked once per tick.
pub type PollCallback = Box<dyn FnMut()>;

/// Periodic invocation host.
pub trait Scheduler {
    /// Calls `callback` every `interval`, first one `interval` from now.
    fn register_periodic(&mut self, callback: PollCallback, interval: Duration);
}

struct Periodic {
    callback: PollCallback,
    interval: Duration,
    next_due: Instant,
}

/// Cooperative scheduler: runs whatever is due when asked.
///
/// Each callback runs to completion before the next one starts. Ticks missed
/// while the host was busy are skipped, never replayed in a burst.
#[derive(Default)]
pub struct TickScheduler {
    tasks: Vec<Periodic>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback due at `now`. Returns how many ran.
    pub fn run_due(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        for task in &mut self.tasks {
            if task.next_due > now {
                continue;
            }

            let t0 = Instant::now();
            (task.callback)();
            ran += 1;

            let elapsed = t0.elapsed();
            if elapsed > task.interval / 2 {
                warn!(
                    duration_ms = elapsed.as_millis() as u64,
                    interval_ms = task.interval.as_millis() as u64,
                    "slow tick, more than half the poll interval"
                );
            }

            let mut skipped = 0u32;
            task.next_due += task.interval;
            while task.next_due <= now {
                task.next_due += task.interval;
                skipped += 1;
            }
            if skipped > 0 {
                debug!(skipped, "missed ticks skipped");
            }
        }
        ran
    }

    /// Earliest instant at which something becomes due.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.next_due).min()
    }

    /// Time until the next due callback, zero if already due.
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due()
            .map(|due| due.saturating_duration_since(now))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Scheduler for TickScheduler {
    fn register_periodic(&mut self, callback: PollCallback, interval: Duration) {
        // A zero interval would spin in run_due.
        let interval = interval.max(Duration::from_millis(1));
        self.tasks.push(Periodic {
            callback,
            interval,
            next_due: Instant::now() + interval,
        });
    }
}

/// Registers the fetch-and-reconcile callback.
///
/// Each tick advances the provider (both reads, concurrently) and applies
/// the resulting snapshot to the dashboard. A failed read still produces a
/// defaulted snapshot, so the loop never stops on errors.
pub fn register_poll(
    scheduler: &mut dyn Scheduler,
    provider: Rc<RefCell<dyn SnapshotProvider>>,
    dashboard: Rc<RefCell<Dashboard>>,
    interval: Duration,
) {
    let callback = move || {
        let snapshot = provider.borrow_mut().advance();
        let report = dashboard.borrow_mut().apply(&snapshot);
        debug!(
            timestamp = snapshot.timestamp,
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            held = report.held.len(),
            "poll applied"
        );
    };
    scheduler.register_periodic(Box::new(callback), interval);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::LiveProvider;
    use crate::rpc::MockRpc;
    use crate::surface::NodeId;
    use crate::view::Capabilities;
    use serde_json::json;
    use std::cell::Cell;
    use std::sync::Arc;

    const INTERVAL: Duration = Duration::from_secs(5);

    fn counter(scheduler: &mut TickScheduler) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        scheduler.register_periodic(Box::new(move || c.set(c.get() + 1)), INTERVAL);
        count
    }

    #[test]
    fn nothing_runs_before_first_interval() {
        let mut scheduler = TickScheduler::new();
        let count = counter(&mut scheduler);
        assert_eq!(scheduler.run_due(Instant::now()), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn runs_once_per_interval() {
        let mut scheduler = TickScheduler::new();
        let count = counter(&mut scheduler);
        let t = Instant::now();

        scheduler.run_due(t + INTERVAL);
        assert_eq!(count.get(), 1);
        // Same instant again: already serviced.
        scheduler.run_due(t + INTERVAL);
        assert_eq!(count.get(), 1);
        scheduler.run_due(t + INTERVAL * 2);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn missed_ticks_are_skipped_not_bursted() {
        let mut scheduler = TickScheduler::new();
        let count = counter(&mut scheduler);
        let t = Instant::now();

        // Host stalled for ten intervals.
        assert_eq!(scheduler.run_due(t + INTERVAL * 10), 1);
        assert_eq!(scheduler.run_due(t + INTERVAL * 10), 0);
        assert_eq!(count.get(), 1);
        assert!(scheduler.next_due().unwrap() > t + INTERVAL * 10);
    }

    #[test]
    fn until_next_saturates_at_zero() {
        let mut scheduler = TickScheduler::new();
        assert!(scheduler.until_next(Instant::now()).is_none());
        counter(&mut scheduler);
        let later = Instant::now() + INTERVAL * 3;
        assert_eq!(scheduler.until_next(later), Some(Duration::ZERO));
    }

    #[test]
    fn poll_callback_reconciles_dashboard() {
        let rpc = Arc::new(MockRpc::typical_device());
        let provider = Rc::new(RefCell::new(LiveProvider::new(rpc.clone())));
        let dashboard = Rc::new(RefCell::new(Dashboard::new(Capabilities::default(), 100)));
        let initial = provider.borrow_mut().advance();
        dashboard.borrow_mut().mount(&initial);

        let mut scheduler = TickScheduler::new();
        register_poll(&mut scheduler, provider.clone(), dashboard.clone(), INTERVAL);
        let t = Instant::now();

        rpc.set_flows(json!({"entries": [{"state": "BND"}, {"state": "BND"}]}));
        scheduler.run_due(t + INTERVAL);
        assert_eq!(
            dashboard.borrow().surface().text(NodeId::FlowSummary),
            Some("Total: 2 | Bound: 2 | Unbound: 0")
        );

        // A failing transport degrades the display, the loop keeps going.
        rpc.fail_reads(true);
        scheduler.run_due(t + INTERVAL * 2);
        assert_eq!(
            dashboard.borrow().surface().text(NodeId::FreqText),
            Some("N/A")
        );
        assert!(provider.borrow().last_error().is_some());

        rpc.fail_reads(false);
        scheduler.run_due(t + INTERVAL * 3);
        assert_eq!(
            dashboard.borrow().surface().text(NodeId::FreqText),
            Some("1200 MHz")
        );
        assert_eq!(rpc.reads(), 8);
    }
}
