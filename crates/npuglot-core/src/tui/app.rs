//! Main TUI application.

use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::control::CommandRunner;
use crate::poll::{TickScheduler, register_poll};
use crate::provider::{LiveProvider, SnapshotProvider};
use crate::rpc::NpuRpc;
use crate::view::{Capabilities, Dashboard};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
pub struct App<R: NpuRpc + 'static> {
    provider: Rc<RefCell<LiveProvider<R>>>,
    dashboard: Rc<RefCell<Dashboard>>,
    scheduler: TickScheduler,
    runner: CommandRunner<R>,
    state: AppState,
    interval: Duration,
    should_quit: bool,
}

impl<R: NpuRpc + 'static> App<R> {
    /// Creates the app. `is_live` is false for the built-in demo device.
    pub fn new(rpc: Arc<R>, config: &DashboardConfig, is_live: bool) -> Self {
        let capabilities = Capabilities {
            controls: config.controls,
        };
        Self {
            provider: Rc::new(RefCell::new(LiveProvider::new(Arc::clone(&rpc)))),
            dashboard: Rc::new(RefCell::new(Dashboard::new(
                capabilities,
                config.flow_row_cap,
            ))),
            scheduler: TickScheduler::new(),
            runner: CommandRunner::new(rpc),
            state: AppState::new(is_live),
            interval: config.poll_interval,
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self, tick_rate: Duration) -> io::Result<()> {
        // Initial render before the first periodic tick.
        let snapshot = self.provider.borrow_mut().advance();
        self.dashboard.borrow_mut().mount(&snapshot);
        self.sync_error();
        register_poll(
            &mut self.scheduler,
            self.provider.clone(),
            self.dashboard.clone(),
            self.interval,
        );
        info!(
            interval_s = self.interval.as_secs(),
            controls = self.dashboard.borrow().capabilities().controls,
            "dashboard started"
        );

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal, tick_rate);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let events = EventHandler::new(tick_rate);

        loop {
            self.collect_writes();
            self.state.expire_notification(Instant::now());

            {
                let dashboard = self.dashboard.borrow();
                terminal.draw(|frame| render(frame, &self.state, &dashboard))?;
            }

            match events.next() {
                Ok(Event::Tick) => {
                    if !self.state.paused && self.scheduler.run_due(Instant::now()) > 0 {
                        self.sync_error();
                    }
                }
                Ok(Event::Key(key)) => {
                    let action = {
                        let mut dashboard = self.dashboard.borrow_mut();
                        handle_key(&mut self.state, dashboard.surface_mut(), key)
                    };
                    match action {
                        KeyAction::Quit => self.should_quit = true,
                        KeyAction::Refresh => self.refresh(),
                        KeyAction::Submit(command) => {
                            let mut dashboard = self.dashboard.borrow_mut();
                            self.runner.submit(command, dashboard.surface_mut());
                        }
                        KeyAction::None => {}
                    }
                }
                Ok(Event::Resize) => {}
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Out-of-schedule poll (`r`).
    fn refresh(&mut self) {
        debug!("manual refresh");
        let snapshot = self.provider.borrow_mut().advance();
        self.dashboard.borrow_mut().apply(&snapshot);
        self.sync_error();
    }

    fn collect_writes(&mut self) {
        let notifications = {
            let mut dashboard = self.dashboard.borrow_mut();
            self.runner.drain(dashboard.surface_mut())
        };
        for n in notifications {
            self.state.notify(n);
        }
    }

    fn sync_error(&mut self) {
        self.state.last_error = self
            .provider
            .borrow()
            .last_error()
            .map(|e| e.to_string());
    }
}
