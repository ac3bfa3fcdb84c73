//! Terminal input and redraw ticks.
//!
//! A reader thread forwards key presses and resizes and emits `Tick` on a
//! fixed cadence. Ticks are due by deadline, so held-down keys cannot starve
//! the poll scheduler that runs on them.

use std::sync::mpsc::{self, Receiver, RecvError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

#[derive(Debug)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    /// The next draw picks up the new size.
    Resize,
}

/// Maps a raw terminal event onto an app event. Key releases and repeats
/// (reported on Windows), mouse and focus events are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(..) => Some(Event::Resize),
        _ => None,
    }
}

pub struct EventHandler {
    rx: Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let mut next_tick = Instant::now() + tick_rate;
            loop {
                let wait = next_tick.saturating_duration_since(Instant::now());
                if event::poll(wait).unwrap_or(false)
                    && let Ok(raw) = event::read()
                    && let Some(ev) = translate(raw)
                    && tx.send(ev).is_err()
                {
                    return;
                }
                if Instant::now() >= next_tick {
                    if tx.send(Event::Tick).is_err() {
                        return;
                    }
                    next_tick = Instant::now() + tick_rate;
                }
            }
        });

        Self { rx }
    }

    /// Blocks until the next event. Fails only if the reader thread died.
    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}
