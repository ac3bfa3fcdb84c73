//! Terminal user interface.
//!
//! Draws the dashboard surface and routes keys to the focused control.
//! Polling runs on the UI thread through a [`crate::poll::TickScheduler`];
//! writes run on worker threads.

mod app;
mod event;
mod input;
mod render;
pub(crate) mod state;
pub(crate) mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, InputMode, PopupState};
