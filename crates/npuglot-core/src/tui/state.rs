//! Application state management.

use std::time::{Duration, Instant};

use crate::control::Notification;
use crate::surface::{NodeId, Surface};

/// How long a write notification stays in the header.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(8);

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// A control has focus and holds its edit lock.
    Editing,
}

/// Active popup state. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    /// Quit confirmation dialog.
    QuitConfirm,
    /// Overclock above the confirmation threshold awaiting a yes/no.
    OverclockConfirm { mhz: u32 },
}

/// Main application state.
#[derive(Debug, Default)]
pub struct AppState {
    pub input_mode: InputMode,
    /// Control currently holding focus.
    pub focus: Option<NodeId>,
    pub popup: PopupState,
    /// Polling suspended (`p`).
    pub paused: bool,
    pub is_live: bool,
    /// Temporary message, e.g. a rejected overclock value.
    pub status_message: Option<String>,
    /// Outcome of the last write and when it arrived.
    pub notification: Option<(Notification, Instant)>,
    /// Last poll read failure, cleared on recovery.
    pub last_error: Option<String>,
    /// First visible flow row.
    pub flow_scroll: usize,
}

impl AppState {
    pub fn new(is_live: bool) -> Self {
        Self {
            is_live,
            ..Self::default()
        }
    }

    /// Moves focus to `target`, moving the edit lock with it.
    pub fn focus(&mut self, surface: &mut Surface, target: Option<NodeId>) {
        if let Some(old) = self.focus.take() {
            surface.set_edit_lock(old, false);
        }
        match target {
            Some(id) if surface.set_edit_lock(id, true) => {
                self.focus = Some(id);
                self.input_mode = InputMode::Editing;
            }
            _ => {
                self.input_mode = InputMode::Normal;
            }
        }
    }

    /// Releases focus; the next poll converges the control to the device.
    pub fn blur(&mut self, surface: &mut Surface) {
        self.focus(surface, None);
    }

    /// Next mounted control after the focused one, wrapping through
    /// "no focus".
    pub fn cycle_target(&self, surface: &Surface, forward: bool) -> Option<NodeId> {
        let mounted: Vec<NodeId> = NodeId::CONTROLS
            .iter()
            .copied()
            .filter(|id| surface.is_mounted(*id))
            .collect();
        if mounted.is_empty() {
            return None;
        }
        let pos = self
            .focus
            .and_then(|f| mounted.iter().position(|id| *id == f));
        match (pos, forward) {
            (None, true) => mounted.first().copied(),
            (None, false) => mounted.last().copied(),
            (Some(i), true) => mounted.get(i + 1).copied(),
            (Some(0), false) => None,
            (Some(i), false) => mounted.get(i - 1).copied(),
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    /// Drops the notification once it has been shown long enough.
    pub fn expire_notification(&mut self, now: Instant) {
        if let Some((_, at)) = &self.notification
            && now.duration_since(*at) >= NOTIFICATION_TTL
        {
            self.notification = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PollSnapshot;
    use crate::view::{Capabilities, render_initial};

    fn surface(controls: bool) -> Surface {
        render_initial(&PollSnapshot::default(), Capabilities { controls }, 100)
    }

    #[test]
    fn focus_moves_edit_lock() {
        let mut surface = surface(true);
        let mut state = AppState::new(true);

        state.focus(&mut surface, Some(NodeId::GovernorSelect));
        assert!(surface.is_edit_locked(NodeId::GovernorSelect));
        assert_eq!(state.input_mode, InputMode::Editing);

        state.focus(&mut surface, Some(NodeId::MaxFreqSelect));
        assert!(!surface.is_edit_locked(NodeId::GovernorSelect));
        assert!(surface.is_edit_locked(NodeId::MaxFreqSelect));

        state.blur(&mut surface);
        assert!(!surface.is_edit_locked(NodeId::MaxFreqSelect));
        assert_eq!(state.focus, None);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn cycle_wraps_through_no_focus() {
        let mut surface = surface(true);
        let mut state = AppState::new(true);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let next = state.cycle_target(&surface, true);
            state.focus(&mut surface, next);
            seen.push(state.focus);
        }
        assert_eq!(
            seen,
            vec![
                Some(NodeId::GovernorSelect),
                Some(NodeId::MaxFreqSelect),
                Some(NodeId::OverclockInput),
                None
            ]
        );
        assert_eq!(
            state.cycle_target(&surface, false),
            Some(NodeId::OverclockInput)
        );
    }

    #[test]
    fn read_only_view_has_nothing_to_focus() {
        let mut surface = surface(false);
        let mut state = AppState::new(true);
        let next = state.cycle_target(&surface, true);
        assert_eq!(next, None);
        state.focus(&mut surface, Some(NodeId::GovernorSelect));
        assert_eq!(state.focus, None);
    }

    #[test]
    fn notification_expires() {
        let mut state = AppState::new(true);
        state.notify(Notification::info("done"));
        let at = state.notification.as_ref().unwrap().1;
        state.expire_notification(at + Duration::from_secs(1));
        assert!(state.notification.is_some());
        state.expire_notification(at + NOTIFICATION_TTL);
        assert!(state.notification.is_none());
    }
}
