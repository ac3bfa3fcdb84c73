//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::control::{Command, OverclockPlan, check_overclock};
use crate::surface::{NodeId, Surface};

use super::state::{AppState, InputMode, PopupState};

/// Longest overclock entry accepted by the input box.
const OVERCLOCK_INPUT_MAX: usize = 4;

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Poll right now.
    Refresh,
    /// Send a write command.
    Submit(Command),
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, surface: &mut Surface, key: KeyEvent) -> KeyAction {
    match state.popup {
        PopupState::QuitConfirm => return handle_quit_confirm(state, key),
        PopupState::OverclockConfirm { mhz } => return handle_overclock_confirm(state, key, mhz),
        PopupState::None => {}
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, surface, key),
        InputMode::Editing => handle_editing_mode(state, surface, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.popup = PopupState::None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_overclock_confirm(state: &mut AppState, key: KeyEvent, mhz: u32) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.popup = PopupState::None;
            KeyAction::Submit(Command::SetOverclock(mhz))
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.popup = PopupState::None;
            state.status_message = Some(format!("Overclock to {} MHz cancelled", mhz));
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, surface: &mut Surface, key: KeyEvent) -> KeyAction {
    state.status_message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::QuitConfirm;
            KeyAction::None
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            state.paused = !state.paused;
            KeyAction::None
        }
        KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Refresh,
        KeyCode::Tab | KeyCode::BackTab => {
            let forward = key.code == KeyCode::Tab;
            match state.cycle_target(surface, forward) {
                Some(target) => state.focus(surface, Some(target)),
                None => state.status_message = Some("No controls (start with --controls)".to_string()),
            }
            KeyAction::None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.flow_scroll = state.flow_scroll.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = surface
                .table(NodeId::FlowTable)
                .map(|t| t.rows.len())
                .unwrap_or(0);
            if state.flow_scroll + 1 < rows {
                state.flow_scroll += 1;
            }
            KeyAction::None
        }
        KeyCode::Home => {
            state.flow_scroll = 0;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Handles keys while a control has focus.
fn handle_editing_mode(state: &mut AppState, surface: &mut Surface, key: KeyEvent) -> KeyAction {
    let Some(focus) = state.focus else {
        state.input_mode = InputMode::Normal;
        return KeyAction::None;
    };
    state.status_message = None;

    match key.code {
        KeyCode::Esc => {
            state.blur(surface);
            KeyAction::None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            let target = state.cycle_target(surface, key.code == KeyCode::Tab);
            state.focus(surface, target);
            KeyAction::None
        }
        _ if surface.is_disabled(focus) => {
            state.status_message = Some("Request in progress".to_string());
            KeyAction::None
        }
        KeyCode::Up | KeyCode::Down => {
            if let Some(select) = surface.select_mut(focus) {
                select.step(if key.code == KeyCode::Up { -1 } else { 1 });
            }
            KeyAction::None
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(input) = surface.input_mut(focus)
                && input.value.len() < OVERCLOCK_INPUT_MAX
            {
                input.value.push(c);
            }
            KeyAction::None
        }
        KeyCode::Backspace => {
            if let Some(input) = surface.input_mut(focus) {
                input.value.pop();
            }
            KeyAction::None
        }
        KeyCode::Enter => apply_focused(state, surface, focus),
        _ => KeyAction::None,
    }
}

/// Turns the focused control's pending value into a command.
fn apply_focused(state: &mut AppState, surface: &mut Surface, focus: NodeId) -> KeyAction {
    let action = match focus {
        NodeId::GovernorSelect => match surface.select(focus) {
            Some(select) if !select.value.is_empty() => {
                KeyAction::Submit(Command::SetGovernor(select.value.clone()))
            }
            _ => KeyAction::None,
        },
        NodeId::MaxFreqSelect => match surface.select(focus).map(|s| s.value.parse::<u64>()) {
            Some(Ok(khz)) => KeyAction::Submit(Command::SetMaxFreq(khz)),
            _ => KeyAction::None,
        },
        NodeId::OverclockInput => {
            let value = surface
                .input(focus)
                .map(|i| i.value.clone())
                .unwrap_or_default();
            match check_overclock(&value) {
                Ok(OverclockPlan::Send(mhz)) => KeyAction::Submit(Command::SetOverclock(mhz)),
                Ok(OverclockPlan::Confirm(mhz)) => {
                    state.popup = PopupState::OverclockConfirm { mhz };
                    KeyAction::None
                }
                Err(e) => {
                    // Rejected locally; keep focus so the value can be fixed.
                    state.status_message = Some(e.to_string());
                    return KeyAction::None;
                }
            }
        }
        _ => KeyAction::None,
    };

    if focus == NodeId::OverclockInput
        && let Some(input) = surface.input_mut(focus)
    {
        input.value.clear();
    }
    state.blur(surface);
    action
}
