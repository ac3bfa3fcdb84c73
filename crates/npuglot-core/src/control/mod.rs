//! Write path: governor, max-frequency and overclock commands.
//!
//! Requests are validated locally ([`check_overclock`]), then executed off
//! the UI thread by a [`CommandRunner`]. The triggering control stays
//! disabled until its request settles; settling always re-enables it and
//! yields a [`Notification`] for the user.

mod guard;
mod runner;

pub use guard::{
    GuardError, OVERCLOCK_CONFIRM_ABOVE_MHZ, OVERCLOCK_MAX_MHZ, OVERCLOCK_MIN_MHZ, OverclockPlan,
    check_overclock,
};
pub use runner::CommandRunner;

use crate::fmt::format_freq_mhz;
use crate::rpc::{NpuRpc, RpcError, WriteReply};
use crate::surface::NodeId;

/// A device write requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetGovernor(String),
    /// Target in kHz.
    SetMaxFreq(u64),
    /// PLL target in MHz, already validated.
    SetOverclock(u32),
}

impl Command {
    /// Control that triggered the command.
    pub fn control(&self) -> NodeId {
        match self {
            Command::SetGovernor(_) => NodeId::GovernorSelect,
            Command::SetMaxFreq(_) => NodeId::MaxFreqSelect,
            Command::SetOverclock(_) => NodeId::OverclockInput,
        }
    }

    fn execute(&self, rpc: &dyn NpuRpc) -> Result<WriteReply, RpcError> {
        match self {
            Command::SetGovernor(gov) => rpc.set_governor(gov),
            Command::SetMaxFreq(khz) => rpc.set_max_freq(*khz),
            Command::SetOverclock(mhz) => rpc.set_overclock(*mhz),
        }
    }

    fn what(&self) -> &'static str {
        match self {
            Command::SetGovernor(_) => "set governor",
            Command::SetMaxFreq(_) => "set maximum frequency",
            Command::SetOverclock(_) => "set overclock",
        }
    }

    fn success_message(&self, reply: &WriteReply) -> String {
        match (self, reply) {
            (
                Command::SetOverclock(requested),
                WriteReply::Applied {
                    actual_mhz,
                    pcw,
                    posdiv,
                },
            ) => {
                let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".to_string());
                format!(
                    "Overclock to {} MHz applied: actual {} MHz, PCW {}, POSDIV {}",
                    requested,
                    field(actual_mhz),
                    field(pcw),
                    field(posdiv)
                )
            }
            (Command::SetGovernor(gov), _) => format!("Governor set to {}", gov),
            (Command::SetMaxFreq(khz), _) => {
                format!("Maximum frequency set to {}", format_freq_mhz(*khz))
            }
            (Command::SetOverclock(mhz), _) => format!("Overclock to {} MHz applied", mhz),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message shown after a command settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Notification for a settled command. `None` as outcome means the
    /// worker died before answering.
    pub(crate) fn for_outcome(
        command: &Command,
        outcome: Option<&Result<WriteReply, RpcError>>,
    ) -> Self {
        match outcome {
            Some(Ok(reply @ WriteReply::Applied { .. })) => {
                Self::info(command.success_message(reply))
            }
            Some(Ok(WriteReply::Rejected(msg))) => {
                Self::error(format!("Failed to {}: {}", command.what(), msg))
            }
            Some(Ok(WriteReply::Unexpected(raw))) => Self::error(format!(
                "Failed to {}: unexpected reply {}",
                command.what(),
                raw
            )),
            Some(Err(e)) => Self::error(format!("Failed to {}: {}", command.what(), e)),
            None => Self::error(format!("Failed to {}: request aborted", command.what())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overclock_reply_values_shown_verbatim() {
        let reply = WriteReply::from_value(&serde_json::json!({
            "result": "ok",
            "actual_mhz": 1449.6,
            "pcw": "0x1c40000",
            "posdiv": 1
        }));
        let n = Notification::for_outcome(&Command::SetOverclock(1450), Some(&Ok(reply)));
        assert_eq!(n.level, NoticeLevel::Info);
        assert_eq!(
            n.message,
            "Overclock to 1450 MHz applied: actual 1449.6 MHz, PCW 0x1c40000, POSDIV 1"
        );
    }

    #[test]
    fn failures_become_error_notifications() {
        let cmd = Command::SetGovernor("performance".to_string());
        let rejected = Notification::for_outcome(
            &cmd,
            Some(&Ok(WriteReply::Rejected("invalid governor".to_string()))),
        );
        assert!(rejected.is_error());
        assert_eq!(rejected.message, "Failed to set governor: invalid governor");

        let transport = Notification::for_outcome(
            &cmd,
            Some(&Err(RpcError::Transport("timed out".to_string()))),
        );
        assert_eq!(
            transport.message,
            "Failed to set governor: transport error: timed out"
        );

        assert!(Notification::for_outcome(&cmd, None).is_error());
    }

    #[test]
    fn max_freq_message_in_mhz() {
        let ok = WriteReply::from_value(&serde_json::json!({"result": "ok"}));
        let n = Notification::for_outcome(&Command::SetMaxFreq(1_200_000), Some(&Ok(ok)));
        assert_eq!(n.message, "Maximum frequency set to 1200 MHz");
    }

    #[test]
    fn commands_map_to_controls() {
        assert_eq!(Command::SetMaxFreq(1).control(), NodeId::MaxFreqSelect);
        assert_eq!(Command::SetOverclock(1).control(), NodeId::OverclockInput);
        assert!(Command::SetGovernor(String::new()).control().is_control());
    }
}
