//! Exit outcome of the wrapped command and the terminal cue it selects.

use std::process::ExitStatus;

use crate::display;
use crate::sound::SoundSlot;

/// Exit status used when the command's own status is unknown.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// How the wrapped command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// No command was given; standard input was monitored instead.
    NoProcess,
    /// The command exited with a status code.
    NormalExit(i32),
    /// The command ended without a portable status code.
    AbnormalTermination,
}

impl ExitOutcome {
    /// Derive the outcome from the result of waiting for the child.
    ///
    /// Anything without a numeric status is reported on standard error.
    #[must_use]
    pub fn from_wait(result: std::io::Result<ExitStatus>) -> Self {
        match result {
            Ok(status) => Self::from_status(status),
            Err(e) => {
                tracing::error!(error = %e, "Failed to wait for command");
                display::print_error(&format!("failed to wait for command: {e}"));
                Self::AbnormalTermination
            }
        }
    }

    /// Derive the outcome from an exit status.
    #[must_use]
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::NormalExit(code);
        }

        let reason = describe_abnormal(status);
        tracing::warn!(%reason, "Command terminated abnormally");
        display::print_error(&format!("command {reason}"));
        Self::AbnormalTermination
    }

    /// The program's own exit status.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::NoProcess => 0,
            Self::NormalExit(code) => code,
            Self::AbnormalTermination => FALLBACK_EXIT_CODE,
        }
    }

    /// The cue played when the session ends.
    #[must_use]
    pub fn terminal_slot(self, any_cue_fired: bool) -> SoundSlot {
        match self {
            Self::NoProcess => SoundSlot::Finish,
            Self::NormalExit(0) if any_cue_fired => SoundSlot::Finish,
            Self::NormalExit(0) => SoundSlot::Success,
            Self::NormalExit(_) | Self::AbnormalTermination => SoundSlot::Failure,
        }
    }
}

#[cfg(unix)]
fn describe_abnormal(status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    use nix::sys::signal::Signal;

    match status.signal() {
        Some(raw) => match Signal::try_from(raw) {
            Ok(signal) => format!("terminated by signal {signal}"),
            Err(_) => format!("terminated by signal {raw}"),
        },
        None => format!("ended without exit code ({status})"),
    }
}

#[cfg(not(unix))]
fn describe_abnormal(status: ExitStatus) -> String {
    format!("ended without exit code ({status})")
}
