//! Process exit codes.
//!
//! A successful `score` exits with the recommended action (0 accept,
//! 1 review, 2 flag, 3 reject) so shell pipelines can branch without
//! parsing output. Other subcommands exit 0 on success. Failures use
//! 10 and up: 1x for problems the caller can fix, 2x for everything else.

use sentinel_common::Action;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Clean = 0,
    Review = 1,
    Flag = 2,
    Reject = 3,
    /// Bad arguments or a malformed request, curve or survey override.
    ArgsError = 10,
    /// Scoring config missing, unparseable or invalid.
    ConfigError = 11,
    InternalError = 20,
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn for_action(action: Action) -> ExitCode {
        match action {
            Action::Accept => ExitCode::Clean,
            Action::Review => ExitCode::Review,
            Action::Flag => ExitCode::Flag,
            Action::Reject => ExitCode::Reject,
        }
    }

    /// Symbolic name used in JSON error payloads.
    pub fn code_name(self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_ACCEPT",
            ExitCode::Review => "OK_REVIEW",
            ExitCode::Flag => "OK_FLAG",
            ExitCode::Reject => "OK_REJECT",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_low_codes() {
        let codes: Vec<i32> = [Action::Accept, Action::Review, Action::Flag, Action::Reject]
            .into_iter()
            .map(|a| ExitCode::for_action(a).as_i32())
            .collect();
        assert_eq!(codes, [0, 1, 2, 3]);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
        assert_eq!(ExitCode::IoError.to_string(), "ERR_IO=21");
    }
}
