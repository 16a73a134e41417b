//! Types used by the runner module

use pslaunch_utils::ExitCode;

/// Lifecycle of one interpreter launch.
///
/// ```text
/// Created ──spawn ok──▶ Running ──wait ok───▶ Exited(code)
///    │                     └────wait err──▶ WaitFailed(os code)
///    └──────spawn err──▶ LaunchFailed(os code)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Script extracted and command assembled; nothing spawned yet
    Created,
    /// Child process started; handles held
    Running,
    /// Child terminated with this exit code
    Exited(u32),
    /// Process creation failed with this platform error code
    LaunchFailed(u32),
    /// Waiting or exit-code retrieval failed with this platform error code
    WaitFailed(u32),
}

impl LifecycleState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Exited(_) => "exited",
            Self::LaunchFailed(_) => "launch_failed",
            Self::WaitFailed(_) => "wait_failed",
        }
    }

    /// The launcher exit code a terminal state stands for.
    #[must_use]
    pub fn exit_code(&self) -> Option<ExitCode> {
        match *self {
            Self::Exited(code) | Self::LaunchFailed(code) | Self::WaitFailed(code) => {
                Some(ExitCode::from(code))
            }
            Self::Created | Self::Running => None,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) | Self::LaunchFailed(code) | Self::WaitFailed(code) => {
                write!(f, "{}({code})", self.as_str())
            }
            Self::Created | Self::Running => f.write_str(self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(LifecycleState::Created.exit_code(), None);
        assert_eq!(LifecycleState::Running.exit_code(), None);
        assert_eq!(LifecycleState::Exited(3).exit_code(), Some(ExitCode::from(3)));
        assert_eq!(
            LifecycleState::LaunchFailed(2).exit_code(),
            Some(ExitCode::from(2))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(LifecycleState::Running.to_string(), "running");
        assert_eq!(LifecycleState::WaitFailed(6).to_string(), "wait_failed(6)");
    }
}
