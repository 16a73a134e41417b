use pslaunch_utils::LauncherError;

use crate::command_line::CommandLine;

// ============================================================================
// Spawner / ChildProcess - Process launch interface
// ============================================================================

/// A running interpreter process.
///
/// Dropping the value releases every OS handle it holds; it does not kill
/// the process.
pub trait ChildProcess {
    /// OS process ID.
    fn id(&self) -> u32;

    /// Block until the process terminates and return its exit code.
    ///
    /// There is no timeout: the launcher has nothing else to do while the
    /// script runs.
    ///
    /// # Errors
    ///
    /// [`LauncherError::WaitFailed`] if the wait or the exit-code query fails.
    fn wait(&mut self) -> Result<u32, LauncherError>;
}

/// Starts interpreter processes.
pub trait Spawner {
    type Child: ChildProcess;

    /// Start `cmd` as a child process.
    ///
    /// # Errors
    ///
    /// [`LauncherError::LaunchFailed`] carrying the platform error code
    /// captured right after the failed creation call.
    fn spawn(&self, cmd: &CommandLine) -> Result<Self::Child, LauncherError>;
}

/// Spawner built on `std::process::Command`.
///
/// Used on hosts without the Win32 process API. The child inherits the
/// launcher's stdio and environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSpawner;

impl Spawner for StdSpawner {
    type Child = std::process::Child;

    fn spawn(&self, cmd: &CommandLine) -> Result<Self::Child, LauncherError> {
        cmd.to_command()
            .spawn()
            .map_err(|source| LauncherError::LaunchFailed {
                interpreter: cmd.program.clone(),
                source,
            })
    }
}

impl ChildProcess for std::process::Child {
    fn id(&self) -> u32 {
        std::process::Child::id(self)
    }

    fn wait(&mut self) -> Result<u32, LauncherError> {
        let status =
            std::process::Child::wait(self).map_err(|source| LauncherError::WaitFailed { source })?;

        if let Some(code) = status.code() {
            return Ok(code as u32);
        }

        // Killed by a signal: report it the way shells do.
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Ok(128 + signal as u32);
            }
        }

        Err(LauncherError::WaitFailed {
            source: std::io::Error::other(format!("no exit code in status {status}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_std_spawner_missing_interpreter() {
        let cmd = CommandLine::new("/nonexistent/pslaunch/pwsh").arg("-NoProfile");

        let err = StdSpawner.spawn(&cmd).unwrap_err();

        match &err {
            LauncherError::LaunchFailed { interpreter, source } => {
                assert_eq!(interpreter, &PathBuf::from("/nonexistent/pslaunch/pwsh"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected LaunchFailed, got {other:?}"),
        }
        assert_eq!(err.to_exit_code().as_u32(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_std_child_exit_code() {
        let cmd = CommandLine::new("/bin/sh").args(["-c", "exit 42"]);

        let mut child = StdSpawner.spawn(&cmd).unwrap();
        assert!(ChildProcess::id(&child) > 0);
        assert_eq!(ChildProcess::wait(&mut child).unwrap(), 42);
    }

    #[cfg(unix)]
    #[test]
    fn test_std_child_killed_by_signal() {
        let cmd = CommandLine::new("/bin/sh").args(["-c", "kill -9 $$"]);

        let mut child = StdSpawner.spawn(&cmd).unwrap();
        assert_eq!(ChildProcess::wait(&mut child).unwrap(), 128 + 9);
    }
}
