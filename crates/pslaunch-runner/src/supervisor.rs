//! Child process lifecycle supervision.
//!
//! The [`Supervisor`] owns the temporary script and the child process for one
//! run. Every terminal transition releases the child's handles and deletes
//! the script before [`Supervisor::run`] returns.

use std::path::PathBuf;

use pslaunch_payload::TempScript;
use pslaunch_utils::{ExitCode, LauncherError};
use tracing::{debug, error, info, warn};

use crate::command_line::CommandLine;
use crate::process::{ChildProcess, Spawner};
use crate::types::LifecycleState;

/// Outcome of one supervised run.
#[derive(Debug)]
pub struct RunReport {
    /// Terminal state reached
    pub state: LifecycleState,
    /// Every state visited, in order, ending with `state`
    pub transitions: Vec<LifecycleState>,
    /// Path the temporary script had; deleted by the time the report exists
    pub script_path: PathBuf,
    /// The failure behind a `LaunchFailed` or `WaitFailed` state
    pub failure: Option<LauncherError>,
}

impl RunReport {
    /// The launcher's exit code for this run.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        self.state.exit_code().unwrap_or(ExitCode::FAILURE)
    }
}

/// Drives spawn, wait, and cleanup through [`LifecycleState`].
#[derive(Debug, Clone, Default)]
pub struct Supervisor<S> {
    spawner: S,
}

impl<S: Spawner> Supervisor<S> {
    #[must_use]
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Launch `command`, wait for it, and clean up.
    ///
    /// Takes ownership of `script` so its deletion is tied to this run. The
    /// wait is unbounded.
    pub fn run(&self, script: TempScript, command: &CommandLine) -> RunReport {
        let script_path = script.path().to_path_buf();
        let mut transitions = vec![LifecycleState::Created];

        let (state, failure) = match self.spawner.spawn(command) {
            Err(err) => (LifecycleState::LaunchFailed(err.to_exit_code().as_u32()), Some(err)),
            Ok(mut child) => {
                transitions.push(LifecycleState::Running);
                debug!(pid = child.id(), "interpreter started");

                let outcome = match child.wait() {
                    Ok(code) => (LifecycleState::Exited(code), None),
                    Err(err) => (LifecycleState::WaitFailed(err.to_exit_code().as_u32()), Some(err)),
                };
                // Process and thread handles are released here.
                drop(child);
                outcome
            }
        };
        transitions.push(state);

        match &failure {
            Some(err) => error!(
                state = %state,
                category = %err.category(),
                error = %err,
                "interpreter run failed"
            ),
            None => info!(state = %state, "interpreter exited"),
        }

        match script.close() {
            Ok(()) => debug!(path = %script_path.display(), "removed temporary script"),
            Err(e) => {
                warn!(path = %script_path.display(), error = %e, "failed to remove temporary script");
            }
        }

        RunReport {
            state,
            transitions,
            script_path,
            failure,
        }
    }
}
