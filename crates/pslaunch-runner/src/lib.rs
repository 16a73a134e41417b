//! Interpreter launch for the embedded script.
//!
//! Turns an extracted [`TempScript`] into a PowerShell invocation
//! ([`CommandLine`]), starts it through a [`Spawner`], waits for it, and
//! cleans up under a [`Supervisor`].
//!
//! # Process model
//!
//! All process creation goes through [`Spawner`]. On Windows the default is
//! [`Win32Spawner`](platform::Win32Spawner), which hands the rendered command
//! line to `CreateProcessW` unchanged. Elsewhere [`StdSpawner`] is used.

pub mod command_line;
pub mod platform;
pub mod process;
pub mod supervisor;
pub mod types;

use std::ffi::OsStr;
use std::path::Path;

use pslaunch_payload::{ResourceSource, TempScript};
use pslaunch_utils::{LaunchConfig, LauncherError};
use tracing::debug;

pub use command_line::{CommandLine, INTERPRETER_SWITCHES, script_block};
pub use pslaunch_utils::quoting::escape_single_quoted;
pub use platform::DefaultSpawner;
pub use process::{ChildProcess, Spawner, StdSpawner};
pub use supervisor::{RunReport, Supervisor};
pub use types::LifecycleState;

/// Extract the script from `source` into the system temp directory and run it.
///
/// # Errors
///
/// Extraction failures only. Once the script exists, launch and wait
/// failures are reported through the returned [`RunReport`].
pub fn launch<S: Spawner>(
    spawner: S,
    source: &dyn ResourceSource,
    config: &LaunchConfig,
    forwarded: &OsStr,
) -> Result<RunReport, LauncherError> {
    let script = pslaunch_payload::extract(source, config)?;
    Ok(run_script(spawner, script, config, forwarded))
}

/// Like [`launch`], with the script placed in `dir`.
///
/// # Errors
///
/// See [`launch`].
pub fn launch_in<S: Spawner>(
    spawner: S,
    source: &dyn ResourceSource,
    dir: &Path,
    config: &LaunchConfig,
    forwarded: &OsStr,
) -> Result<RunReport, LauncherError> {
    let script = pslaunch_payload::extract_in(source, dir, config)?;
    Ok(run_script(spawner, script, config, forwarded))
}

fn run_script<S: Spawner>(
    spawner: S,
    script: TempScript,
    config: &LaunchConfig,
    forwarded: &OsStr,
) -> RunReport {
    let command = CommandLine::powershell(config.interpreter(), script.path(), forwarded);
    debug!(command_line = %command.render().to_string_lossy(), "launching interpreter");
    Supervisor::new(spawner).run(script, &command)
}
