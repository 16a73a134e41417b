//! Launcher entry flow
//!
//! Wires the pipeline together for the real binary: logging, forwarded
//! arguments, the embedded payload, the platform spawner, and the final exit
//! code. The launcher defines no flags of its own; everything after the
//! executable token belongs to the script.

use pslaunch_payload::ResourceSource;
use pslaunch_runner::DefaultSpawner;
use pslaunch_utils::cmdline::current_forwarded_args;
use pslaunch_utils::logging::init_tracing;
use pslaunch_utils::{ExitCode, LaunchConfig};
use tracing::{debug, error};

/// Run the launcher.
///
/// Returns `Ok(())` when the script exited with status 0, otherwise the exit
/// code the process must end with: the script's own status, or the platform
/// error code of the step that failed.
pub fn run() -> Result<(), ExitCode> {
    init_tracing();

    let config = LaunchConfig::default();
    let forwarded = current_forwarded_args();
    debug!(forwarded = %forwarded.to_string_lossy(), "recovered forwarded arguments");

    let source = payload_source(&config);
    let code = match pslaunch_runner::launch(DefaultSpawner::default(), &source, &config, &forwarded)
    {
        Ok(report) => report.exit_code(),
        Err(err) => {
            error!(category = %err.category(), error = %err, "script extraction failed");
            err.to_exit_code()
        }
    };

    if code.is_success() { Ok(()) } else { Err(code) }
}

#[cfg(windows)]
fn payload_source(config: &LaunchConfig) -> impl ResourceSource {
    pslaunch_payload::ModuleResource::new(config.resource_id)
}

#[cfg(not(windows))]
fn payload_source(config: &LaunchConfig) -> impl ResourceSource {
    pslaunch_payload::BundledResource::new(
        config.resource_id,
        include_bytes!(env!("PSLAUNCH_PAYLOAD_PATH")).as_slice(),
    )
}
