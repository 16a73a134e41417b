//! pslaunch - run an embedded PowerShell script as a native executable
//!
//! The binary carries its script as a read-only resource. At run time it
//! writes the script to a uniquely named temporary `.ps1` file, starts the
//! interpreter against it with the caller's arguments forwarded verbatim,
//! waits, deletes the file, and exits with the script's own exit code.
//!
//! # Pipeline
//!
//! 1. [`forwarded_args`]: recover the raw arguments after the executable token
//! 2. [`ResourceSource`] and [`TempScript`]: extract the payload to disk
//! 3. [`CommandLine`] and [`Spawner`]: assemble and start the interpreter
//! 4. [`Supervisor`]: wait, clean up, report a [`RunReport`]
//!
//! Launcher failures exit with the platform error code of the failing step;
//! see [`LauncherError::to_exit_code`].

pub mod cli;

pub use pslaunch_payload::{BundledResource, ResourceSource, TempScript};
#[cfg(windows)]
pub use pslaunch_payload::ModuleResource;
pub use pslaunch_runner::{
    CommandLine, DefaultSpawner, LifecycleState, RunReport, Spawner, StdSpawner, Supervisor,
    launch, launch_in,
};
pub use pslaunch_utils::cmdline::{forwarded_args, forwarded_args_wide};
pub use pslaunch_utils::{ErrorCategory, ExitCode, LaunchConfig, LauncherError};
