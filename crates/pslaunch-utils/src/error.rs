//! Error types for the launcher pipeline.
//!
//! Every failure is terminal for the run. Errors that come from an OS call
//! carry the `io::Error` built from the platform code captured right after
//! the failing call, and [`LauncherError::to_exit_code()`] turns that code
//! into the launcher's own exit code.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Which part of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Module handle or embedded resource lookup
    Resource,
    /// Temporary script creation, rename, or write
    Filesystem,
    /// Interpreter spawn, wait, or exit-code query
    Process,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Resource => write!(f, "resource"),
            ErrorCategory::Filesystem => write!(f, "filesystem"),
            ErrorCategory::Process => write!(f, "process"),
        }
    }
}

/// Launcher errors, one variant per failure point.
#[derive(Error, Debug)]
pub enum LauncherError {
    // Resource errors
    #[error("module handle unavailable: {source}")]
    ModuleUnavailable { source: io::Error },

    #[error("embedded script resource {id} not found: {source}")]
    ResourceNotFound { id: u16, source: io::Error },

    #[error("embedded script resource {id} could not be loaded: {source}")]
    ResourceLoadFailed { id: u16, source: io::Error },

    #[error("embedded script resource {id} is empty")]
    ResourceEmpty { id: u16 },

    // Filesystem errors
    #[error("temporary directory unavailable: {source}")]
    TempDirUnavailable { source: io::Error },

    #[error("failed to create temporary file in {dir}: {source}")]
    TempCreateFailed { dir: PathBuf, source: io::Error },

    #[error("failed to rename {from} to {to}: {source}")]
    TempRenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("failed to write script {path}: {source}")]
    ScriptWriteFailed { path: PathBuf, source: io::Error },

    #[error("short write to {path}: {written} of {expected} bytes")]
    ScriptTruncated {
        path: PathBuf,
        written: u64,
        expected: u64,
    },

    // Process errors
    #[error("failed to launch interpreter {interpreter}: {source}")]
    LaunchFailed {
        interpreter: PathBuf,
        source: io::Error,
    },

    #[error("failed to retrieve interpreter exit code: {source}")]
    WaitFailed { source: io::Error },
}

impl LauncherError {
    /// The pipeline stage this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModuleUnavailable { .. }
            | Self::ResourceNotFound { .. }
            | Self::ResourceLoadFailed { .. }
            | Self::ResourceEmpty { .. } => ErrorCategory::Resource,
            Self::TempDirUnavailable { .. }
            | Self::TempCreateFailed { .. }
            | Self::TempRenameFailed { .. }
            | Self::ScriptWriteFailed { .. }
            | Self::ScriptTruncated { .. } => ErrorCategory::Filesystem,
            Self::LaunchFailed { .. } | Self::WaitFailed { .. } => ErrorCategory::Process,
        }
    }

    /// The OS error behind this failure, if any.
    #[must_use]
    pub fn os_error(&self) -> Option<&io::Error> {
        match self {
            Self::ModuleUnavailable { source }
            | Self::ResourceNotFound { source, .. }
            | Self::ResourceLoadFailed { source, .. }
            | Self::TempDirUnavailable { source }
            | Self::TempCreateFailed { source, .. }
            | Self::TempRenameFailed { source, .. }
            | Self::ScriptWriteFailed { source, .. }
            | Self::LaunchFailed { source, .. }
            | Self::WaitFailed { source } => Some(source),
            Self::ResourceEmpty { .. } | Self::ScriptTruncated { .. } => None,
        }
    }

    /// Map this error to the launcher's exit code.
    ///
    /// The captured platform error code when there is one, otherwise
    /// [`ExitCode::FAILURE`].
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        self.os_error()
            .map_or(ExitCode::FAILURE, ExitCode::from_os_error)
    }
}

/// Convert a `windows` crate error into an `io::Error` carrying the raw Win32 code.
///
/// The `windows` crate reports Win32 failures as `HRESULT_FROM_WIN32(code)`;
/// unpack those so the exit code is the plain `GetLastError()` value.
#[cfg(windows)]
#[must_use]
pub fn win32_error(err: &windows::core::Error) -> io::Error {
    const FACILITY_WIN32_MASK: u32 = 0xFFFF_0000;
    const FACILITY_WIN32_BITS: u32 = 0x8007_0000;

    let hr = err.code().0 as u32;
    let code = if hr & FACILITY_WIN32_MASK == FACILITY_WIN32_BITS {
        hr & 0xFFFF
    } else {
        hr
    };
    io::Error::from_raw_os_error(code as i32)
}
