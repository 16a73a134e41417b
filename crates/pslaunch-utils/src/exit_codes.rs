//! Exit code type for the launcher.
//!
//! The launcher's own exit code is either the wrapped script's exit code,
//! forwarded verbatim, or the platform error code captured when a launcher
//! step failed.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Script ran and exited with 0 |
//! | 1 | `FAILURE` | Generic failure with no platform code to report |
//! | other | | Script exit code or captured platform error code |

use std::io;

/// Process exit code, stored as the 32-bit value Windows hands out (`DWORD`).
///
/// Codes above `i32::MAX` (NTSTATUS crash codes such as `0xC000_0005`) are
/// valid and survive [`as_i32()`](Self::as_i32) bit-for-bit.
///
/// # Example
///
/// ```rust
/// use pslaunch_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_u32(), 0);
/// assert_eq!(ExitCode::from(0xC000_0005).as_i32(), 0xC000_0005_u32 as i32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(u32);

impl ExitCode {
    /// Success - the script exited with 0
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Generic failure - a launcher step failed without a platform error code
    pub const FAILURE: ExitCode = ExitCode(1);

    /// Get the raw 32-bit exit code.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Get the exit code as passed to `std::process::exit()`.
    ///
    /// The bit pattern is preserved, so Windows reports the same `DWORD`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0 as i32
    }

    /// Map an OS error to an exit code.
    ///
    /// Uses the raw platform error code when the error carries one. An error
    /// without a code, or with code 0, becomes [`FAILURE`](Self::FAILURE) so a
    /// failed run never exits as success.
    #[must_use]
    pub fn from_os_error(err: &io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) if code != 0 => ExitCode(code as u32),
            _ => Self::FAILURE,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for ExitCode {
    fn from(code: u32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for u32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
