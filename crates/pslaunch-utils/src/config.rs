//! Launcher configuration.
//!
//! All values are fixed for a production build; `Default` yields them.
//! [`LaunchConfig::with_interpreter`] points tests at a stub interpreter.

use std::path::{Path, PathBuf};

/// Resource ID of the embedded script (RCDATA).
pub const SCRIPT_RESOURCE_ID: u16 = 101;

/// Prefix for the temporary script file name.
pub const TEMP_PREFIX: &str = "ldo";

/// Extension the interpreter recognizes as a script.
pub const SCRIPT_EXTENSION: &str = "ps1";

/// Absolute path to the script interpreter.
#[cfg(windows)]
pub const DEFAULT_INTERPRETER: &str = r"C:\Windows\system32\WindowsPowerShell\v1.0\powershell.exe";

/// Absolute path to the script interpreter.
#[cfg(not(windows))]
pub const DEFAULT_INTERPRETER: &str = "/usr/bin/pwsh";

/// Configuration for one launcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Absolute path to the interpreter binary
    pub interpreter: PathBuf,
    /// Numeric ID of the embedded script resource
    pub resource_id: u16,
    /// Prefix for the temporary script file name
    pub temp_prefix: String,
    /// Extension given to the temporary script file (without the dot)
    pub script_extension: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            resource_id: SCRIPT_RESOURCE_ID,
            temp_prefix: TEMP_PREFIX.to_string(),
            script_extension: SCRIPT_EXTENSION.to_string(),
        }
    }
}

impl LaunchConfig {
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    #[must_use]
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// The script extension with its leading dot, e.g. `.ps1`.
    #[must_use]
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.script_extension)
    }
}
