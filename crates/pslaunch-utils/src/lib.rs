pub mod cmdline;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod quoting;

pub use config::LaunchConfig;
pub use error::{ErrorCategory, LauncherError};
pub use exit_codes::ExitCode;
