use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use pslaunch_utils::quoting::escape_single_quoted;

// ============================================================================
// CommandLine - Interpreter invocation
// ============================================================================

/// Interpreter switches placed before the script block.
pub const INTERPRETER_SWITCHES: [&str; 4] = ["-ExecutionPolicy", "Bypass", "-NoProfile", "-Command"];

/// An interpreter invocation: program plus its own argument list.
///
/// Arguments are kept as discrete elements. [`render()`](Self::render)
/// produces the single command-line string `CreateProcessW` takes;
/// [`to_command()`](Self::to_command) hands the same argv to
/// `std::process::Command`.
///
/// # Example
///
/// ```rust
/// use pslaunch_runner::CommandLine;
/// use std::ffi::OsString;
///
/// let cmd = CommandLine::new("pwsh").arg("-NoProfile");
///
/// assert_eq!(cmd.program, std::path::PathBuf::from("pwsh"));
/// assert_eq!(cmd.args, vec![OsString::from("-NoProfile")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The interpreter to execute
    pub program: PathBuf,
    /// Interpreter-level arguments
    pub args: Vec<OsString>,
}

impl CommandLine {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Build the invocation that runs `script` with `forwarded` arguments.
    ///
    /// The interpreter runs without profile or execution policy, stops on the
    /// first uncaught error, and exits with the script's own status:
    ///
    /// ```text
    /// <interpreter> -ExecutionPolicy Bypass -NoProfile -Command
    ///     & { $ErrorActionPreference = 'Stop'; & '<script>' <forwarded>; exit $LASTEXITCODE }
    /// ```
    #[must_use]
    pub fn powershell(interpreter: &Path, script: &Path, forwarded: &OsStr) -> Self {
        Self::new(interpreter)
            .args(INTERPRETER_SWITCHES)
            .arg(script_block(script, forwarded))
    }

    /// Render as one Windows command-line string.
    ///
    /// The program is always double-quoted. Arguments that are empty or
    /// contain blanks are double-quoted; everything else, including the
    /// forwarded text inside the script block, is copied as is.
    #[must_use]
    pub fn render(&self) -> OsString {
        let mut line = OsString::from("\"");
        line.push(self.program.as_os_str());
        line.push("\"");

        for arg in &self.args {
            line.push(" ");
            if needs_quotes(arg) {
                line.push("\"");
                line.push(arg);
                line.push("\"");
            } else {
                line.push(arg);
            }
        }
        line
    }

    /// Convert into a `std::process::Command` with the same argv.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// The `-Command` payload that runs `script` and re-exits with its status.
#[must_use]
pub fn script_block(script: &Path, forwarded: &OsStr) -> OsString {
    let mut block = OsString::from("& { $ErrorActionPreference = 'Stop'; & '");
    block.push(escape_single_quoted(script.as_os_str()));
    block.push("' ");
    block.push(forwarded);
    block.push("; exit $LASTEXITCODE }");
    block
}

fn needs_quotes(arg: &OsStr) -> bool {
    arg.is_empty() || arg.to_string_lossy().contains([' ', '\t'])
}
