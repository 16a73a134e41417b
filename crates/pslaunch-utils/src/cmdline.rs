//! Recovery of forwarded arguments from the raw invocation line.
//!
//! The launcher never parses its arguments. It finds where its own executable
//! token ends in the line the OS used to start it and hands the remainder to
//! the interpreter verbatim. This never fails: anything it can't make sense
//! of, such as an unterminated quote, yields no arguments.

use std::ffi::OsString;

#[cfg(not(windows))]
use crate::quoting::quote_literal;

/// A code unit of a command line: `u8` for `&str`, `u16` for Windows wide strings.
trait CodeUnit: Copy {
    fn is_char(self, c: u8) -> bool;

    fn is_blank(self) -> bool {
        self.is_char(b' ') || self.is_char(b'\t')
    }
}

impl CodeUnit for u8 {
    fn is_char(self, c: u8) -> bool {
        self == c
    }
}

impl CodeUnit for u16 {
    fn is_char(self, c: u8) -> bool {
        self == u16::from(c)
    }
}

/// Offset of the first forwarded argument, or `None` if there are none.
fn args_offset<U: CodeUnit>(line: &[U]) -> Option<usize> {
    let first = *line.first()?;

    let token_end = if first.is_char(b'"') {
        // Quoted executable: ends just past the closing quote.
        line[1..].iter().position(|u| u.is_char(b'"'))? + 2
    } else {
        line.iter().position(|u| u.is_blank())?
    };

    if token_end >= line.len() {
        return None;
    }

    let skipped = line[token_end..].iter().position(|u| !u.is_blank())?;
    Some(token_end + skipped)
}

/// Return the text after the executable token, leading blanks trimmed.
///
/// # Example
///
/// ```rust
/// use pslaunch_utils::cmdline::forwarded_args;
///
/// assert_eq!(forwarded_args(r#""C:\Program Files\app.exe" -Foo bar"#), "-Foo bar");
/// assert_eq!(forwarded_args("app.exe -Foo bar"), "-Foo bar");
/// assert_eq!(forwarded_args("app.exe"), "");
/// ```
#[must_use]
pub fn forwarded_args(line: &str) -> &str {
    // Every terminator is ASCII, so any offset found is a char boundary.
    args_offset(line.as_bytes()).map_or("", |start| &line[start..])
}

/// Wide-string form of [`forwarded_args`] for `GetCommandLineW` output.
#[must_use]
pub fn forwarded_args_wide(line: &[u16]) -> &[u16] {
    args_offset(line).map_or(&[][..], |start| &line[start..])
}

/// The raw command line this process was started with.
#[cfg(windows)]
#[must_use]
pub fn raw_invocation_line() -> Vec<u16> {
    use windows::Win32::System::Environment::GetCommandLineW;

    // SAFETY: GetCommandLineW returns a pointer into the process environment
    // block, valid and NUL-terminated for the life of the process.
    unsafe {
        let line = GetCommandLineW();
        if line.is_null() {
            Vec::new()
        } else {
            line.as_wide().to_vec()
        }
    }
}

/// The command line this process was started with.
///
/// Non-Windows hosts only expose an argv whose quoting the caller's shell has
/// already removed. The executable is double-quoted when it contains blanks;
/// every argument after it becomes a PowerShell single-quoted literal so the
/// interpreter sees the same tokens the launcher received.
#[cfg(not(windows))]
#[must_use]
pub fn raw_invocation_line() -> String {
    rebuild_invocation_line(std::env::args_os().map(|a| a.to_string_lossy().into_owned()))
}

#[cfg(not(windows))]
fn rebuild_invocation_line<I>(argv: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut argv = argv.into_iter();
    let Some(exe) = argv.next() else {
        return String::new();
    };

    let mut line = if exe.is_empty() || exe.contains([' ', '\t']) {
        format!("\"{exe}\"")
    } else {
        exe
    };
    for arg in argv {
        line.push(' ');
        line.push_str(&quote_literal(&arg));
    }
    line
}

/// Arguments to forward to the interpreter for the current process.
#[must_use]
pub fn current_forwarded_args() -> OsString {
    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStringExt;

        let line = raw_invocation_line();
        OsString::from_wide(forwarded_args_wide(&line))
    }

    #[cfg(not(windows))]
    {
        let line = raw_invocation_line();
        OsString::from(forwarded_args(&line))
    }
}
