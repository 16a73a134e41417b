//! Temporary script file extraction.
//!
//! The script is written to a uniquely named file in the system temp
//! directory. [`TempScript`] owns that file's existence: dropping the guard
//! deletes it, whichever path the run leaves by.

use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use pslaunch_utils::{LaunchConfig, LauncherError};
use tempfile::TempPath;
use tracing::debug;

use crate::resource::ResourceSource;

/// A temporary script file that is deleted when dropped.
#[derive(Debug)]
pub struct TempScript {
    path: TempPath,
}

impl TempScript {
    /// Take ownership of an existing file; it is deleted when the guard drops.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: TempPath::from_path(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any error.
    ///
    /// # Errors
    ///
    /// The underlying `remove_file` error.
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

/// The system temporary directory.
///
/// # Errors
///
/// [`LauncherError::TempDirUnavailable`] if the OS can't report one.
#[cfg(windows)]
pub fn temp_dir() -> Result<PathBuf, LauncherError> {
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use windows::Win32::Foundation::MAX_PATH;
    use windows::Win32::Storage::FileSystem::GetTempPathW;

    let mut buf = [0u16; MAX_PATH as usize + 1];
    // SAFETY: the buffer is writable and its length is passed along with it.
    let len = unsafe { GetTempPathW(Some(&mut buf)) } as usize;
    if len == 0 || len > buf.len() {
        return Err(LauncherError::TempDirUnavailable {
            source: io::Error::last_os_error(),
        });
    }
    Ok(PathBuf::from(OsString::from_wide(&buf[..len])))
}

/// The system temporary directory.
///
/// # Errors
///
/// Never fails on this platform.
#[cfg(not(windows))]
pub fn temp_dir() -> Result<PathBuf, LauncherError> {
    Ok(std::env::temp_dir())
}

/// Extract the payload into a new temporary script in the system temp directory.
///
/// # Errors
///
/// Resource lookup errors from `source`, and any filesystem error while
/// creating or writing the file. On error no file is left behind.
pub fn extract(
    source: &dyn ResourceSource,
    config: &LaunchConfig,
) -> Result<TempScript, LauncherError> {
    extract_in(source, &temp_dir()?, config)
}

/// Extract the payload into a new temporary script in `dir`.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_in(
    source: &dyn ResourceSource,
    dir: &Path,
    config: &LaunchConfig,
) -> Result<TempScript, LauncherError> {
    let bytes = source.bytes()?;
    debug!(id = source.id(), size = bytes.len(), "located embedded script");

    let script = create_unique(dir, config)?;

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(script.path())
        .map_err(|source| LauncherError::ScriptWriteFailed {
            path: script.path().to_path_buf(),
            source,
        })?;

    let script = fill(script, file, bytes)?;
    let script = verify_length(script, bytes.len() as u64)?;
    debug!(path = %script.path().display(), "wrote temporary script");
    Ok(script)
}

/// Write `bytes` through `sink` and check every byte landed.
///
/// `sink` is closed before returning; on error `script` is dropped and the
/// file deleted.
fn fill<W: Write>(
    script: TempScript,
    mut sink: W,
    bytes: &[u8],
) -> Result<TempScript, LauncherError> {
    let result = write_counted(&mut sink, bytes);
    drop(sink);

    let written = result.map_err(|source| LauncherError::ScriptWriteFailed {
        path: script.path().to_path_buf(),
        source,
    })?;

    let expected = bytes.len() as u64;
    if written != expected {
        return Err(LauncherError::ScriptTruncated {
            path: script.path().to_path_buf(),
            written,
            expected,
        });
    }
    Ok(script)
}

/// Check the file on disk holds exactly `expected` bytes.
fn verify_length(script: TempScript, expected: u64) -> Result<TempScript, LauncherError> {
    let on_disk = std::fs::metadata(script.path())
        .map_err(|source| LauncherError::ScriptWriteFailed {
            path: script.path().to_path_buf(),
            source,
        })?
        .len();

    if on_disk != expected {
        return Err(LauncherError::ScriptTruncated {
            path: script.path().to_path_buf(),
            written: on_disk,
            expected,
        });
    }
    Ok(script)
}

/// Write as much of `bytes` as the sink accepts and return the count.
///
/// A sink that stops accepting data (`Ok(0)`) ends the write early; the
/// caller compares the count against the payload size.
fn write_counted<W: Write>(sink: &mut W, bytes: &[u8]) -> io::Result<u64> {
    let mut written = 0;
    while written < bytes.len() {
        match sink.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    sink.flush()?;
    Ok(written as u64)
}

/// Create an empty, uniquely named script file in `dir`.
///
/// `GetTempFileNameW` creates `<prefix>XXXX.tmp`; it is then renamed to the
/// script extension. `MoveFileW` refuses to overwrite, so a collision with
/// another run's script fails instead of clobbering it.
#[cfg(windows)]
fn create_unique(dir: &Path, config: &LaunchConfig) -> Result<TempScript, LauncherError> {
    use std::ffi::OsString;
    use std::os::windows::ffi::{OsStrExt, OsStringExt};
    use windows::Win32::Foundation::MAX_PATH;
    use windows::Win32::Storage::FileSystem::{GetTempFileNameW, MoveFileW};
    use windows::core::PCWSTR;

    fn wide_nul(s: &std::ffi::OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let dir_w = wide_nul(dir.as_os_str());
    let prefix_w = wide_nul(std::ffi::OsStr::new(&config.temp_prefix));
    let mut name = [0u16; MAX_PATH as usize];

    // SAFETY: both inputs are NUL-terminated and outlive the call; `name`
    // is the MAX_PATH buffer the API requires.
    let unique = unsafe {
        GetTempFileNameW(
            PCWSTR(dir_w.as_ptr()),
            PCWSTR(prefix_w.as_ptr()),
            0,
            &mut name,
        )
    };
    if unique == 0 {
        return Err(LauncherError::TempCreateFailed {
            dir: dir.to_path_buf(),
            source: io::Error::last_os_error(),
        });
    }

    let len = name.iter().position(|&c| c == 0).unwrap_or(name.len());
    let created = PathBuf::from(OsString::from_wide(&name[..len]));
    let target = created.with_extension(&config.script_extension);

    let from_w = wide_nul(created.as_os_str());
    let to_w = wide_nul(target.as_os_str());

    // SAFETY: both paths are NUL-terminated and outlive the call.
    let renamed = unsafe { MoveFileW(PCWSTR(from_w.as_ptr()), PCWSTR(to_w.as_ptr())) };
    if let Err(e) = renamed {
        let source = pslaunch_utils::error::win32_error(&e);
        let _ = std::fs::remove_file(&created);
        return Err(LauncherError::TempRenameFailed {
            from: created,
            to: target,
            source,
        });
    }

    Ok(TempScript::from_path(target))
}

/// Create an empty, uniquely named script file in `dir`.
#[cfg(not(windows))]
fn create_unique(dir: &Path, config: &LaunchConfig) -> Result<TempScript, LauncherError> {
    let file = tempfile::Builder::new()
        .prefix(&config.temp_prefix)
        .suffix(&config.dotted_extension())
        .tempfile_in(dir)
        .map_err(|source| LauncherError::TempCreateFailed {
            dir: dir.to_path_buf(),
            source,
        })?;

    Ok(TempScript {
        path: file.into_temp_path(),
    })
}
