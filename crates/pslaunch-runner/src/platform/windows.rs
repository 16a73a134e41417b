use std::io;
use std::os::windows::ffi::OsStrExt;

use pslaunch_utils::LauncherError;
use pslaunch_utils::error::win32_error;
use windows::Win32::Foundation::{CloseHandle, HANDLE, WAIT_FAILED};
use windows::Win32::System::Threading::{
    CreateProcessW, GetExitCodeProcess, INFINITE, PROCESS_CREATION_FLAGS, PROCESS_INFORMATION,
    STARTUPINFOW, WaitForSingleObject,
};
use windows::core::{PCWSTR, PWSTR};

use crate::command_line::CommandLine;
use crate::process::{ChildProcess, Spawner};

/// RAII wrapper for a Windows handle
///
/// Closes the handle when dropped, on every exit path.
#[derive(Debug)]
pub struct OwnedHandle {
    handle: HANDLE,
}

impl OwnedHandle {
    /// Take ownership of `handle`.
    ///
    /// # Safety
    ///
    /// `handle` must be open and not owned by anything else.
    pub unsafe fn new(handle: HANDLE) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

// SAFETY: Windows HANDLEs are safe to send between threads.
// The HANDLE is an opaque kernel object reference that can be used from any thread.
unsafe impl Send for OwnedHandle {}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if !self.handle.is_invalid() {
            unsafe {
                let _ = CloseHandle(self.handle);
            }
        }
    }
}

/// Spawner built directly on `CreateProcessW`.
///
/// The rendered command line is passed as-is, handles are inherited and no
/// creation flags are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Spawner;

/// Interpreter process started by [`Win32Spawner`].
#[derive(Debug)]
pub struct Win32Child {
    process: OwnedHandle,
    _thread: OwnedHandle,
    pid: u32,
}

impl Spawner for Win32Spawner {
    type Child = Win32Child;

    fn spawn(&self, cmd: &CommandLine) -> Result<Self::Child, LauncherError> {
        // CreateProcessW may write into the command-line buffer.
        let mut line: Vec<u16> = cmd
            .render()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let startup = STARTUPINFOW {
            cb: std::mem::size_of::<STARTUPINFOW>() as u32,
            ..Default::default()
        };
        let mut info = PROCESS_INFORMATION::default();

        // SAFETY: `line` is a mutable NUL-terminated buffer that outlives the
        // call; `startup` and `info` are valid for reads and writes.
        unsafe {
            CreateProcessW(
                PCWSTR::null(),
                Some(PWSTR(line.as_mut_ptr())),
                None,
                None,
                true,
                PROCESS_CREATION_FLAGS(0),
                None,
                PCWSTR::null(),
                &startup,
                &mut info,
            )
        }
        .map_err(|e| LauncherError::LaunchFailed {
            interpreter: cmd.program.clone(),
            source: win32_error(&e),
        })?;

        // SAFETY: CreateProcessW succeeded, so both handles are open and ours.
        let (process, thread) = unsafe {
            (
                OwnedHandle::new(info.hProcess),
                OwnedHandle::new(info.hThread),
            )
        };

        Ok(Win32Child {
            process,
            _thread: thread,
            pid: info.dwProcessId,
        })
    }
}

impl ChildProcess for Win32Child {
    fn id(&self) -> u32 {
        self.pid
    }

    fn wait(&mut self) -> Result<u32, LauncherError> {
        // SAFETY: the process handle is open for the lifetime of `self`.
        let event = unsafe { WaitForSingleObject(self.process.raw(), INFINITE) };
        if event == WAIT_FAILED {
            return Err(LauncherError::WaitFailed {
                source: io::Error::last_os_error(),
            });
        }

        let mut code = 0u32;
        // SAFETY: as above; `code` is a valid out pointer.
        unsafe { GetExitCodeProcess(self.process.raw(), &mut code) }
            .map_err(|e| LauncherError::WaitFailed {
                source: win32_error(&e),
            })?;

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn cmd_exe() -> std::path::PathBuf {
        let root = std::env::var_os("SystemRoot").unwrap_or_else(|| r"C:\Windows".into());
        Path::new(&root).join("System32").join("cmd.exe")
    }

    #[test]
    fn test_exit_code_passthrough() {
        let cmd = CommandLine::new(cmd_exe()).args(["/C", "exit 7"]);

        let mut child = Win32Spawner.spawn(&cmd).unwrap();
        assert!(child.id() > 0);
        assert_eq!(child.wait().unwrap(), 7);
    }

    #[test]
    fn test_missing_interpreter_reports_last_error() {
        let cmd = CommandLine::new(r"C:\nonexistent\pslaunch\powershell.exe");

        let err = Win32Spawner.spawn(&cmd).unwrap_err();

        assert!(matches!(err, LauncherError::LaunchFailed { .. }));
        // ERROR_FILE_NOT_FOUND or ERROR_PATH_NOT_FOUND
        assert!(matches!(err.to_exit_code().as_u32(), 2 | 3));
    }
}
