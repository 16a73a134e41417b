//! Platform process backends.

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::{OwnedHandle, Win32Child, Win32Spawner};

/// The spawner used for real launches on this host.
#[cfg(windows)]
pub type DefaultSpawner = Win32Spawner;

/// The spawner used for real launches on this host.
#[cfg(not(windows))]
pub type DefaultSpawner = crate::process::StdSpawner;
