//! Read-only keyed blob lookup inside the running executable.

use std::borrow::Cow;

use pslaunch_utils::LauncherError;

/// Where the embedded script bytes come from.
pub trait ResourceSource {
    /// Numeric ID the payload is addressed by.
    fn id(&self) -> u16;

    /// The payload bytes.
    ///
    /// # Errors
    ///
    /// Any lookup failure, and [`LauncherError::ResourceEmpty`] for a
    /// zero-length payload.
    fn bytes(&self) -> Result<&[u8], LauncherError>;
}

/// A payload compiled into the binary as a byte array.
#[derive(Debug, Clone)]
pub struct BundledResource {
    id: u16,
    bytes: Cow<'static, [u8]>,
}

impl BundledResource {
    #[must_use]
    pub fn new(id: u16, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            id,
            bytes: bytes.into(),
        }
    }
}

impl ResourceSource for BundledResource {
    fn id(&self) -> u16 {
        self.id
    }

    fn bytes(&self) -> Result<&[u8], LauncherError> {
        if self.bytes.is_empty() {
            return Err(LauncherError::ResourceEmpty { id: self.id });
        }
        Ok(&self.bytes)
    }
}

/// A payload stored as an `RCDATA` resource in the executable's own image.
#[cfg(windows)]
#[derive(Debug, Clone, Copy)]
pub struct ModuleResource {
    id: u16,
}

#[cfg(windows)]
impl ModuleResource {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self { id }
    }
}

/// Resource type ID of raw data blobs.
#[cfg(windows)]
const RT_RCDATA_ID: u16 = 10;

/// `MAKEINTRESOURCEW`: an integer ID smuggled through a string pointer.
#[cfg(windows)]
fn make_int_resource(id: u16) -> windows::core::PCWSTR {
    windows::core::PCWSTR(usize::from(id) as *const u16)
}

#[cfg(windows)]
impl ResourceSource for ModuleResource {
    fn id(&self) -> u16 {
        self.id
    }

    fn bytes(&self) -> Result<&[u8], LauncherError> {
        use pslaunch_utils::error::win32_error;
        use std::io;
        use windows::Win32::System::LibraryLoader::{
            FindResourceW, GetModuleHandleW, LoadResource, LockResource, SizeofResource,
        };
        use windows::core::PCWSTR;

        let id = self.id;

        // SAFETY: the module handle refers to this executable, which stays
        // mapped for the life of the process. Locked resource memory is part
        // of that mapping and is never unlocked or freed, so the returned
        // slice is valid for `'static`.
        unsafe {
            let module = GetModuleHandleW(PCWSTR::null()).map_err(|e| {
                LauncherError::ModuleUnavailable {
                    source: win32_error(&e),
                }
            })?;

            let resource = FindResourceW(
                Some(module),
                make_int_resource(id),
                make_int_resource(RT_RCDATA_ID),
            );
            if resource.is_invalid() {
                return Err(LauncherError::ResourceNotFound {
                    id,
                    source: io::Error::last_os_error(),
                });
            }

            let loaded = LoadResource(Some(module), resource).map_err(|e| {
                LauncherError::ResourceLoadFailed {
                    id,
                    source: win32_error(&e),
                }
            })?;

            let data = LockResource(loaded);
            if data.is_null() {
                return Err(LauncherError::ResourceLoadFailed {
                    id,
                    source: io::Error::other("LockResource returned no data"),
                });
            }

            let size = SizeofResource(Some(module), resource);
            if size == 0 {
                return Err(LauncherError::ResourceEmpty { id });
            }

            Ok(std::slice::from_raw_parts(data.cast::<u8>(), size as usize))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_returns_bytes() {
        let source = BundledResource::new(101, &b"Write-Output 'hi'"[..]);
        assert_eq!(source.id(), 101);
        assert_eq!(source.bytes().unwrap(), b"Write-Output 'hi'");
    }

    #[test]
    fn test_bundled_owned_bytes() {
        let source = BundledResource::new(5, vec![0u8, 1, 2, 255]);
        assert_eq!(source.bytes().unwrap(), &[0u8, 1, 2, 255]);
    }

    #[test]
    fn test_bundled_empty_is_fatal() {
        let source = BundledResource::new(101, Vec::<u8>::new());
        assert!(matches!(
            source.bytes(),
            Err(LauncherError::ResourceEmpty { id: 101 })
        ));
    }

    #[cfg(windows)]
    #[test]
    fn test_missing_module_resource_is_not_found() {
        // Test binaries carry no resource with this ID.
        let source = ModuleResource::new(0xBEEF);
        assert!(matches!(
            source.bytes(),
            Err(LauncherError::ResourceNotFound { id: 0xBEEF, .. })
        ));
    }
}
