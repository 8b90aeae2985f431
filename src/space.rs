//! Filesystem free-space probe
//!
//! The admission gate's last condition is advisory: it reads the free space
//! on the download volume at one point in time, with no reservation and no
//! lock, so a concurrent external writer can make the number stale. The
//! probe is injectable so tests can pin the value.

use std::io;
use std::path::Path;
use std::sync::Arc;

/// Injectable free-space probe, `path -> available bytes`.
///
/// The default implementation is [`available_space`]; tests substitute a
/// closure returning a fixed value.
pub type SpaceProbe = Arc<dyn Fn(&Path) -> io::Result<u64> + Send + Sync>;

/// [`SpaceProbe`] backed by the platform filesystem query.
#[must_use]
pub fn default_probe() -> SpaceProbe {
    Arc::new(|path| available_space(path))
}

/// Query the available disk space for a path, in bytes.
///
/// - Unix: `statvfs` (`f_bavail * f_frsize`, the unprivileged-user figure)
/// - Windows: `GetDiskFreeSpaceExW`
pub fn available_space(path: &Path) -> io::Result<u64> {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: c_path is a valid null-terminated C string, the statvfs
        // struct is zero-initialized before the call, and it is only read
        // after the call reports success.
        unsafe {
            let mut stat: libc::statvfs = std::mem::zeroed();
            if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok((stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64))
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::ffi::OsStrExt;
        use winapi::um::fileapi::GetDiskFreeSpaceExW;

        let wide_path: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        // SAFETY: wide_path is null-terminated and the out-pointers refer to
        // properly aligned u64 locals, read only after a successful call.
        unsafe {
            let mut free_bytes_available: u64 = 0;
            let mut _total_bytes: u64 = 0;
            let mut _total_free_bytes: u64 = 0;

            if GetDiskFreeSpaceExW(
                wide_path.as_ptr(),
                &mut free_bytes_available as *mut u64 as *mut _,
                &mut _total_bytes as *mut u64 as *mut _,
                &mut _total_free_bytes as *mut u64 as *mut _,
            ) == 0
            {
                return Err(io::Error::last_os_error());
            }
            Ok(free_bytes_available)
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = path;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "disk space checking is not supported on this platform",
        ))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_space_on_existing_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let available = available_space(temp_dir.path()).unwrap();
        // Any live filesystem should report some headroom
        assert!(available > 0);
    }

    #[test]
    fn test_available_space_on_missing_path_errors() {
        let result = available_space(Path::new("/definitely/not/a/real/path/here"));
        assert!(result.is_err());
    }
}
