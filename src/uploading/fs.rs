//! Filesystem capability used by upload strategies.
//!
//! Strategies never touch `std::fs` directly. They go through a
//! [`Filesystem`] so that permission-dependent branches can be exercised
//! with a fake implementation.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Filesystem primitives needed to relocate an upload.
pub trait Filesystem: Send + Sync + fmt::Debug {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Whether the current process may read `path`.
    fn is_readable(&self, path: &Path) -> bool;

    /// Whether the current process may write `path`.
    fn is_writable(&self, path: &Path) -> bool;

    /// Create `path` and any missing parents with `mode`.
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()>;

    /// Move `from` to `to`, replacing `to` if it exists.
    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()>;
}

/// [`Filesystem`] backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_readable(&self, path: &Path) -> bool {
        access(path, Access::Read)
    }

    fn is_writable(&self, path: &Path) -> bool {
        access(path, Access::Write)
    }

    #[cfg(unix)]
    fn create_dir_all(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::DirBuilderExt;

        fs::DirBuilder::new().recursive(true).mode(mode).create(path)
    }

    #[cfg(not(unix))]
    fn create_dir_all(&self, path: &Path, _mode: u32) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn move_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err) if is_cross_device(&err) => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(mode & super::permissions::OWNER_WRITE == 0);
        fs::set_permissions(path, permissions)
    }
}

#[derive(Clone, Copy)]
enum Access {
    Read,
    Write,
}

#[cfg(unix)]
fn access(path: &Path, access: Access) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    let mode = match access {
        Access::Read => libc::R_OK,
        Access::Write => libc::W_OK,
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(not(unix))]
fn access(path: &Path, access: Access) -> bool {
    match (fs::metadata(path), access) {
        (Ok(_), Access::Read) => true,
        (Ok(meta), Access::Write) => !meta.permissions().readonly(),
        (Err(_), _) => false,
    }
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}
