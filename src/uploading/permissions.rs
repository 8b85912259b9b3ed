//! Owner permission bit checks for directories and relocated files.

use crate::core::{Error, Result};

pub const OWNER_READ: u32 = 0o400;
pub const OWNER_WRITE: u32 = 0o200;
pub const OWNER_EXEC: u32 = 0o100;

/// Directories need owner `rwx`; without `x` their content cannot be listed.
pub fn validate_dir_permissions(mode: u32) -> Result<u32> {
    if mode & OWNER_READ == 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "directory will not be available for reading",
        });
    }
    if mode & OWNER_WRITE == 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "directory will not be available for writing",
        });
    }
    if mode & OWNER_EXEC == 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "content of directory will not be available",
        });
    }
    Ok(mode)
}

/// Files need owner `rw` and must never be executable.
pub fn validate_file_permissions(mode: u32) -> Result<u32> {
    if mode & OWNER_READ == 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "file will not be available for reading",
        });
    }
    if mode & OWNER_WRITE == 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "file will not be available for writing",
        });
    }
    if mode & OWNER_EXEC != 0 {
        return Err(Error::InvalidPermissions {
            mode,
            reason: "file must not be executable",
        });
    }
    Ok(mode)
}
