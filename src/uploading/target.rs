//! Relocation destination name.

use std::fmt;
use std::path::{Component, Path};

use crate::core::{Error, Result};

/// Name of the file an upload is relocated to, relative to the target
/// directory. Absolute names and `..` components are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UploadTarget(String);

impl UploadTarget {
    pub fn new(target: impl Into<String>) -> Result<Self> {
        let target = target.into();
        Self::validate(&target)?;
        Ok(Self(target))
    }

    /// Replace the target name.
    pub fn set(&mut self, target: impl Into<String>) -> Result<()> {
        let target = target.into();
        Self::validate(&target)?;
        self.0 = target;
        Ok(())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(target: &str) -> Result<()> {
        if target.is_empty() {
            return Err(Error::InvalidArgument(
                "invalid target provided; must be a non-empty string".into(),
            ));
        }
        let escapes = Path::new(target).components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(Error::InvalidArgument(format!(
                "invalid target provided; {:?} must stay inside the target directory",
                target
            )));
        }
        Ok(())
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UploadTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for UploadTarget {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl TryFrom<&str> for UploadTarget {
    type Error = Error;

    fn try_from(target: &str) -> Result<Self> {
        Self::new(target)
    }
}

impl TryFrom<String> for UploadTarget {
    type Error = Error;

    fn try_from(target: String) -> Result<Self> {
        Self::new(target)
    }
}
