//! Strategy state flags, error codes and the per-run outcome record.

use std::borrow::Cow;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::core::{Error, Result};

/// Two-bit state of a strategy after its last run.
///
/// `SUCCESS` is the empty set; `FAILURE` and `BREAK` combine freely.
/// `FAILURE | BREAK` is the usual "stop the pipeline, record failure" state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StrategyState(u8);

impl StrategyState {
    pub const SUCCESS: Self = Self(0b00);
    pub const FAILURE: Self = Self(0b01);
    pub const BREAK: Self = Self(0b10);

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check whether all bits of `other` are set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_failure(self) -> bool {
        self.contains(Self::FAILURE)
    }

    #[inline]
    pub const fn is_break(self) -> bool {
        self.contains(Self::BREAK)
    }
}

impl BitOr for StrategyState {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for StrategyState {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Stable identifier of an operation error, surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    pub const UPLOADED_FILE_CONTAINS_ERROR: Self = Self("uploaded-file-contains-error");
    pub const TARGET_DIR_NOT_SPECIFIED: Self = Self("target-dir-not-specified");
    pub const CREATE_DIRECTORY_FAILED: Self = Self("create-directory-failed");
    pub const DIRECTORY_NOT_READABLE: Self = Self("directory-not-readable");
    pub const DIRECTORY_NOT_WRITABLE: Self = Self("directory-not-writable");
    pub const UPLOADED_FILE_MISSING_TEMPNAME: Self = Self("uploaded-file-missing-tempname");
    pub const MISSING_TEMPORARY_FILE: Self = Self("missing-temporary-file");
    pub const MOVEMENT_FAILED: Self = Self("movement-failed");

    /// Define a code for a custom strategy.
    #[inline]
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Error table of a strategy: every code it may decide on, with its description.
pub type ErrorTable = &'static [(ErrorCode, &'static str)];

/// Outcome of the last run of a strategy.
///
/// Strategies record operational failures here instead of returning them.
/// Only codes listed in the strategy's own [`ErrorTable`] are accepted.
#[derive(Clone, Debug)]
pub struct OperationOutcome {
    errors: ErrorTable,
    state: Option<StrategyState>,
    error: Option<ErrorCode>,
    description: Option<Cow<'static, str>>,
}

impl OperationOutcome {
    /// Create an undecided outcome bound to `errors`.
    pub const fn new(errors: ErrorTable) -> Self {
        Self {
            errors,
            state: None,
            error: None,
            description: None,
        }
    }

    /// State of the last decision, `None` before any decision.
    #[inline]
    pub fn state(&self) -> Option<StrategyState> {
        self.state
    }

    #[inline]
    pub fn error(&self) -> Option<ErrorCode> {
        self.error
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn has_error(&self) -> bool {
        self.state.is_some_and(StrategyState::is_failure)
    }

    /// Error table this outcome validates codes against.
    #[inline]
    pub fn errors(&self) -> ErrorTable {
        self.errors
    }

    /// Record a failure with the description from the error table.
    pub fn decide_on_failure(&mut self, code: ErrorCode) -> Result<()> {
        let description = self.lookup(code)?;
        self.fail(code, Cow::Borrowed(description));
        Ok(())
    }

    /// Record a failure with a description captured at runtime, such as the
    /// text of an OS error.
    pub fn decide_on_failure_with(
        &mut self,
        code: ErrorCode,
        description: impl Into<String>,
    ) -> Result<()> {
        self.lookup(code)?;
        self.fail(code, Cow::Owned(description.into()));
        Ok(())
    }

    /// Record a success and clear any previous error.
    pub fn decide_on_success(&mut self) {
        self.state = Some(StrategyState::SUCCESS);
        self.error = None;
        self.description = None;
    }

    fn lookup(&self, code: ErrorCode) -> Result<&'static str> {
        self.errors
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, description)| *description)
            .ok_or(Error::UnexpectedErrorCode(code.as_str()))
    }

    fn fail(&mut self, code: ErrorCode, description: Cow<'static, str>) {
        tracing::debug!(error = code.as_str(), description = %description, "upload strategy failed");
        self.state = Some(StrategyState::FAILURE | StrategyState::BREAK);
        self.error = Some(code);
        self.description = Some(description);
    }
}
