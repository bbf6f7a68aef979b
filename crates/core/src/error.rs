// Failure signals raised by the probe itself

use crate::thrown::{BoxError, Thrown};
use std::any::TypeId;
use std::error::Error as StdError;
use thiserror::Error;

/// The statement completed although a failure was expected
#[derive(Error, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[error("The Statement did not throw an exception.")]
pub struct NotThrownFailure;

/// The statement failed, but not with the expected type
#[derive(Error, Debug)]
#[error("The Statement threw a {thrown_type_name} instead of a {expected_type_name}.")]
pub struct WrongTypeThrownFailure {
    expected_type: TypeId,
    expected_type_name: &'static str,
    thrown_type_name: &'static str,
    #[source]
    thrown: Thrown,
}

impl WrongTypeThrownFailure {
    /// Create a failure for a statement that should have failed with a `T`
    pub fn new<T: 'static>(thrown: Thrown) -> Self {
        Self {
            expected_type: TypeId::of::<T>(),
            expected_type_name: std::any::type_name::<T>(),
            thrown_type_name: thrown.type_name(),
            thrown,
        }
    }

    /// Type of the expected failure
    pub fn expected_type(&self) -> TypeId {
        self.expected_type
    }

    /// Fully-qualified name of the expected failure type
    pub fn expected_type_name(&self) -> &'static str {
        self.expected_type_name
    }

    /// The failure that has been thrown instead
    pub fn thrown(&self) -> &Thrown {
        &self.thrown
    }

    pub fn into_thrown(self) -> Thrown {
        self.thrown
    }
}

/// An error raised through a signature that does not return `Result`
///
/// The original error is kept as `source()`.
#[derive(Error, Debug)]
#[error("See original cause.")]
pub struct WrappedFailure {
    #[source]
    cause: BoxError,
}

impl WrappedFailure {
    pub fn new(cause: impl Into<BoxError>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// The wrapped error, as returned by the statement
    pub fn original_cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    pub fn into_cause(self) -> BoxError {
        self.cause
    }
}

/// Probe-level error type
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    NotThrown(#[from] NotThrownFailure),

    #[error(transparent)]
    WrongType(#[from] WrongTypeThrownFailure),
}

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;
