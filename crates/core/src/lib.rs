// Fishbowl - Exposes failures raised by a piece of code
// Pure logic only: no runtime, no I/O, no shared state

//! Run a piece of code once and get hold of the failure it produced.
//!
//! A failure is either an error returned by the code or a panic raised
//! inside it. Tests can assert against the captured failure instead of
//! relying on `#[should_panic]`.
//!
//! # Example
//!
//! ```
//! use fishbowl::{default_on_failure, exception_thrown_by_type};
//! use std::num::ParseIntError;
//!
//! let error = exception_thrown_by_type::<ParseIntError, _>(|| "NaN".parse::<i64>());
//! assert_eq!(error.to_string(), "invalid digit found in string");
//!
//! let value = default_on_failure::<ParseIntError, _>(|| "NaN".parse::<i64>(), 0);
//! assert_eq!(value, 0);
//! ```

pub mod error;
pub mod probe;
pub mod statement;
pub mod thrown;

pub use error::{
    NotThrownFailure, ProbeError, Result, WrappedFailure, WrongTypeThrownFailure,
};
pub use probe::{
    default_on_failure, exception_thrown_by, exception_thrown_by_type, ignore_failure,
    ignore_failure_of_type, try_exception_thrown_by, try_exception_thrown_by_type, wrap_failure,
};
pub use statement::{Outcome, Statement};
pub use thrown::{BoxError, PanicPayload, Thrown};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
