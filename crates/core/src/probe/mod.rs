// Probe - exposes and classifies failures of a statement
//
// Every operation evaluates its statement exactly once. Failures come in two
// kinds: an error returned by the statement, or a panic raised inside it.
// Panics are never wrapped; they resume with their original payload.

mod guard;


use crate::error::{NotThrownFailure, ProbeError, Result, WrongTypeThrownFailure};
use crate::statement::Statement;
use crate::thrown::Thrown;
use guard::evaluate_guarded;
use std::any::type_name;
use std::error::Error;
use tracing::debug;

/// Executes the provided statement and returns the failure it produced
///
/// Panics with a [`NotThrownFailure`] payload if the statement completes.
///
/// # Example
/// ```text
/// let numbers: Vec<i32> = Vec::new();
/// let thrown = exception_thrown_by(|| {
///     let _first = numbers[0];
/// });
/// assert!(thrown.panic_message().unwrap().contains("index out of bounds"));
/// ```
pub fn exception_thrown_by<S>(statement: S) -> Thrown
where
    S: Statement,
{
    match try_exception_thrown_by(statement) {
        Ok(thrown) => thrown,
        Err(failure) => signal(failure),
    }
}

/// Like [`exception_thrown_by`], but returns the failure signal instead of
/// panicking
pub fn try_exception_thrown_by<S>(statement: S) -> std::result::Result<Thrown, NotThrownFailure>
where
    S: Statement,
{
    match evaluate_guarded(statement) {
        Ok(_) => Err(NotThrownFailure),
        Err(thrown) => Ok(thrown),
    }
}

/// Executes the provided statement and returns the failure it produced,
/// narrowed to `T`
///
/// Panics with a [`NotThrownFailure`] payload if the statement completes,
/// and with a [`WrongTypeThrownFailure`] payload if it fails with anything
/// other than a `T`.
///
/// # Example
/// ```text
/// let error = exception_thrown_by_type::<ParseIntError, _>(|| "NaN".parse::<i64>());
/// assert_eq!(error.kind(), &IntErrorKind::InvalidDigit);
/// ```
pub fn exception_thrown_by_type<T, S>(statement: S) -> Box<T>
where
    T: Error + 'static,
    S: Statement,
{
    match try_exception_thrown_by_type::<T, S>(statement) {
        Ok(failure) => failure,
        Err(ProbeError::NotThrown(failure)) => signal(failure),
        Err(ProbeError::WrongType(failure)) => signal(failure),
    }
}

/// Like [`exception_thrown_by_type`], but returns the failure signal instead
/// of panicking
pub fn try_exception_thrown_by_type<T, S>(statement: S) -> Result<Box<T>>
where
    T: Error + 'static,
    S: Statement,
{
    let thrown = try_exception_thrown_by(statement)?;
    let thrown_type = thrown.type_name();
    match thrown.downcast::<T>() {
        Ok(failure) => {
            debug!(
                thrown = %thrown_type,
                expected = type_name::<T>(),
                "Statement failed with expected type"
            );
            Ok(failure)
        }
        Err(thrown) => {
            debug!(
                thrown = %thrown_type,
                expected = type_name::<T>(),
                "Statement failed with unexpected type"
            );
            Err(WrongTypeThrownFailure::new::<T>(thrown).into())
        }
    }
}

/// Executes the provided statement and returns its value
///
/// A panic resumes unchanged. An error is raised as a
/// [`WrappedFailure`](crate::error::WrappedFailure) panic so that the caller
/// does not need to return `Result` itself.
///
/// # Example
/// ```text
/// fn read_config(path: &Path) -> String {
///     wrap_failure(|| std::fs::read_to_string(path))
/// }
/// ```
pub fn wrap_failure<S>(statement: S) -> S::Output
where
    S: Statement,
{
    match evaluate_guarded(statement) {
        Ok(value) => value,
        Err(thrown) => thrown.propagate(),
    }
}

/// Executes the provided statement and returns `default_value` if it fails
/// with a `T`
///
/// Other failures follow [`wrap_failure`].
///
/// # Example
/// ```text
/// let value = default_on_failure::<ParseIntError, _>(|| "NaN".parse::<i64>(), 0);
/// assert_eq!(value, 0);
/// ```
pub fn default_on_failure<T, S>(statement: S, default_value: S::Output) -> S::Output
where
    T: Error + 'static,
    S: Statement,
{
    match evaluate_guarded(statement) {
        Ok(value) => value,
        Err(thrown) if thrown.is::<T>() => {
            debug!(
                thrown = %thrown.type_name(),
                expected = type_name::<T>(),
                "Statement failed with expected type, using default value"
            );
            default_value
        }
        Err(thrown) => thrown.propagate(),
    }
}

/// Executes the provided statement and suppresses any failure
///
/// # Example
/// ```text
/// ignore_failure(|| worker.do_something_that_fails());
/// // executed even if the worker fails
/// do_something_else();
/// ```
pub fn ignore_failure<S>(statement: S)
where
    S: Statement,
{
    if let Err(thrown) = evaluate_guarded(statement) {
        debug!(thrown = %thrown.type_name(), "Ignoring failure of statement");
    }
}

/// Executes the provided statement and suppresses a failure of type `T`
///
/// Other failures follow [`wrap_failure`].
pub fn ignore_failure_of_type<T, S>(statement: S)
where
    T: Error + 'static,
    S: Statement,
{
    match evaluate_guarded(statement) {
        Ok(_) => {}
        Err(thrown) if thrown.is::<T>() => {
            debug!(
                thrown = %thrown.type_name(),
                expected = type_name::<T>(),
                "Ignoring failure of expected type"
            );
        }
        Err(thrown) => thrown.propagate(),
    }
}

/// Raise a probe failure as a panic with a typed payload
fn signal<F>(failure: F) -> !
where
    F: Error + Send + 'static,
{
    debug!(failure = %failure, "Signalling probe failure");
    std::panic::panic_any(failure)
}
