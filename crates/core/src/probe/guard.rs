// Panic-guarded evaluation of a statement
use crate::statement::Statement;
use crate::thrown::Thrown;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::trace;

/// Evaluate a statement exactly once, capturing both failure kinds
///
/// An error returned by the statement and a panic raised inside it both
/// end up as `Err(Thrown)`. The statement is wrapped in `AssertUnwindSafe`:
/// whatever it captured is handed back to the caller together with the
/// failure, so observing broken invariants is the caller's decision.
///
/// # Example
/// ```text
/// let returned = evaluate_guarded(|| "NaN".parse::<u8>()).unwrap_err();
/// assert!(returned.is_error() && returned.is::<ParseIntError>());
///
/// let panicked = evaluate_guarded(|| -> Result<u8, ParseIntError> { panic!("no digits") })
///     .unwrap_err();
/// assert_eq!(panicked.panic_message(), Some("no digits"));
/// ```
pub(crate) fn evaluate_guarded<S>(statement: S) -> Result<S::Output, Thrown>
where
    S: Statement,
{
    let outcome = match catch_unwind(AssertUnwindSafe(|| statement.evaluate())) {
        Ok(result) => result,
        Err(payload) => Err(Thrown::from_panic(payload)),
    };

    match &outcome {
        Ok(_) => trace!("Statement completed without failure"),
        Err(thrown) => trace!(
            thrown = %thrown.type_name(),
            panicked = thrown.is_panic(),
            "Statement failed"
        ),
    }
    outcome
}
