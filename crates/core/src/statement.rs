// Callback contracts - code handed to the probe

use crate::thrown::{BoxError, Thrown};

/// Return value of a piece of code that may fail
///
/// Implemented for:
/// - `()` - code that can only fail by panicking
/// - `Result<V, E>` - code that produces a `V` or returns an error
pub trait Outcome {
    /// Value produced when the code succeeds
    type Value;

    /// Convert into a value or a captured failure
    fn into_result(self) -> Result<Self::Value, Thrown>;
}

impl Outcome for () {
    type Value = ();

    fn into_result(self) -> Result<(), Thrown> {
        Ok(())
    }
}

impl<V, E> Outcome for Result<V, E>
where
    E: Into<BoxError> + 'static,
{
    type Value = V;

    fn into_result(self) -> Result<V, Thrown> {
        self.map_err(Thrown::from_error)
    }
}

/// Code that should be executed by the probe
///
/// Every closure `FnOnce() -> R` where `R: Outcome` is a statement, so both
/// `|| { list.clear(); }` and `|| "42".parse::<i32>()` can be passed
/// directly. A statement with `Output = ()` is a statement without return
/// value.
///
/// Panics are not handled here; the probe catches them around `evaluate`.
pub trait Statement {
    /// Value produced by a successful evaluation
    type Output;

    /// Execute the statement
    fn evaluate(self) -> Result<Self::Output, Thrown>;
}

impl<F, R> Statement for F
where
    F: FnOnce() -> R,
    R: Outcome,
{
    type Output = R::Value;

    fn evaluate(self) -> Result<R::Value, Thrown> {
        self().into_result()
    }
}
