// Captured failure - the error or panic a statement produced

use crate::error::{NotThrownFailure, WrappedFailure, WrongTypeThrownFailure};
use std::any::{type_name, Any};
use std::error::Error;
use std::fmt;
use tracing::debug;

/// Boxed error as stored by a captured failure
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Panic payload as produced by `std::panic::catch_unwind`
pub type PanicPayload = Box<dyn Any + Send + 'static>;

enum Kind {
    Error(BoxError),
    Panic(PanicPayload),
}

/// A failure captured from a statement
///
/// Either the error a statement returned, or the payload it panicked with.
/// The value is owned and never cloned: a boxed error keeps its allocation
/// from the moment the statement returns it until it is handed back.
pub struct Thrown {
    kind: Kind,
    type_name: &'static str,
}

impl Thrown {
    /// Capture an error returned by a statement
    ///
    /// The static type of `error` is recorded for diagnostics. Passing an
    /// already boxed error keeps its allocation.
    pub fn from_error<E>(error: E) -> Self
    where
        E: Into<BoxError> + 'static,
    {
        Self {
            kind: Kind::Error(error.into()),
            type_name: type_name::<E>(),
        }
    }

    /// Capture the payload of a panic
    ///
    /// Message payloads and the probe's own signals are named by their type.
    pub fn from_panic(payload: PanicPayload) -> Self {
        let type_name = if payload.is::<&'static str>() {
            type_name::<&'static str>()
        } else if payload.is::<String>() {
            type_name::<String>()
        } else if payload.is::<WrappedFailure>() {
            type_name::<WrappedFailure>()
        } else if payload.is::<NotThrownFailure>() {
            type_name::<NotThrownFailure>()
        } else if payload.is::<WrongTypeThrownFailure>() {
            type_name::<WrongTypeThrownFailure>()
        } else {
            type_name::<PanicPayload>()
        };

        Self {
            kind: Kind::Panic(payload),
            type_name,
        }
    }

    /// Whether the statement returned an error
    pub fn is_error(&self) -> bool {
        matches!(self.kind, Kind::Error(_))
    }

    /// Whether the statement panicked
    pub fn is_panic(&self) -> bool {
        matches!(self.kind, Kind::Panic(_))
    }

    /// Fully-qualified type name of the captured value
    ///
    /// For errors this is the type the statement returned. For panics it is
    /// `&str` or `String` for message payloads, or the signal type for a
    /// nested probe failure. Other payload types cannot be named at runtime
    /// and report the boxed `Any` type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the captured value is a `T`
    pub fn is<T>(&self) -> bool
    where
        T: Error + 'static,
    {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrow the captured value as a `T`
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Error + 'static,
    {
        match &self.kind {
            Kind::Error(error) => error.downcast_ref::<T>(),
            Kind::Panic(payload) => payload.downcast_ref::<T>(),
        }
    }

    /// Take the captured value as a `T`
    ///
    /// The box is reused, not reallocated. On mismatch the failure is handed
    /// back untouched.
    pub fn downcast<T>(self) -> Result<Box<T>, Thrown>
    where
        T: Error + 'static,
    {
        let Thrown { kind, type_name } = self;
        match kind {
            Kind::Error(error) => error.downcast::<T>().map_err(|error| Thrown {
                kind: Kind::Error(error),
                type_name,
            }),
            Kind::Panic(payload) => payload.downcast::<T>().map_err(|payload| Thrown {
                kind: Kind::Panic(payload),
                type_name,
            }),
        }
    }

    /// Message of a panic raised with `panic!("...")`
    pub fn panic_message(&self) -> Option<&str> {
        match &self.kind {
            Kind::Panic(payload) => {
                if let Some(s) = payload.downcast_ref::<&str>() {
                    Some(*s)
                } else {
                    payload.downcast_ref::<String>().map(String::as_str)
                }
            }
            Kind::Error(_) => None,
        }
    }

    /// The captured error, if the statement returned one
    pub fn into_error(self) -> Result<BoxError, Thrown> {
        match self.kind {
            Kind::Error(error) => Ok(error),
            kind => Err(Thrown {
                kind,
                type_name: self.type_name,
            }),
        }
    }

    /// The captured panic payload, if the statement panicked
    pub fn into_panic_payload(self) -> Result<PanicPayload, Thrown> {
        match self.kind {
            Kind::Panic(payload) => Ok(payload),
            kind => Err(Thrown {
                kind,
                type_name: self.type_name,
            }),
        }
    }

    /// Surface the failure to the caller
    ///
    /// A panic resumes unwinding with the original payload. An error cannot
    /// cross a signature that does not return `Result`, so it is raised as a
    /// [`WrappedFailure`] panic whose source is the original error.
    pub fn propagate(self) -> ! {
        match self.kind {
            Kind::Panic(payload) => {
                debug!(thrown = %self.type_name, "Resuming panic raised by statement");
                std::panic::resume_unwind(payload)
            }
            Kind::Error(error) => {
                debug!(thrown = %self.type_name, "Wrapping error returned by statement");
                std::panic::panic_any(WrappedFailure::new(error))
            }
        }
    }
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Error(error) => f
                .debug_struct("Thrown")
                .field("type_name", &self.type_name)
                .field("error", error)
                .finish(),
            Kind::Panic(_) => f
                .debug_struct("Thrown")
                .field("type_name", &self.type_name)
                .field("panic", &self.panic_message().unwrap_or("<non-string payload>"))
                .finish(),
        }
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Error(error) => fmt::Display::fmt(error, f),
            Kind::Panic(_) => match self.panic_message() {
                Some(msg) => write!(f, "panicked: {}", msg),
                None => write!(f, "panicked with a {} payload", self.type_name),
            },
        }
    }
}

impl Error for Thrown {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            Kind::Error(error) => error.source(),
            Kind::Panic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("foo {0}")]
    struct FooError(i32);

    fn panic_payload(f: impl FnOnce()) -> PanicPayload {
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).unwrap_err()
    }

    #[test]
    fn test_from_error_records_static_type() {
        let thrown = Thrown::from_error(FooError(1));
        assert!(thrown.is_error());
        assert!(!thrown.is_panic());
        assert!(thrown.type_name().ends_with("FooError"));
    }

    #[test]
    fn test_boxed_error_keeps_allocation() {
        let error: BoxError = Box::new(FooError(7));
        let addr = &*error as *const (dyn Error + Send + Sync) as *const ();

        let thrown = Thrown::from_error(error);
        let foo = thrown.downcast::<FooError>().unwrap();

        assert_eq!(&*foo as *const FooError as *const (), addr);
        assert_eq!(foo.0, 7);
    }

    #[test]
    fn test_downcast_mismatch_returns_failure_untouched() {
        let thrown = Thrown::from_error(FooError(3));
        let thrown = thrown.downcast::<io::Error>().unwrap_err();

        assert_eq!(thrown.downcast_ref::<FooError>().map(|e| e.0), Some(3));
    }

    #[test]
    fn test_panic_message_from_str_payload() {
        let thrown = Thrown::from_panic(panic_payload(|| panic!("boom")));
        assert!(thrown.is_panic());
        assert_eq!(thrown.panic_message(), Some("boom"));
        assert_eq!(thrown.type_name(), "&str");
        assert_eq!(thrown.to_string(), "panicked: boom");
    }

    #[test]
    fn test_panic_message_from_formatted_payload() {
        let value = 42;
        let thrown = Thrown::from_panic(panic_payload(move || panic!("value was {}", value)));
        assert_eq!(thrown.panic_message(), Some("value was 42"));
        assert_eq!(thrown.type_name(), type_name::<String>());
    }

    #[test]
    fn test_typed_panic_payload_matches() {
        let thrown = Thrown::from_panic(panic_payload(|| std::panic::panic_any(FooError(9))));
        assert!(thrown.is::<FooError>());
        assert!(thrown.panic_message().is_none());
        assert_eq!(thrown.downcast::<FooError>().unwrap().0, 9);
    }

    #[test]
    fn test_signal_payloads_are_named() {
        let wrapped = Thrown::from_panic(panic_payload(|| {
            std::panic::panic_any(WrappedFailure::new(FooError(13)))
        }));
        assert_eq!(wrapped.type_name(), type_name::<WrappedFailure>());

        let not_thrown = Thrown::from_panic(panic_payload(|| std::panic::panic_any(NotThrownFailure)));
        assert_eq!(not_thrown.type_name(), type_name::<NotThrownFailure>());

        let wrong_type = Thrown::from_panic(panic_payload(|| {
            std::panic::panic_any(WrongTypeThrownFailure::new::<io::Error>(Thrown::from_error(
                FooError(14),
            )))
        }));
        assert_eq!(wrong_type.type_name(), type_name::<WrongTypeThrownFailure>());
    }

    #[test]
    fn test_into_error_and_into_panic_payload() {
        let thrown = Thrown::from_error(FooError(5));
        let thrown = thrown.into_panic_payload().unwrap_err();
        let error = thrown.into_error().unwrap();
        assert_eq!(error.to_string(), "foo 5");

        let thrown = Thrown::from_panic(panic_payload(|| panic!("x")));
        let thrown = thrown.into_error().unwrap_err();
        assert!(thrown.into_panic_payload().is_ok());
    }

    #[test]
    fn test_display_and_source_follow_error() {
        let inner = io::Error::new(io::ErrorKind::NotFound, "missing");
        let thrown = Thrown::from_error(inner);
        assert_eq!(thrown.to_string(), "missing");
        assert!(thrown.source().is_none());
    }

    #[test]
    fn test_propagate_resumes_panic_payload() {
        let thrown = Thrown::from_panic(panic_payload(|| std::panic::panic_any(FooError(11))));
        let payload = panic_payload(move || thrown.propagate());
        assert_eq!(payload.downcast::<FooError>().unwrap().0, 11);
    }

    #[test]
    fn test_propagate_wraps_error() {
        let thrown = Thrown::from_error(FooError(12));
        let payload = panic_payload(move || thrown.propagate());
        let wrapped = payload.downcast::<WrappedFailure>().unwrap();
        assert_eq!(wrapped.to_string(), "See original cause.");
        assert_eq!(
            wrapped.original_cause().downcast_ref::<FooError>().map(|e| e.0),
            Some(12)
        );
    }
}
