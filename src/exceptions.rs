//! Exception taxonomy shared by generated lexers and parsers.
//!
//! The kinds form two independent hierarchies, both built on [`crate::rtti`]:
//!
//! ```text
//! RuntimeFailure
//! ├── IllegalState
//! │   └── Cancellation
//! │       └── ParseCancellation
//! ├── IllegalArgument
//! ├── NullReference
//! ├── IndexOutOfBounds
//! ├── UnsupportedOperation
//! └── EmptyStack
//!
//! IoFailure
//! ```
//!
//! `IoFailure` does not descend from `RuntimeFailure`, so a handler for runtime failures never
//! swallows an I/O condition.
//!
//! A kind is raised by wrapping it in [`Raised`] and returning it as an error. A handler declared
//! for kind `K` catches every raised value whose dynamic kind has `K` in its ancestry; anything
//! else keeps propagating unchanged.
//!
//! # Example
//!
//! ```rust
//! use parsecore::exceptions::{Catch, Exception, IllegalArgument, Raised, RuntimeFailure};
//!
//! fn parse_width(text: &str) -> Result<u32, Raised> {
//!     text.parse()
//!         .map_err(|_| Raised::new(IllegalArgument::new(format!("not a width: {text}"))))
//! }
//!
//! let width = parse_width("wide")
//!     .catch(|failure: &RuntimeFailure| {
//!         assert!(failure.message().starts_with("not a width"));
//!         0
//!     })
//!     .unwrap();
//! assert_eq!(width, 0);
//! ```

use std::fmt;

use crate::rtti::{self, Rtti};

/// Behaviour common to every member of the taxonomy.
pub trait Exception: Rtti + fmt::Debug + fmt::Display {
    /// The message the exception was raised with.
    fn message(&self) -> &str;
}

/// Root of the runtime-failure hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeFailure {
    message: String,
}

impl RuntimeFailure {
    /// Creates the exception with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        RuntimeFailure {
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Exception for RuntimeFailure {
    fn message(&self) -> &str {
        &self.message
    }
}

impl_rtti!(RuntimeFailure);

derived_exception!(
    /// An operation was invoked while the receiver was in a state that does not permit it.
    IllegalState: RuntimeFailure
);

derived_exception!(
    /// An argument violated the contract of the operation it was passed to.
    IllegalArgument: RuntimeFailure
);

derived_exception!(
    /// A required reference was absent.
    NullReference: RuntimeFailure
);

derived_exception!(
    /// An index fell outside the bounds of the indexed sequence.
    IndexOutOfBounds: RuntimeFailure
);

derived_exception!(
    /// The receiver does not implement the requested operation.
    UnsupportedOperation: RuntimeFailure
);

derived_exception!(
    /// A pop or peek was attempted on an empty stack.
    EmptyStack: RuntimeFailure
);

derived_exception!(
    /// Work was cancelled on request from outside.
    ///
    /// Nothing in this crate enforces cancellation; the kind exists so that embedding code can
    /// signal it through the normal error path.
    Cancellation: IllegalState
);

derived_exception!(
    /// A parse was cancelled, typically by a bail-out error strategy.
    ParseCancellation: Cancellation
);

/// Root of the I/O failure hierarchy, independent from [`RuntimeFailure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoFailure {
    message: String,
}

impl IoFailure {
    /// Creates the exception with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        IoFailure {
            message: message.into(),
        }
    }
}

impl fmt::Display for IoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Exception for IoFailure {
    fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for IoFailure {
    fn from(error: std::io::Error) -> Self {
        IoFailure::new(error.to_string())
    }
}

impl_rtti!(IoFailure);

/// A raised exception travelling up the error path.
///
/// Owns exactly one member of the taxonomy. Use [`Raised::catch`] (or [`Catch::catch`] on a
/// `Result`) to handle it by ancestor kind.
pub struct Raised(Box<dyn Exception>);

impl Raised {
    /// Raises `exception`.
    pub fn new<E: Exception>(exception: E) -> Self {
        Raised(Box::new(exception))
    }

    /// The message of the raised exception.
    #[must_use]
    pub fn message(&self) -> &str {
        self.0.message()
    }

    /// The raised exception as a trait object.
    #[must_use]
    pub fn exception(&self) -> &dyn Exception {
        self.0.as_ref()
    }

    /// Name of the dynamic kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Returns `true` if a handler for `K` would catch this exception.
    #[must_use]
    pub fn is<K: Exception>(&self) -> bool {
        rtti::is_a::<K, dyn Exception>(self.0.as_ref())
    }

    /// Views the exception as kind `K`, if `K` is in its ancestry.
    #[must_use]
    pub fn downcast_ref<K: Exception>(&self) -> Option<&K> {
        rtti::cast::<K, dyn Exception>(self.0.as_ref())
    }

    /// Runs `handler` if this exception is a `K`, otherwise keeps propagating it.
    ///
    /// # Errors
    /// Returns `self` unchanged when `K` is not an ancestor of the dynamic kind.
    pub fn catch<K: Exception, R>(self, handler: impl FnOnce(&K) -> R) -> Result<R, Raised> {
        match rtti::cast::<K, dyn Exception>(self.0.as_ref()) {
            Some(caught) => Ok(handler(caught)),
            None => Err(self),
        }
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Raised").field(&self.0).finish()
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for Raised {}

impl From<std::io::Error> for Raised {
    fn from(error: std::io::Error) -> Self {
        Raised::new(IoFailure::from(error))
    }
}

/// Catch-by-ancestor for results carrying a [`Raised`] exception.
pub trait Catch<T> {
    /// Replaces an error of kind `K` (or any descendant) with the value produced by `handler`.
    ///
    /// # Errors
    /// Errors of kinds unrelated to `K` are passed through unchanged.
    fn catch<K: Exception>(self, handler: impl FnOnce(&K) -> T) -> Result<T, Raised>;
}

impl<T> Catch<T> for Result<T, Raised> {
    fn catch<K: Exception>(self, handler: impl FnOnce(&K) -> T) -> Result<T, Raised> {
        match self {
            Ok(value) => Ok(value),
            Err(raised) => raised.catch(handler),
        }
    }
}
