use thiserror::Error;

use crate::exceptions::Raised;

macro_rules! illegal_argument {
    // Single string version
    ($msg:expr) => {
        crate::exceptions::Raised::new(crate::exceptions::IllegalArgument::new($msg))
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::exceptions::Raised::new(crate::exceptions::IllegalArgument::new(format!($fmt, $($arg)*)))
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Allocation exhaustion and type mismatches are reported as plain values; contract violations
/// travel as a [`Raised`] exception so that callers can catch them by ancestor kind (see
/// [`crate::exceptions`]).
///
/// # Error Categories
///
/// ## Allocation Errors
/// - [`Error::AllocationFailed`] - The system allocator refused a new block
///
/// ## Type Identity Errors
/// - [`Error::TypeMismatch`] - A checked cast or typed extraction hit a different type
/// - [`Error::CloneUnsupported`] - A value container payload was stored without copy support
///
/// ## Contract Violations
/// - [`Error::Exception`] - A member of the exception taxonomy was raised
///
/// # Examples
///
/// ```rust
/// use parsecore::{Error, memory::FixedAllocator};
///
/// match FixedAllocator::new(16, 0) {
///     Ok(_) => unreachable!(),
///     Err(Error::Exception(raised)) => println!("rejected: {}", raised.message()),
///     Err(e) => println!("other: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying system allocation failed.
    ///
    /// Raised by the pool and arena allocators when a new block could not be
    /// reserved. Nothing is retried; the caller decides whether to abort or to
    /// shrink its request.
    ///
    /// # Fields
    ///
    /// * `requested` - Number of bytes the failed block reservation asked for
    #[error("Allocation of {requested} bytes failed")]
    AllocationFailed {
        /// The size of the reservation that failed
        requested: usize,
    },

    /// A typed access found a value of a different type.
    ///
    /// Produced by [`crate::rtti::checked_cast`] and by the typed accessors of
    /// [`crate::support::AnyValue`].
    #[error("Type mismatch - expected {expected}, found {found}")]
    TypeMismatch {
        /// Name of the requested type
        expected: &'static str,
        /// Name of the type that was actually present
        found: &'static str,
    },

    /// The stored payload was not constructed with deep-copy support.
    #[error("Value of type {0} does not support deep copies")]
    CloneUnsupported(&'static str),

    /// A contract violation from the exception taxonomy.
    #[error("{0}")]
    Exception(#[from] Raised),
}

impl Error {
    /// Returns the raised exception, if this error carries one.
    #[must_use]
    pub fn as_raised(&self) -> Option<&Raised> {
        match self {
            Error::Exception(raised) => Some(raised),
            _ => None,
        }
    }
}
