//! Errors raised by the incident construction protocol itself.
//!
//! These are programming errors (an invalid argument list, a setter fed a
//! value of the wrong kind) or failures surfacing from a lazy formatter at the
//! point where the message is observed. They are never stored inside an
//! [`Incident`](crate::Incident).

use core::fmt::{self, Display};
use std::borrow::Cow;
use std::error::Error;

/// Boxed error type returned by fallible formatters.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Result alias for operations of the incident protocol.
pub type IncidentResult<T> = Result<T, IncidentError>;

/// Failure of an incident operation.
#[derive(Debug)]
#[non_exhaustive]
pub enum IncidentError {
    /// The argument list given to the resolver does not match any call shape.
    InvalidArguments {
        /// Human-readable explanation.
        reason: Cow<'static, str>,
    },
    /// A setter received a value violating its type contract.
    InvalidArgument {
        /// Name of the field being assigned.
        field: &'static str,
        /// Kind of value the field accepts.
        expected: &'static str,
        /// Kind of value that was received.
        found: &'static str,
    },
    /// A lazy message formatter failed while resolving the message.
    FormatterFailure {
        /// Name of the incident whose message was being resolved.
        name: String,
        /// Error returned by the formatter.
        source: BoxError,
    },
}

impl IncidentError {
    #[inline]
    pub(crate) fn invalid_arguments<R: Into<Cow<'static, str>>>(reason: R) -> Self {
        Self::InvalidArguments { reason: reason.into() }
    }

    #[inline]
    pub(crate) fn invalid_argument(
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::InvalidArgument { field, expected, found }
    }

    /// Returns `true` for errors caused by the caller (invalid arguments).
    #[inline]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Self::InvalidArguments { .. } | Self::InvalidArgument { .. })
    }
}

impl Display for IncidentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments { reason } => write!(f, "invalid incident arguments: {}", reason),
            Self::InvalidArgument { field, expected, found } => {
                write!(f, "invalid value for `{}`: expected {}, found {}", field, expected, found)
            },
            Self::FormatterFailure { name, source } => {
                write!(f, "message formatter of `{}` failed: {}", name, source)
            },
        }
    }
}

impl Error for IncidentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FormatterFailure { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
