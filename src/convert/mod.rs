//! Conversion of foreign errors and error-like values into incidents.
//!
//! Every entry point is total: it always yields an [`Incident`], and never
//! evaluates a lazy message or stack of its input.
//!
//! - [`Incident::convert`]: a boxed error; an incident inside the box is
//!   returned as-is, in the same allocation.
//! - [`Incident::from_error`]: any error by value.
//! - [`Incident::from_error_like`]: any [`ErrorLike`] value, reusing its name,
//!   data, cause, message and stack.
//! - [`Incident::from_any`]: any value; non-errors become
//!   [`Incident::default`].
//!
//! # Examples
//!
//! ```
//! use incident::Incident;
//!
//! let original: Box<dyn std::error::Error + Send + Sync> = Box::new(Incident::named("Original"));
//! let address = &*original as *const _ as *const u8;
//!
//! let converted = Incident::convert(original);
//! assert_eq!(&*converted as *const Incident as *const u8, address);
//! ```
use core::fmt::{self, Display};
use std::any::Any;
use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

use crate::error::{BoxError, IncidentResult};
use crate::types::incident::as_incident;
use crate::types::lazy_stack::{push_head, CAUSED_BY};
use crate::types::{Cause, Data, Incident, MessageSource, StackSource, DEFAULT_NAME};

/// Name of incidents converted from foreign errors.
pub const FOREIGN_NAME: &str = "Error";

/// A value carrying error semantics that can be turned into an [`Incident`].
///
/// Only [`error_name`](Self::error_name) and
/// [`message_source`](Self::message_source) are required.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use incident::{ErrorLike, Formatter, Incident, MessageSource, StackSource};
///
/// struct LegacyFault {
///     code: u32,
///     trace: String,
/// }
///
/// impl ErrorLike for LegacyFault {
///     fn error_name(&self) -> Cow<'_, str> {
///         Cow::Borrowed("LegacyFault")
///     }
///
///     fn message_source(&self) -> MessageSource {
///         let code = self.code;
///         Formatter::new(move |_| format!("fault code {}", code)).into()
///     }
///
///     fn stack_source(&self) -> Option<StackSource> {
///         Some(StackSource::raw(self.trace.clone()))
///     }
/// }
///
/// let fault = LegacyFault { code: 7, trace: "LegacyFault: fault code 7\n    at legacy.c:12".into() };
/// let incident = Incident::from_error_like(&fault);
/// assert_eq!(incident.message(), "fault code 7");
/// assert_eq!(incident.stack(), fault.trace);
/// ```
pub trait ErrorLike {
    /// Name of the error; an empty name becomes `"Incident"`.
    fn error_name(&self) -> Cow<'_, str>;

    /// Message of the error: text, a formatter, or a shared message cell.
    fn message_source(&self) -> MessageSource;

    fn error_data(&self) -> Data {
        Data::new()
    }

    fn error_cause(&self) -> Option<Cause> {
        None
    }

    /// Stack to inherit. Without one the converted incident derives its
    /// stack from its own fields and captures no snapshot.
    fn stack_source(&self) -> Option<StackSource> {
        None
    }
}

impl ErrorLike for Incident {
    fn error_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn message_source(&self) -> MessageSource {
        MessageSource(self.message.clone())
    }

    fn error_data(&self) -> Data {
        self.data.clone()
    }

    fn error_cause(&self) -> Option<Cause> {
        self.cause.clone()
    }

    fn stack_source(&self) -> Option<StackSource> {
        Some(StackSource(self.stack.clone()))
    }
}

/// Owned copy of a foreign error and its `source()` chain, kept as text.
///
/// Used as the cause of incidents converted from foreign errors, whose own
/// sources are only reachable by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSnapshot {
    message: String,
    source: Option<Box<ErrorSnapshot>>,
}

impl ErrorSnapshot {
    /// Copies `error` and its sources.
    pub fn capture(error: &(dyn Error + 'static)) -> Self {
        Self {
            message: error.to_string(),
            source: error.source().map(|source| Box::new(Self::capture(source))),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ErrorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ErrorSnapshot {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|source| source as &(dyn Error + 'static))
    }
}

/// Stack rendering of a foreign error: `"Error: {display}"` followed by one
/// `caused by` line per source.
///
/// ```
/// use incident::convert::{foreign_stack, ErrorSnapshot};
///
/// let inner = ErrorSnapshot::capture(&std::fmt::Error);
/// assert_eq!(foreign_stack(&inner), "Error: an error occurred when formatting an argument");
/// ```
pub fn foreign_stack(error: &(dyn Error + 'static)) -> String {
    let mut stack = String::new();
    for (depth, link) in std::iter::successors(Some(error), |&link| link.source()).enumerate() {
        if depth > 0 {
            stack.push_str(CAUSED_BY);
        }
        push_head(&mut stack, FOREIGN_NAME, &link.to_string());
    }
    stack
}

/// Stack of any error: the (lazily derived) stack of an incident, or the
/// foreign rendering of anything else.
pub(crate) fn error_stack<'a>(error: &'a (dyn Error + 'static)) -> IncidentResult<Cow<'a, str>> {
    match as_incident(error) {
        Some(incident) => incident.try_stack().map(Cow::Borrowed),
        None => Ok(Cow::Owned(foreign_stack(error))),
    }
}

impl Incident {
    /// Converts a boxed error into a boxed incident.
    ///
    /// An incident is returned unchanged, in the same allocation. Any other
    /// error becomes an incident named `"Error"` whose message is the error's
    /// `Display` output and whose cause is an [`ErrorSnapshot`] of its
    /// sources. No stack snapshot is captured; the stack is the foreign
    /// rendering of the error.
    pub fn convert(error: BoxError) -> Box<Incident> {
        match error.downcast::<Incident>() {
            Ok(incident) => incident,
            Err(error) => Box::new(Self::from_foreign(&*error)),
        }
    }

    /// Converts any error into an incident.
    ///
    /// ```
    /// use incident::Incident;
    ///
    /// let err = "x".parse::<u8>().unwrap_err();
    /// let incident = Incident::from_error(err);
    /// assert_eq!(incident.name(), "Error");
    /// assert_eq!(incident.stack(), "Error: invalid digit found in string");
    /// ```
    #[inline]
    pub fn from_error<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        *Self::convert(Box::new(error))
    }

    /// Builds an incident from an [`ErrorLike`] value without evaluating its
    /// message or stack.
    pub fn from_error_like<E: ErrorLike + ?Sized>(source: &E) -> Self {
        let name = source.error_name();
        let name = if name.is_empty() { DEFAULT_NAME.to_owned() } else { name.into_owned() };

        let mut builder = Incident::builder()
            .name(name)
            .data(source.error_data())
            .message_slot(source.message_source().0);
        if let Some(cause) = source.error_cause() {
            builder = builder.shared_cause(cause);
        }
        builder = match source.stack_source() {
            Some(stack) => builder.stack(stack),
            None => builder.stackless(),
        };
        builder.build()
    }

    /// Converts any value into an incident.
    ///
    /// Incidents are returned as-is, boxed errors and `std::io::Error` are
    /// converted, anything else yields [`Incident::default`].
    ///
    /// ```
    /// use incident::Incident;
    ///
    /// let incident = Incident::from_any(Box::new(42_u32));
    /// assert_eq!(incident.name(), "Incident");
    /// assert_eq!(incident.message(), "");
    /// ```
    pub fn from_any(value: Box<dyn Any + Send>) -> Self {
        let value = match value.downcast::<Incident>() {
            Ok(incident) => return *incident,
            Err(value) => value,
        };
        let value = match value.downcast::<BoxError>() {
            Ok(error) => return *Self::convert(*error),
            Err(value) => value,
        };
        match value.downcast::<std::io::Error>() {
            Ok(error) => Self::from_error(*error),
            Err(_) => Self::default(),
        }
    }

    fn from_foreign(error: &(dyn Error + 'static)) -> Self {
        let mut builder = Incident::builder().name(FOREIGN_NAME).message(error.to_string()).stackless();
        if let Some(source) = error.source() {
            builder = builder.shared_cause(Arc::new(ErrorSnapshot::capture(source)));
        }
        builder.build()
    }
}
