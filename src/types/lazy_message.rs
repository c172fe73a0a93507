//! Deferred message formatting.
//!
//! An incident message is either plain text or a [`Formatter`]: a closure that
//! receives the incident [`Data`] and produces the message only when it is
//! first observed. This keeps expensive formatting (large payloads, nested
//! structures) off the construction path entirely.
//!
//! # Examples
//!
//! ```
//! use incident::{Formatter, Incident};
//! use serde_json::json;
//!
//! let mut data = incident::Data::new();
//! data.insert("port".into(), json!(50313));
//!
//! let incident = Incident::builder()
//!     .name("MysteriousPort")
//!     .data(data)
//!     .message(Formatter::new(|data| format!("unexpected port {}", data["port"])))
//!     .stackless()
//!     .build();
//!
//! // The formatter runs here, once.
//! assert_eq!(incident.message(), "unexpected port 50313");
//! ```
use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::{BoxError, IncidentError, IncidentResult};
use crate::types::Data;

type FormatFn = dyn Fn(&Data) -> Result<String, BoxError> + Send + Sync;

/// A deferred message: a function from the incident data to the message.
///
/// Cloning a formatter is cheap; clones share the same closure.
#[derive(Clone)]
pub struct Formatter {
    inner: Arc<FormatFn>,
}

impl Formatter {
    /// Creates a formatter from an infallible closure.
    ///
    /// # Examples
    ///
    /// ```
    /// use incident::Formatter;
    ///
    /// let formatter = Formatter::new(|data| format!("{} entries", data.len()));
    /// assert_eq!(formatter.format(&incident::Data::new()).unwrap(), "0 entries");
    /// ```
    #[inline]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Data) -> String + Send + Sync + 'static,
    {
        Self { inner: Arc::new(move |data: &Data| -> Result<String, BoxError> { Ok(f(data)) }) }
    }

    /// Creates a formatter from a closure that may fail.
    ///
    /// A failure surfaces as [`IncidentError::FormatterFailure`] from
    /// [`Incident::try_message`](crate::Incident::try_message) and is not
    /// memoized: the next read calls the closure again.
    #[inline]
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(&Data) -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            inner: Arc::new(move |data: &Data| -> Result<String, BoxError> { f(data).map_err(Into::into) }),
        }
    }

    /// Formatter rendering the data payload as compact JSON.
    ///
    /// This is the opt-in replacement for an automatic "message from data"
    /// default.
    ///
    /// ```
    /// use incident::{Formatter, Incident};
    /// use serde_json::json;
    ///
    /// let incident = Incident::builder()
    ///     .entry("port", json!(50313))
    ///     .message(Formatter::data_json())
    ///     .stackless()
    ///     .build();
    /// assert_eq!(incident.message(), r#"{"port":50313}"#);
    /// ```
    pub fn data_json() -> Self {
        Self::fallible(|data: &Data| serde_json::to_string(data))
    }

    /// Runs the formatter against `data`.
    #[inline]
    pub fn format(&self, data: &Data) -> Result<String, BoxError> {
        (self.inner)(data)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// Message input: plain text or a deferred [`Formatter`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Authoritative text.
    Text(String),
    /// Text produced from the incident data on first read.
    Lazy(Formatter),
}

impl Default for Message {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Message {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Message {
    #[inline]
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Cow<'static, str>> for Message {
    #[inline]
    fn from(text: Cow<'static, str>) -> Self {
        Self::Text(text.into_owned())
    }
}

impl From<Formatter> for Message {
    #[inline]
    fn from(formatter: Formatter) -> Self {
        Self::Lazy(formatter)
    }
}

/// Message handed over by an [`ErrorLike`](crate::ErrorLike) value during
/// conversion.
///
/// Plain text or a formatter, or the message cell of another incident shared
/// as-is so that its formatter still runs at most once.
#[derive(Clone)]
pub struct MessageSource(pub(crate) MessageSlot);

impl From<Message> for MessageSource {
    #[inline]
    fn from(message: Message) -> Self {
        Self(MessageSlot::initial(message))
    }
}

impl From<&str> for MessageSource {
    #[inline]
    fn from(text: &str) -> Self {
        Message::from(text).into()
    }
}

impl From<String> for MessageSource {
    #[inline]
    fn from(text: String) -> Self {
        Message::from(text).into()
    }
}

impl From<Formatter> for MessageSource {
    #[inline]
    fn from(formatter: Formatter) -> Self {
        Message::from(formatter).into()
    }
}

impl fmt::Debug for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageSource").field(&self.0).finish()
    }
}

/// Observable state of a lazily computed field (`message` or `stack`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// A formatter or stack snapshot is pending.
    Unresolved,
    /// The value is cached (or was plain text from the start).
    Resolved,
    /// The value was assigned explicitly after construction.
    Overridden,
}

/// Resolve-once cell around a formatter.
///
/// Shared between an incident and its conversions so a formatter runs at most
/// once per successful resolution, whichever copy is read first.
pub(crate) struct LazyMessage {
    formatter: Formatter,
    resolved: OnceCell<String>,
}

impl LazyMessage {
    fn new(formatter: Formatter) -> Self {
        Self { formatter, resolved: OnceCell::new() }
    }

    fn resolve(&self, name: &str, data: &Data) -> IncidentResult<&str> {
        self.resolved
            .get_or_try_init(|| {
                self.formatter.format(data).map_err(|source| IncidentError::FormatterFailure {
                    name: name.to_owned(),
                    source,
                })
            })
            .map(String::as_str)
    }
}

/// Message storage of an incident.
#[derive(Clone)]
pub(crate) enum MessageSlot {
    Text(String),
    Lazy(Arc<LazyMessage>),
    Overridden(String),
}

impl MessageSlot {
    /// Slot for a message supplied at construction.
    pub(crate) fn initial(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Text(text),
            Message::Lazy(formatter) => Self::Lazy(Arc::new(LazyMessage::new(formatter))),
        }
    }

    /// Slot for a message assigned after construction.
    pub(crate) fn assigned(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Overridden(text),
            lazy @ Message::Lazy(_) => Self::initial(lazy),
        }
    }

    /// Gives this slot its own formatter cell when the current one is still
    /// unresolved and shared with a copy of the incident.
    ///
    /// Called before the data changes, so each copy formats its own data.
    pub(crate) fn detach(&mut self) {
        if let Self::Lazy(cell) = self {
            if cell.resolved.get().is_none() && Arc::strong_count(cell) > 1 {
                let formatter = cell.formatter.clone();
                *self = Self::Lazy(Arc::new(LazyMessage::new(formatter)));
            }
        }
    }

    pub(crate) fn state(&self) -> FieldState {
        match self {
            Self::Text(_) => FieldState::Resolved,
            Self::Lazy(cell) if cell.resolved.get().is_some() => FieldState::Resolved,
            Self::Lazy(_) => FieldState::Unresolved,
            Self::Overridden(_) => FieldState::Overridden,
        }
    }

    /// The message if it is available without running a formatter.
    pub(crate) fn peek(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Overridden(text) => Some(text.as_str()),
            Self::Lazy(cell) => cell.resolved.get().map(String::as_str),
        }
    }

    pub(crate) fn resolve<'a>(&'a self, name: &str, data: &Data) -> IncidentResult<&'a str> {
        match self {
            Self::Text(text) | Self::Overridden(text) => Ok(text.as_str()),
            Self::Lazy(cell) => cell.resolve(name, data),
        }
    }
}

impl fmt::Debug for MessageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(text) => fmt::Debug::fmt(text, f),
            None => f.write_str("<unresolved>"),
        }
    }
}
