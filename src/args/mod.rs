//! Positional argument protocol for building incidents.
//!
//! An incident can be built from a short list of dynamically typed arguments
//! (`cause`, `name`, `data`, `message`), any of which may be omitted. The
//! [`Resolver`] maps such a list onto the four fields with a strict,
//! order-sensitive, single left-to-right scan:
//!
//! 1. the last argument is the message when it is text or a formatter;
//! 2. an error in front is the cause;
//! 3. then a string is the name;
//! 4. then an object is the data.
//!
//! An argument that does not fit its position is left unconsumed, and nothing
//! after it is reinterpreted: the scan is a single pass, not a search.
//!
//! # Examples
//!
//! ```
//! use incident::args::{self, IncidentArg};
//! use incident::Incident;
//! use serde_json::json;
//!
//! let cause = Incident::with_name("ConnectionLost", "Lost connection");
//! let incident = Incident::from_args([
//!     IncidentArg::from(cause),
//!     IncidentArg::from("Network"),
//!     IncidentArg::from(json!({"host": "db-1"})),
//!     args::lazy(|data| format!("Unable to connect to {}", data["host"])),
//! ])
//! .unwrap();
//!
//! assert_eq!(incident.name(), "Network");
//! assert_eq!(incident.message(), r#"Unable to connect to "db-1""#);
//! ```
use std::borrow::Cow;
use std::error::Error;
use std::io;
use std::sync::Arc;

use serde_json::Value;
use smallvec::SmallVec;

use crate::error::{BoxError, IncidentError, IncidentResult};
use crate::traits::IncidentKind;
use crate::types::{Cause, Data, Formatter, Incident, Message, StackCapture, DEFAULT_NAME};

/// Inline storage for an argument list.
pub type ArgVec = SmallVec<[IncidentArg; 4]>;

/// A dynamically typed constructor argument.
#[derive(Debug, Clone)]
pub enum IncidentArg {
    /// Any error value.
    Cause(Cause),
    /// A string: a name or a message, depending on its position.
    Text(String),
    /// A structured payload.
    Data(Data),
    /// A deferred message.
    Formatter(Formatter),
    /// Any other JSON value; never accepted by the resolver.
    Other(Value),
}

impl IncidentArg {
    /// Short description of the argument kind, used in error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cause(_) => "error",
            Self::Text(_) => "string",
            Self::Data(_) => "object",
            Self::Formatter(_) => "formatter",
            Self::Other(Value::Null) => "null",
            Self::Other(Value::Bool(_)) => "boolean",
            Self::Other(Value::Number(_)) => "number",
            Self::Other(Value::Array(_)) => "array",
            Self::Other(Value::String(_)) => "string",
            Self::Other(Value::Object(_)) => "object",
        }
    }

    fn into_cause(self) -> Option<Cause> {
        match self {
            Self::Cause(cause) => Some(cause),
            _ => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn into_data(self) -> Option<Data> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    fn into_message(self) -> Option<Message> {
        match self {
            Self::Text(text) => Some(Message::Text(text)),
            Self::Formatter(formatter) => Some(Message::Lazy(formatter)),
            _ => None,
        }
    }
}

impl From<&str> for IncidentArg {
    #[inline]
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for IncidentArg {
    #[inline]
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Cow<'static, str>> for IncidentArg {
    #[inline]
    fn from(text: Cow<'static, str>) -> Self {
        Self::Text(text.into_owned())
    }
}

impl From<Data> for IncidentArg {
    #[inline]
    fn from(data: Data) -> Self {
        Self::Data(data)
    }
}

impl From<Value> for IncidentArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(data) => Self::Data(data),
            Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }
}

impl From<Formatter> for IncidentArg {
    #[inline]
    fn from(formatter: Formatter) -> Self {
        Self::Formatter(formatter)
    }
}

impl From<Message> for IncidentArg {
    #[inline]
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Text(text),
            Message::Lazy(formatter) => Self::Formatter(formatter),
        }
    }
}

impl From<Incident> for IncidentArg {
    #[inline]
    fn from(incident: Incident) -> Self {
        Self::Cause(Arc::new(incident))
    }
}

impl From<Cause> for IncidentArg {
    #[inline]
    fn from(cause: Cause) -> Self {
        Self::Cause(cause)
    }
}

impl From<BoxError> for IncidentArg {
    #[inline]
    fn from(error: BoxError) -> Self {
        Self::Cause(Arc::from(error))
    }
}

impl From<io::Error> for IncidentArg {
    #[inline]
    fn from(error: io::Error) -> Self {
        Self::Cause(Arc::new(error))
    }
}

/// Wraps any error as a cause argument.
#[inline]
pub fn cause<E: Error + Send + Sync + 'static>(error: E) -> IncidentArg {
    IncidentArg::Cause(Arc::new(error))
}

/// Wraps a closure as a deferred message argument.
#[inline]
pub fn lazy<F>(f: F) -> IncidentArg
where
    F: Fn(&Data) -> String + Send + Sync + 'static,
{
    IncidentArg::Formatter(Formatter::new(f))
}

/// Wraps a payload as a data argument.
#[inline]
pub fn data(data: Data) -> IncidentArg {
    IncidentArg::Data(data)
}

/// Fields extracted from an argument list, before defaults are applied.
#[derive(Debug, Default)]
pub struct ResolvedArgs {
    pub cause: Option<Cause>,
    pub name: Option<String>,
    pub data: Option<Data>,
    pub message: Message,
}

/// Maps positional arguments onto incident fields.
#[derive(Debug, Clone)]
pub struct Resolver {
    default_name: Cow<'static, str>,
    require_name: bool,
    capture: StackCapture,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver {
    /// Largest accepted argument list.
    pub const MAX_ARGS: usize = 4;

    /// Resolver naming unnamed incidents `"Incident"`.
    #[inline]
    pub fn new() -> Self {
        Self {
            default_name: Cow::Borrowed(DEFAULT_NAME),
            require_name: false,
            capture: StackCapture::default(),
        }
    }

    /// Resolver rejecting argument lists without a name.
    #[inline]
    pub fn strict() -> Self {
        Self { require_name: true, ..Self::new() }
    }

    /// Resolver naming unnamed incidents after kind `K`.
    #[inline]
    pub fn for_kind<K: IncidentKind>() -> Self {
        Self::new().default_name(K::NAME)
    }

    #[inline]
    pub fn default_name<N: Into<Cow<'static, str>>>(mut self, name: N) -> Self {
        self.default_name = name.into();
        self
    }

    /// Stack capture policy of the incidents built by [`build`](Self::build).
    #[inline]
    pub fn capture(mut self, capture: StackCapture) -> Self {
        self.capture = capture;
        self
    }

    /// Runs the scan without building an incident.
    ///
    /// ```
    /// use incident::args::{IncidentArg, Resolver};
    ///
    /// let resolved = Resolver::new()
    ///     .resolve([IncidentArg::from("Timeout"), IncidentArg::from("no answer")])
    ///     .unwrap();
    /// assert_eq!(resolved.name.as_deref(), Some("Timeout"));
    ///
    /// // A name after the data is left unconsumed.
    /// let resolved = Resolver::new()
    ///     .resolve([
    ///         IncidentArg::from(serde_json::json!({})),
    ///         IncidentArg::from("Timeout"),
    ///         IncidentArg::from("no answer"),
    ///     ])
    ///     .unwrap();
    /// assert_eq!(resolved.name, None);
    /// assert!(resolved.data.is_some());
    /// ```
    pub fn resolve<I>(&self, args: I) -> IncidentResult<ResolvedArgs>
    where
        I: IntoIterator<Item = IncidentArg>,
    {
        let mut args: ArgVec = args.into_iter().collect();
        if args.len() > Self::MAX_ARGS {
            return Err(IncidentError::invalid_arguments(format!(
                "expected at most {} arguments, found {}",
                Self::MAX_ARGS,
                args.len()
            )));
        }

        let message = match args.last() {
            Some(IncidentArg::Text(_) | IncidentArg::Formatter(_)) => {
                args.pop().and_then(IncidentArg::into_message).unwrap_or_default()
            },
            _ => Message::default(),
        };

        // Arguments left in `rest` after the data step are dropped.
        let mut rest = args.into_iter().peekable();
        let cause = rest
            .next_if(|arg| matches!(arg, IncidentArg::Cause(_)))
            .and_then(IncidentArg::into_cause);
        let name = rest
            .next_if(|arg| matches!(arg, IncidentArg::Text(_)))
            .and_then(IncidentArg::into_text);
        let data = rest
            .next_if(|arg| matches!(arg, IncidentArg::Data(_)))
            .and_then(IncidentArg::into_data);

        if self.require_name && name.is_none() {
            return Err(IncidentError::invalid_arguments("a name argument is required"));
        }

        Ok(ResolvedArgs { cause, name, data, message })
    }

    /// Resolves `args` and builds the incident, applying the defaults.
    pub fn build<I>(&self, args: I) -> IncidentResult<Incident>
    where
        I: IntoIterator<Item = IncidentArg>,
    {
        let ResolvedArgs { cause, name, data, message } = self.resolve(args)?;
        let mut builder = Incident::builder()
            .name(name.unwrap_or_else(|| self.default_name.clone().into_owned()))
            .data(data.unwrap_or_default())
            .message(message)
            .capture(self.capture);
        if let Some(cause) = cause {
            builder = builder.shared_cause(cause);
        }
        Ok(builder.build())
    }
}

impl Incident {
    /// Builds an incident from positional arguments with the default
    /// [`Resolver`].
    #[inline]
    pub fn from_args<I>(args: I) -> IncidentResult<Self>
    where
        I: IntoIterator<Item = IncidentArg>,
    {
        Resolver::new().build(args)
    }
}

#[doc(hidden)]
#[track_caller]
pub fn __construct<const N: usize>(resolver: Resolver, args: [IncidentArg; N]) -> Incident {
    match resolver.build(args) {
        Ok(incident) => incident,
        Err(err) => panic!("{}", err),
    }
}
