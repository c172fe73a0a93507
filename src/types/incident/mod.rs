//! The [`Incident`] value.
//!
//! An incident is a structured error made of four logical fields:
//!
//! - `name`: a discriminant for `match`-style dispatch (defaults to `"Incident"`)
//! - `data`: a structured JSON payload (defaults to an empty map)
//! - `message`: plain text, or a [`Formatter`](crate::Formatter) resolved on
//!   first read
//! - `cause`: the error this incident was raised in response to
//!
//! plus a `stack`, derived lazily from a call-stack snapshot, the head line and
//! the stack of the cause.
//!
//! # Examples
//!
//! ```
//! use incident::Incident;
//!
//! let cause = Incident::builder()
//!     .name("ConnectionLost")
//!     .message("Lost connection")
//!     .stackless()
//!     .build();
//! let incident = Incident::builder()
//!     .cause(cause)
//!     .name("Network")
//!     .message("Unable to connect")
//!     .stackless()
//!     .build();
//!
//! assert_eq!(incident.to_string(), "Network: Unable to connect");
//! assert_eq!(
//!     incident.stack(),
//!     "Network: Unable to connect\n  caused by ConnectionLost: Lost connection"
//! );
//! ```
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::args::IncidentArg;
use crate::error::{IncidentError, IncidentResult};
use crate::traits::IncidentKind;
use crate::types::lazy_message::{FieldState, Message, MessageSlot};
use crate::types::lazy_stack::StackSlot;
use crate::types::{Cause, Data};

mod builder;
mod traits;

pub use builder::IncidentBuilder;

/// Name given to incidents built without an explicit name.
pub const DEFAULT_NAME: &str = "Incident";

/// Structured error value with a lazy message, a lazy stack and a cause.
///
/// `Incident` implements [`std::error::Error`]; its [`source`] is the cause.
/// `Display` renders the head line (`"{name}: {message}"`), `{:#}` renders the
/// whole causal chain.
///
/// Cloning an incident shares its unresolved message and stack, so neither is
/// evaluated twice. A copy whose data is changed before the first read runs
/// the formatter on its own data, and a copy whose name, data, message or
/// cause is changed derives its own stack from the shared snapshot.
///
/// [`source`]: std::error::Error::source
#[must_use]
#[derive(Clone)]
pub struct Incident {
    pub(crate) name: String,
    pub(crate) data: Data,
    pub(crate) message: MessageSlot,
    pub(crate) cause: Option<Cause>,
    pub(crate) stack: StackSlot,
}

impl Incident {
    pub(crate) fn from_parts(
        name: String,
        data: Data,
        message: MessageSlot,
        cause: Option<Cause>,
        stack: StackSlot,
    ) -> Self {
        Self { name, data, message, cause, stack }
    }

    /// Creates an incident with the default name and the given message.
    ///
    /// ```
    /// use incident::Incident;
    ///
    /// let incident = Incident::new("Unable to fire the reactor!");
    /// assert_eq!(incident.name(), "Incident");
    /// assert!(incident.data().is_empty());
    /// assert_eq!(incident.message(), "Unable to fire the reactor!");
    /// ```
    #[inline]
    pub fn new<M: Into<Message>>(message: M) -> Self {
        Self::builder().message(message).build()
    }

    /// Creates an incident with a name and an empty message.
    #[inline]
    pub fn named<N: Into<String>>(name: N) -> Self {
        Self::builder().name(name).build()
    }

    /// Creates an incident with a name and a message.
    #[inline]
    pub fn with_name<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<Message>,
    {
        Self::builder().name(name).message(message).build()
    }

    /// Creates an incident caused by `cause`, with the default name.
    #[inline]
    pub fn caused_by<E, M>(cause: E, message: M) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
        M: Into<Message>,
    {
        Self::builder().cause(cause).message(message).build()
    }

    /// Starts a builder for any other combination of fields.
    #[inline]
    pub fn builder() -> IncidentBuilder {
        IncidentBuilder::new()
    }

    /// Incident with default fields and no stack snapshot.
    pub(crate) fn detached() -> Self {
        Self::from_parts(
            DEFAULT_NAME.to_owned(),
            Data::new(),
            MessageSlot::initial(Message::default()),
            None,
            StackSlot::detached(),
        )
    }

    /// Returns the discriminant name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the name.
    #[inline]
    pub fn set_name<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.stack.detach();
        self.name = name.into();
        self
    }

    /// Returns `true` when the name is the name of kind `K`.
    ///
    /// ```
    /// incident::define_incident!(Timeout);
    ///
    /// let incident = Timeout::new("no answer after 30s");
    /// assert!(incident.is::<Timeout>());
    /// ```
    #[inline]
    pub fn is<K: IncidentKind>(&self) -> bool {
        self.name == K::NAME
    }

    /// Returns the data payload.
    #[inline]
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// Returns the data payload for in-place edits.
    #[inline]
    pub fn data_mut(&mut self) -> &mut Data {
        self.message.detach();
        self.stack.detach();
        &mut self.data
    }

    /// Replaces the data payload.
    #[inline]
    pub fn set_data(&mut self, data: Data) -> &mut Self {
        self.message.detach();
        self.stack.detach();
        self.data = data;
        self
    }

    /// Replaces the data payload with a JSON value, which must be an object.
    ///
    /// ```
    /// use incident::Incident;
    /// use serde_json::json;
    ///
    /// let mut incident = Incident::named("Http");
    /// assert!(incident.try_set_data(json!({"status": 503})).is_ok());
    /// assert!(incident.try_set_data(json!([1, 2])).is_err());
    /// assert_eq!(incident.data()["status"], 503);
    /// ```
    pub fn try_set_data(&mut self, value: Value) -> IncidentResult<&mut Self> {
        match IncidentArg::from(value) {
            IncidentArg::Data(data) => Ok(self.set_data(data)),
            other => Err(IncidentError::invalid_argument("data", "object", other.kind())),
        }
    }

    /// Adds one entry to the data payload, returning the incident.
    #[inline]
    pub fn with_entry<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.data_mut().insert(key.into(), value.into());
        self
    }

    /// Deserializes the data payload into a typed structure.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&Value::Object(self.data.clone()))
    }

    /// Returns the message, resolving a pending formatter on first call.
    ///
    /// # Panics
    ///
    /// Panics when the formatter fails. Use [`try_message`](Self::try_message)
    /// to handle formatter failures; in both cases the failure is not cached.
    #[track_caller]
    pub fn message(&self) -> &str {
        match self.try_message() {
            Ok(message) => message,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns the message, resolving a pending formatter on first call.
    #[inline]
    pub fn try_message(&self) -> IncidentResult<&str> {
        self.message.resolve(&self.name, &self.data)
    }

    /// Replaces the message.
    ///
    /// Text takes effect immediately and overrides any formatter; a new
    /// formatter is resolved lazily again on the next read.
    #[inline]
    pub fn set_message<M: Into<Message>>(&mut self, message: M) -> &mut Self {
        self.stack.detach();
        self.message = MessageSlot::assigned(message.into());
        self
    }

    /// Resolution state of the message.
    #[inline]
    pub fn message_state(&self) -> FieldState {
        self.message.state()
    }

    /// Returns the stack, deriving it on first call.
    ///
    /// # Panics
    ///
    /// Panics when the message formatter (of this incident or of an incident
    /// cause) fails. Use [`try_stack`](Self::try_stack) to handle it.
    #[track_caller]
    pub fn stack(&self) -> &str {
        match self.try_stack() {
            Ok(stack) => stack,
            Err(err) => panic!("{}", err),
        }
    }

    /// Returns the stack, deriving it on first call.
    #[inline]
    pub fn try_stack(&self) -> IncidentResult<&str> {
        self.stack.resolve(self)
    }

    /// Overrides the stack; the snapshot, if any, is dropped.
    #[inline]
    pub fn set_stack<S: Into<String>>(&mut self, stack: S) -> &mut Self {
        self.stack = StackSlot::Overridden(stack.into());
        self
    }

    /// Resolution state of the stack.
    #[inline]
    pub fn stack_state(&self) -> FieldState {
        self.stack.state()
    }

    /// Returns `true` if a call-stack snapshot was captured at construction
    /// and is still attached.
    #[inline]
    pub fn has_snapshot(&self) -> bool {
        self.stack.has_snapshot()
    }

    /// Returns the cause.
    #[inline]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Replaces or clears the cause.
    #[inline]
    pub fn set_cause<C: Into<Option<Cause>>>(&mut self, cause: C) -> &mut Self {
        self.stack.detach();
        self.cause = cause.into();
        self
    }

    /// Replaces the cause from a dynamic argument.
    ///
    /// Only error-like arguments are accepted; anything else fails with
    /// [`IncidentError::InvalidArgument`] and leaves the cause unchanged.
    ///
    /// ```
    /// use incident::{Incident, IncidentArg};
    ///
    /// let mut incident = Incident::named("Wrapper");
    /// assert!(incident.try_set_cause(IncidentArg::from("not an error")).is_err());
    /// assert!(incident.cause().is_none());
    ///
    /// incident.try_set_cause(Incident::named("Root")).unwrap();
    /// assert!(incident.cause().is_some());
    /// ```
    pub fn try_set_cause<A: Into<IncidentArg>>(&mut self, cause: A) -> IncidentResult<&mut Self> {
        match cause.into() {
            IncidentArg::Cause(cause) => Ok(self.set_cause(cause)),
            other => Err(IncidentError::invalid_argument("cause", "error", other.kind())),
        }
    }
}

/// Views `error` as an incident, looking through `Box` and `Arc` wrappers.
pub(crate) fn as_incident<'a>(error: &'a (dyn std::error::Error + 'static)) -> Option<&'a Incident> {
    error
        .downcast_ref::<Incident>()
        .or_else(|| error.downcast_ref::<Box<Incident>>().map(|boxed| &**boxed))
        .or_else(|| error.downcast_ref::<std::sync::Arc<Incident>>().map(|shared| &**shared))
}
