use std::error::Error;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{Incident, DEFAULT_NAME};
use crate::args::IncidentArg;
use crate::error::{IncidentError, IncidentResult};
use crate::traits::IncidentKind;
use crate::types::lazy_message::{Message, MessageSlot};
use crate::types::lazy_stack::{StackCapture, StackSlot, StackSource};
use crate::types::{Cause, Data};

/// Step-by-step construction of an [`Incident`].
///
/// Every field is optional. The call-stack snapshot is taken in
/// [`build`](Self::build) according to the [`StackCapture`] policy.
///
/// # Examples
///
/// ```
/// use incident::{Incident, StackCapture};
/// use serde_json::json;
///
/// let incident = Incident::builder()
///     .name("Http")
///     .entry("status", json!(503))
///     .message("upstream unavailable")
///     .capture(StackCapture::Disabled)
///     .build();
///
/// assert_eq!(incident.stack(), "Http: upstream unavailable");
/// ```
#[must_use]
pub struct IncidentBuilder {
    name: Option<String>,
    data: Data,
    message: MessageSlot,
    cause: Option<Cause>,
    capture: StackCapture,
    stack: Option<StackSlot>,
}

impl Default for IncidentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IncidentBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            name: None,
            data: Data::new(),
            message: MessageSlot::initial(Message::default()),
            cause: None,
            capture: StackCapture::default(),
            stack: None,
        }
    }

    #[inline]
    pub fn name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Uses the name of kind `K`.
    #[inline]
    pub fn for_kind<K: IncidentKind>(self) -> Self {
        self.name(K::NAME)
    }

    #[inline]
    pub fn data(mut self, data: Data) -> Self {
        self.data = data;
        self
    }

    /// Adds a single entry to the data payload.
    #[inline]
    pub fn entry<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Serializes `payload` into the data payload.
    ///
    /// The payload must serialize to a JSON object.
    ///
    /// ```
    /// use incident::Incident;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Port {
    ///     port: u16,
    /// }
    ///
    /// let incident = Incident::builder().try_data(&Port { port: 50313 }).unwrap().build();
    /// assert_eq!(incident.data()["port"], 50313);
    /// ```
    pub fn try_data<T: Serialize + ?Sized>(self, payload: &T) -> IncidentResult<Self> {
        let value = serde_json::to_value(payload)
            .map_err(|_| IncidentError::invalid_argument("data", "object", "unserializable"))?;
        match IncidentArg::from(value) {
            IncidentArg::Data(data) => Ok(self.data(data)),
            other => Err(IncidentError::invalid_argument("data", "object", other.kind())),
        }
    }

    #[inline]
    pub fn message<M: Into<Message>>(mut self, message: M) -> Self {
        self.message = MessageSlot::initial(message.into());
        self
    }

    #[inline]
    pub fn cause<E>(self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.shared_cause(Arc::new(cause))
    }

    /// Sets a cause that is already shared.
    #[inline]
    pub fn shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    #[inline]
    pub fn capture(mut self, capture: StackCapture) -> Self {
        self.capture = capture;
        self
    }

    /// Shorthand for `capture(StackCapture::Disabled)`.
    #[inline]
    pub fn stackless(self) -> Self {
        self.capture(StackCapture::Disabled)
    }

    /// Reuses a stack from another error instead of capturing one.
    #[inline]
    pub fn stack(mut self, stack: StackSource) -> Self {
        self.stack = Some(stack.0);
        self
    }

    pub(crate) fn message_slot(mut self, message: MessageSlot) -> Self {
        self.message = message;
        self
    }

    pub fn build(self) -> Incident {
        let stack = match self.stack {
            Some(stack) => stack,
            None => StackSlot::new(self.capture.snapshot()),
        };
        Incident::from_parts(
            self.name.unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            self.data,
            self.message,
            self.cause,
            stack,
        )
    }
}
