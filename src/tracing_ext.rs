//! Tracing integration.
//!
//! Records incidents as `tracing` events and attaches the name of the active
//! span to their data.
//!
//! # Feature Flag
//!
//! Requires the `tracing` feature:
//!
//! ```toml
//! [dependencies]
//! incident = { version = "0.1", features = ["tracing"] }
//! ```

use tracing::Span;

use crate::types::Incident;

/// Data key under which the span name is stored.
pub const SPAN_KEY: &str = "span";

fn span_name(span: &Span) -> &'static str {
    span.metadata().map(|m| m.name()).unwrap_or("unknown")
}

impl Incident {
    /// Emits an `ERROR` event describing this incident.
    ///
    /// The event carries the fields `incident.name`, `incident.message` and
    /// `incident.chain`. Resolving the message runs a pending formatter; if it
    /// fails, the event carries the failure instead.
    pub fn record(&self) {
        match (self.try_message(), self.causal_chain()) {
            (Ok(message), Ok(chain)) => tracing::error!(
                incident.name = %self.name(),
                incident.message = %message,
                incident.chain = %chain,
                "incident"
            ),
            (Err(err), _) | (_, Err(err)) => tracing::error!(
                incident.name = %self.name(),
                error = %err,
                "incident with unresolvable message"
            ),
        }
    }

    /// Stores the name of the current span under `data["span"]`.
    ///
    /// Without an active span the stored name is `"unknown"`.
    #[inline]
    pub fn in_current_span(self) -> Self {
        self.in_span(&Span::current())
    }

    /// Stores the name of `span` under `data["span"]`.
    #[inline]
    pub fn in_span(self, span: &Span) -> Self {
        self.with_entry(SPAN_KEY, span_name(span))
    }
}

/// Extension trait attaching span names to incident errors.
pub trait IncidentSpanExt<T> {
    /// Stores the current span name in the incident data.
    fn with_current_span(self) -> Result<T, Incident>;

    /// Stores the name of `span` in the incident data.
    fn with_span(self, span: &Span) -> Result<T, Incident>;
}

impl<T> IncidentSpanExt<T> for Result<T, Incident> {
    fn with_current_span(self) -> Result<T, Incident> {
        self.with_span(&Span::current())
    }

    fn with_span(self, span: &Span) -> Result<T, Incident> {
        self.map_err(|incident| incident.in_span(span))
    }
}

/// Converts `error` into an incident tagged with the current span.
pub fn instrument_error<E>(error: E) -> Incident
where
    E: std::error::Error + Send + Sync + 'static,
{
    Incident::from_error(error).in_current_span()
}
