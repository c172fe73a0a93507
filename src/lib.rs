//! Structured errors with lazy messages, lazy stacks and causal chains.
//!
//! An [`Incident`] carries a `name` for dispatch, a JSON `data` payload, a
//! `message` that may be computed from the data on first read, an optional
//! `cause`, and a `stack` derived on first read from a call-stack snapshot,
//! the head line and the stack of the cause.
//!
//! Each submodule re-exports its public surface from here, so consumers can
//! simply depend on `incident::*` or pick focused pieces as needed.
//!
//! # Examples
//!
//! ## Named incident with a cause
//!
//! ```
//! use incident::Incident;
//!
//! let cause = Incident::builder().name("ConnectionLost").message("Lost connection").stackless().build();
//! let incident = Incident::builder()
//!     .cause(cause)
//!     .name("Network")
//!     .message("Unable to connect")
//!     .stackless()
//!     .build();
//!
//! assert_eq!(incident.to_string(), "Network: Unable to connect");
//! assert_eq!(format!("{:#}", incident), "Unable to connect: Lost connection");
//! assert_eq!(
//!     incident.stack(),
//!     "Network: Unable to connect\n  caused by ConnectionLost: Lost connection"
//! );
//! ```
//!
//! ## Lazy message
//!
//! ```
//! use incident::{lazy_message, Incident};
//! use serde_json::json;
//!
//! let incident = Incident::builder()
//!     .name("MysteriousPort")
//!     .entry("port", json!(50313))
//!     .message(lazy_message!(data => "unexpected port {}", data["port"]))
//!     .build();
//!
//! // Nothing has been formatted yet.
//! assert_eq!(incident.message_state(), incident::FieldState::Unresolved);
//! assert_eq!(incident.message(), "unexpected port 50313");
//! ```
//!
//! ## Positional arguments
//!
//! ```
//! use incident::incident;
//!
//! let incident = incident!("Timeout", "no answer after 30s");
//! assert_eq!(incident.name(), "Timeout");
//! assert_eq!(incident.message(), "no answer after 30s");
//! ```
//!
//! ## Conversion
//!
//! ```
//! use incident::Incident;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
//! let incident = Incident::from(io);
//! assert_eq!(incident.to_string(), "Error: config.toml");
//! ```

/// Positional argument protocol and resolver
pub mod args;
/// Conversion of foreign errors into incidents
pub mod convert;
/// Errors of the incident protocol itself
pub mod error;
/// Incident construction macros
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Incident kinds and `Result` extensions
pub mod traits;
/// The incident value and its lazy parts
pub mod types;

/// Tracing integration (requires `tracing` feature)
#[cfg(feature = "tracing")]
pub mod tracing_ext;

pub use args::IncidentArg;
pub use convert::{ErrorLike, ErrorSnapshot};
pub use error::{BoxError, IncidentError, IncidentResult};
pub use traits::*;
pub use types::{
    Cause, Chain, ChainFormatConfig, ChainFormatter, Data, FieldState, Formatter, Incident,
    IncidentBuilder, Link, Message, MessageSource, StackCapture, StackSource, DEFAULT_NAME,
    INTERNAL_FRAME_PREFIXES,
};

#[cfg(feature = "tracing")]
pub use tracing_ext::IncidentSpanExt;
