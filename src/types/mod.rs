//! The incident value and its lazily resolved parts.
//!
//! # Examples
//!
//! ```
//! use incident::Incident;
//!
//! let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
//! let incident = Incident::builder()
//!     .name("Config")
//!     .message("unable to load configuration")
//!     .cause(cause)
//!     .build();
//!
//! println!("{:#}", incident);
//! // Output: unable to load configuration: config.toml
//! ```
use std::error::Error;
use std::sync::Arc;

pub mod chain_formatter;
pub mod incident;
pub mod lazy_message;
pub mod lazy_stack;

pub use chain_formatter::*;
pub use incident::{Incident, IncidentBuilder, DEFAULT_NAME};
pub use lazy_message::{FieldState, Formatter, Message, MessageSource};
pub use lazy_stack::{StackCapture, StackSource, CAUSED_BY, INTERNAL_FRAME_PREFIXES};

/// Structured payload of an incident: a JSON object.
pub type Data = serde_json::Map<String, serde_json::Value>;

/// Shared handle to the error an incident was caused by.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;
