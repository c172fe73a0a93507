//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use incident::prelude::*;
//!
//! fn load_config(path: &str) -> Result<String, Incident> {
//!     std::fs::read_to_string(path).incident("Config", "unable to read configuration")
//! }
//!
//! let incident = load_config("/definitely/missing.toml").unwrap_err();
//! assert!(incident.to_string().starts_with("Config: "));
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`incident!`], [`lazy_message!`], [`define_incident!`]
//! - **Types**: [`Incident`], [`IncidentBuilder`], [`Formatter`], [`Data`]
//! - **Traits**: [`IncidentResultExt`], [`IncidentKind`], [`ErrorLike`]

// Macros
pub use crate::{define_incident, incident, lazy_message};

// Core types
pub use crate::error::{IncidentError, IncidentResult};
pub use crate::types::{Data, Formatter, Incident, IncidentBuilder, StackCapture};

// Traits
pub use crate::convert::ErrorLike;
pub use crate::traits::{IncidentKind, IncidentResultExt};

#[cfg(feature = "tracing")]
pub use crate::tracing_ext::IncidentSpanExt;
