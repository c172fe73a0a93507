//! Traits connecting incidents to the rest of an application.
//!
//! - [`IncidentKind`]: a named family of incidents, the typed counterpart of a
//!   name string
//! - [`IncidentResultExt`]: wraps the error of a `Result` as the cause of a new
//!   incident
//!
//! # Examples
//!
//! ```
//! use incident::traits::IncidentResultExt;
//!
//! let result = std::fs::read_to_string("/definitely/missing.toml")
//!     .incident("Config", "unable to read configuration");
//!
//! let incident = result.unwrap_err();
//! assert_eq!(incident.name(), "Config");
//! assert!(incident.cause().is_some());
//! ```

pub mod incident_kind;
pub mod result_ext;

pub use incident_kind::IncidentKind;
pub use result_ext::IncidentResultExt;
