//! Extension trait for raising incidents from `Result` errors.
//!
//! # Examples
//!
//! ```
//! use incident::traits::IncidentResultExt;
//! use incident::Incident;
//!
//! fn parse_port(raw: &str) -> Result<u16, Incident> {
//!     raw.parse::<u16>().incident_with(|| {
//!         Incident::builder().name("InvalidPort").entry("raw", raw)
//!     })
//! }
//!
//! let incident = parse_port("http").unwrap_err();
//! assert_eq!(incident.name(), "InvalidPort");
//! assert_eq!(incident.data()["raw"], "http");
//! ```
use std::error::Error;

use crate::types::{Incident, IncidentBuilder, Message};

/// Wraps the error of a `Result` as the cause of a new [`Incident`].
///
/// The incident is only built when the `Result` is an `Err`.
pub trait IncidentResultExt<T> {
    /// Replaces the error by an incident named `name` whose cause is the error.
    ///
    /// ```
    /// use incident::traits::IncidentResultExt;
    ///
    /// let result: Result<(), std::io::Error> =
    ///     Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
    /// let incident = result.incident("Storage", "unable to save").unwrap_err();
    /// assert_eq!(format!("{:#}", incident), "unable to save: disk full");
    /// ```
    fn incident<N, M>(self, name: N, message: M) -> Result<T, Incident>
    where
        N: Into<String>,
        M: Into<Message>;

    /// Like [`incident`](Self::incident), with the remaining fields supplied by
    /// a builder. The error is always set as the cause.
    fn incident_with<F>(self, f: F) -> Result<T, Incident>
    where
        F: FnOnce() -> IncidentBuilder;
}

impl<T, E> IncidentResultExt<T> for Result<T, E>
where
    E: Error + Send + Sync + 'static,
{
    #[inline]
    fn incident<N, M>(self, name: N, message: M) -> Result<T, Incident>
    where
        N: Into<String>,
        M: Into<Message>,
    {
        self.map_err(|e| Incident::builder().cause(e).name(name).message(message).build())
    }

    #[inline]
    fn incident_with<F>(self, f: F) -> Result<T, Incident>
    where
        F: FnOnce() -> IncidentBuilder,
    {
        self.map_err(|e| f().cause(e).build())
    }
}
