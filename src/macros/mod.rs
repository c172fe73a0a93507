//! Macros for building incidents.
//!
//! - [`macro@crate::incident`]: builds an [`Incident`](crate::Incident) from
//!   positional arguments, panicking on an invalid argument list.
//! - [`macro@crate::lazy_message`]: a [`Formatter`](crate::Formatter) deferring
//!   `format!` until the message is read.
//! - [`macro@crate::define_incident`]: declares a named incident kind.
//!
//! # Examples
//!
//! ```
//! use incident::{define_incident, incident, lazy_message};
//!
//! define_incident!(pub Unreachable);
//!
//! let host = "db-1";
//! let cause = Unreachable::new(lazy_message!("{} did not answer", host));
//! let incident = incident!(cause, "Network", "Unable to connect");
//!
//! assert_eq!(format!("{:#}", incident), "Unable to connect: db-1 did not answer");
//! ```

/// Builds an [`Incident`](crate::Incident) from up to four positional
/// arguments, resolved with the default [`Resolver`](crate::args::Resolver).
///
/// Each argument is converted with
/// [`IncidentArg::from`](crate::args::IncidentArg). Call shapes:
///
/// ```text
/// incident!()
/// incident!(message)
/// incident!(cause, message)
/// incident!(name, message)
/// incident!(data, message)
/// incident!(cause, name, message)
/// incident!(cause, data, message)
/// incident!(name, data, message)
/// incident!(cause, name, data, message)
/// ```
///
/// where `message` is text or a formatter.
///
/// # Panics
///
/// Panics at the call site when given more than four arguments; use
/// [`Incident::from_args`](crate::Incident::from_args) to get the error
/// instead. Arguments out of position are left unconsumed.
///
/// # Examples
///
/// ```
/// use incident::incident;
/// use serde_json::json;
///
/// let incident = incident!("Http", json!({"status": 503}), "upstream unavailable");
/// assert_eq!(incident.to_string(), "Http: upstream unavailable");
/// assert_eq!(incident.data()["status"], 503);
/// ```
#[macro_export]
macro_rules! incident {
    ($($arg:expr),* $(,)?) => {
        $crate::args::__construct(
            $crate::args::Resolver::new(),
            [$($crate::args::IncidentArg::from($arg)),*],
        )
    };
}

/// Creates a [`Formatter`](crate::Formatter) that runs `format!` on first
/// read of the message.
///
/// The `data => ...` form binds the incident data for use in the arguments.
///
/// # Examples
///
/// ```
/// use incident::{lazy_message, Incident};
///
/// let incident = Incident::builder()
///     .entry("port", 50313)
///     .message(lazy_message!(data => "unexpected port {}", data["port"]))
///     .build();
/// assert_eq!(incident.message(), "unexpected port 50313");
///
/// let attempt = 3;
/// let incident = Incident::new(lazy_message!("gave up after {} attempts", attempt));
/// assert_eq!(incident.message(), "gave up after 3 attempts");
/// ```
#[macro_export]
macro_rules! lazy_message {
    ($data:ident => $($arg:tt)*) => {
        $crate::Formatter::new(move |$data: &$crate::Data| format!($($arg)*))
    };
    ($($arg:tt)*) => {
        $crate::Formatter::new(move |_: &$crate::Data| format!($($arg)*))
    };
}

/// Declares a named incident kind.
///
/// The generated type wraps an [`Incident`](crate::Incident) (and derefs to
/// it), implements [`IncidentKind`](crate::traits::IncidentKind) and
/// `std::error::Error`, and builds incidents whose default name is the kind
/// name. A custom name can be given with `Kind = "name"`.
///
/// # Examples
///
/// ```
/// use incident::{define_incident, Incident};
///
/// define_incident!(
///     /// The upstream did not answer in time.
///     pub Timeout
/// );
/// define_incident!(pub(crate) Refused = "ConnectionRefused");
///
/// let timeout = Timeout::new("no answer after 30s");
/// assert_eq!(timeout.name(), "Timeout");
/// assert!(timeout.is::<Timeout>());
///
/// let refused: Incident = Refused::builder().message("port closed").build();
/// assert!(refused.is::<Refused>());
/// assert_eq!(refused.to_string(), "ConnectionRefused: port closed");
/// ```
#[macro_export]
macro_rules! define_incident {
    ($(#[$meta:meta])* $vis:vis $kind:ident = $name:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $kind($crate::Incident);

        impl $crate::traits::IncidentKind for $kind {
            const NAME: &'static str = $name;
        }

        impl $kind {
            /// Creates an incident of this kind with the given message.
            #[inline]
            pub fn new<M: ::core::convert::Into<$crate::Message>>(message: M) -> Self {
                Self(Self::builder().message(message).build())
            }

            /// Starts a builder with the kind name preset.
            #[inline]
            pub fn builder() -> $crate::IncidentBuilder {
                $crate::Incident::builder().for_kind::<Self>()
            }

            /// Resolves positional arguments, defaulting the name to the kind name.
            pub fn from_args<I>(args: I) -> $crate::IncidentResult<Self>
            where
                I: ::core::iter::IntoIterator<Item = $crate::args::IncidentArg>,
            {
                $crate::args::Resolver::for_kind::<Self>().build(args).map(Self)
            }

            /// Unwraps the incident.
            #[inline]
            pub fn into_incident(self) -> $crate::Incident {
                self.0
            }
        }

        impl ::core::ops::Deref for $kind {
            type Target = $crate::Incident;

            #[inline]
            fn deref(&self) -> &$crate::Incident {
                &self.0
            }
        }

        impl ::core::ops::DerefMut for $kind {
            #[inline]
            fn deref_mut(&mut self) -> &mut $crate::Incident {
                &mut self.0
            }
        }

        impl ::core::fmt::Display for $kind {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::error::Error for $kind {
            fn source(&self) -> ::core::option::Option<&(dyn ::std::error::Error + 'static)> {
                ::std::error::Error::source(&self.0)
            }
        }

        impl ::core::convert::From<$kind> for $crate::Incident {
            #[inline]
            fn from(kind: $kind) -> Self {
                kind.0
            }
        }

        impl ::core::convert::From<$kind> for $crate::args::IncidentArg {
            #[inline]
            fn from(kind: $kind) -> Self {
                $crate::args::IncidentArg::from(kind.0)
            }
        }
    };
    ($(#[$meta:meta])* $vis:vis $kind:ident) => {
        $crate::define_incident!($(#[$meta])* $vis $kind = ::core::stringify!($kind));
    };
}
