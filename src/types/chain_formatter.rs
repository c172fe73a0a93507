//! Causal chain traversal and formatting.
//!
//! The chain of an incident is the incident itself followed by its causes, as
//! long as they are incidents. The first foreign cause is the last link. Each
//! link contributes its own message (or its name when the message is empty),
//! joined by a separator:
//!
//! ```text
//! Unable to connect: Lost connection
//! ```
use core::fmt::{self, Display};
use std::borrow::Cow;
use std::error::Error;

use smallvec::SmallVec;

use crate::error::IncidentResult;
use crate::types::incident::as_incident;
use crate::types::Incident;

/// Inline storage for chain items; most chains are short.
pub type ChainVec<T> = SmallVec<[T; 4]>;

/// One element of a causal chain.
#[derive(Clone, Copy)]
pub enum Link<'a> {
    /// An incident (the head, or an incident cause).
    Incident(&'a Incident),
    /// Any other error.
    Foreign(&'a (dyn Error + 'static)),
}

impl<'a> Link<'a> {
    fn of(error: &'a (dyn Error + 'static)) -> Self {
        match as_incident(error) {
            Some(incident) => Self::Incident(incident),
            None => Self::Foreign(error),
        }
    }

    /// Name of the link; foreign errors have no name and report `"Error"`.
    pub fn name(&self) -> &'a str {
        match self {
            Self::Incident(incident) => incident.name(),
            Self::Foreign(_) => crate::convert::FOREIGN_NAME,
        }
    }

    /// Own message of the link: the message, or the name if the message is
    /// empty. Foreign errors use their `Display` output.
    pub fn own_message(&self) -> IncidentResult<Cow<'a, str>> {
        match self {
            Self::Incident(incident) => {
                let message = incident.try_message()?;
                Ok(Cow::Borrowed(if message.is_empty() { incident.name() } else { message }))
            },
            Self::Foreign(error) => Ok(Cow::Owned(error.to_string())),
        }
    }

    /// The underlying error.
    pub fn as_error(&self) -> &'a (dyn Error + 'static) {
        match self {
            Self::Incident(incident) => *incident as &(dyn Error + 'static),
            Self::Foreign(error) => *error,
        }
    }
}

impl fmt::Debug for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incident(incident) => f.debug_tuple("Incident").field(&incident.name()).finish(),
            Self::Foreign(error) => f.debug_tuple("Foreign").field(&error.to_string()).finish(),
        }
    }
}

impl Display for Link<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.own_message().map_err(|_| fmt::Error)?)
    }
}

/// Iterator over the causal chain of an incident, starting at the incident.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<Link<'a>>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(head: &'a Incident) -> Self {
        Self { next: Some(Link::Incident(head)) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = match current {
            Link::Incident(incident) => incident.cause().map(|cause| Link::of(cause.as_ref())),
            Link::Foreign(_) => None,
        };
        Some(current)
    }
}

/// Renders the own messages of a causal chain, effect first.
///
/// Only [`format_item`](Self::format_item) and
/// [`separator`](Self::separator) usually need overriding; see
/// [`ChainFormatBuilder::render_with`].
pub trait ChainFormatter {
    /// Renders one link.
    fn format_item(&self, item: &dyn Display) -> String {
        item.to_string()
    }

    /// Placed between two links.
    fn separator(&self) -> &str {
        ": "
    }

    fn format_chain<'a>(&self, chain: impl Iterator<Item = &'a dyn Display>) -> String {
        let mut out = String::new();
        for (depth, item) in chain.enumerate() {
            if depth > 0 {
                out.push_str(self.separator());
            }
            out.push_str(&self.format_item(item));
        }
        out
    }
}

/// Configuration-based chain formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFormatConfig {
    pub separator: String,
    pub item_prefix: Option<String>,
    pub root_prefix: Option<String>,
    pub indent: String,
    pub cascade: bool,
}

impl Default for ChainFormatConfig {
    fn default() -> Self {
        Self {
            separator: ": ".into(),
            item_prefix: None,
            root_prefix: None,
            indent: "  ".into(),
            cascade: false,
        }
    }
}

impl ChainFormatConfig {
    /// One link per line, each cause indented one level deeper.
    #[inline]
    pub fn cascaded() -> Self {
        Self { separator: "\n".into(), cascade: true, ..Default::default() }
    }

    /// Links joined by ` <- `, reading from effect to cause.
    #[inline]
    pub fn arrows() -> Self {
        Self { separator: " <- ".into(), ..Default::default() }
    }
}

impl ChainFormatter for ChainFormatConfig {
    fn separator(&self) -> &str {
        &self.separator
    }

    fn format_chain<'a>(&self, chain: impl Iterator<Item = &'a dyn Display>) -> String {
        let items: ChainVec<_> = chain.collect();
        let last = items.len().saturating_sub(1);
        let mut result = String::with_capacity(items.len() * 32);

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                result.push_str(&self.separator);
                if self.cascade {
                    for _ in 0..i {
                        result.push_str(&self.indent);
                    }
                }
            }
            let prefix = if i == last && i > 0 {
                self.root_prefix.as_ref().or(self.item_prefix.as_ref())
            } else {
                self.item_prefix.as_ref()
            };
            if let Some(prefix) = prefix {
                result.push_str(prefix);
            }
            result.push_str(&self.format_item(*item));
        }
        result
    }
}

/// Builder for customizing the rendering of a causal chain.
///
/// Implements [`Display`]; a failing message formatter anywhere in the chain
/// makes formatting fail with [`fmt::Error`]. Use
/// [`try_render`](Self::try_render) to get the underlying error instead.
pub struct ChainFormatBuilder<'a> {
    pub(crate) incident: &'a Incident,
    pub(crate) config: ChainFormatConfig,
}

impl<'a> ChainFormatBuilder<'a> {
    pub fn new(incident: &'a Incident) -> Self {
        Self { incident, config: ChainFormatConfig::default() }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    pub fn with_config(mut self, config: ChainFormatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cascaded(mut self) -> Self {
        self.config = ChainFormatConfig::cascaded();
        self
    }

    pub fn arrows(mut self) -> Self {
        self.config = ChainFormatConfig::arrows();
        self
    }

    /// Renders the chain, surfacing formatter failures.
    pub fn try_render(&self) -> IncidentResult<String> {
        self.render_with(&self.config)
    }

    /// Renders the chain with any [`ChainFormatter`] instead of the config.
    ///
    /// ```
    /// use std::fmt::Display;
    ///
    /// use incident::{ChainFormatter, Incident};
    ///
    /// struct Quoted;
    ///
    /// impl ChainFormatter for Quoted {
    ///     fn format_item(&self, item: &dyn Display) -> String {
    ///         format!("'{}'", item)
    ///     }
    ///
    ///     fn separator(&self) -> &str {
    ///         " / "
    ///     }
    /// }
    ///
    /// let cause = Incident::with_name("ConnectionLost", "Lost connection");
    /// let incident = Incident::builder().cause(cause).message("Unable to connect").build();
    /// assert_eq!(
    ///     incident.fmt_chain().render_with(&Quoted).unwrap(),
    ///     "'Unable to connect' / 'Lost connection'"
    /// );
    /// ```
    pub fn render_with<F: ChainFormatter>(&self, formatter: &F) -> IncidentResult<String> {
        let messages = self
            .incident
            .chain()
            .map(|link| link.own_message())
            .collect::<IncidentResult<ChainVec<_>>>()?;
        Ok(formatter.format_chain(messages.iter().map(|message| message as &dyn Display)))
    }
}

impl Display for ChainFormatBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.try_render().map_err(|_| fmt::Error)?)
    }
}

impl Incident {
    /// Iterates the causal chain, starting with this incident.
    ///
    /// ```
    /// use incident::{Incident, Link};
    ///
    /// let root = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
    /// let incident = Incident::caused_by(root, "Unable to save");
    ///
    /// let names: Vec<&str> = incident.chain().map(|link| link.name()).collect();
    /// assert_eq!(names, ["Incident", "Error"]);
    /// assert!(matches!(incident.chain().last(), Some(Link::Foreign(_))));
    /// ```
    #[inline]
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Last element of the causal chain.
    #[inline]
    pub fn root_cause(&self) -> Link<'_> {
        self.chain().last().unwrap_or(Link::Incident(self))
    }

    /// Own messages of the chain joined by `": "`.
    ///
    /// ```
    /// use incident::Incident;
    ///
    /// let cause = Incident::with_name("ConnectionLost", "Lost connection");
    /// let incident = Incident::builder().cause(cause).message("Unable to connect").build();
    /// assert_eq!(incident.causal_chain().unwrap(), "Unable to connect: Lost connection");
    /// ```
    pub fn causal_chain(&self) -> IncidentResult<String> {
        self.fmt_chain().try_render()
    }

    /// Returns a builder to render the causal chain with a custom layout.
    #[inline]
    pub fn fmt_chain(&self) -> ChainFormatBuilder<'_> {
        ChainFormatBuilder::new(self)
    }
}
