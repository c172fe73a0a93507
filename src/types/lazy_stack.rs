//! Deferred stack derivation.
//!
//! An incident captures a [`Backtrace`] snapshot when it is built (according to
//! its [`StackCapture`] policy) but only turns it into a string when
//! [`Incident::stack`](crate::Incident::stack) is first read. The derived stack
//! is:
//!
//! ```text
//! {name}: {message}
//! {frames of the snapshot, without the incident's own capture frames}
//!   caused by {stack of the cause}
//! ```
use core::fmt::{self, Write};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::convert::error_stack;
use crate::error::IncidentResult;
use crate::types::lazy_message::FieldState;
use crate::types::Incident;

/// Symbol prefixes of the frames removed from the top of a fresh snapshot.
///
/// The leading frames of a captured backtrace belong to `std::backtrace` and to
/// this crate's construction path; they are skipped until the first frame that
/// matches none of these prefixes.
pub const INTERNAL_FRAME_PREFIXES: &[&str] =
    &["std::backtrace", "<std::backtrace", "incident::", "<incident::"];

/// Separator placed between a stack and the stack of its cause.
pub const CAUSED_BY: &str = "\n  caused by ";

/// Policy for capturing a call-stack snapshot at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StackCapture {
    /// Never capture; the stack is the head line plus the causes.
    Disabled,
    /// Capture when `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE` enable it.
    #[default]
    Env,
    /// Always capture, regardless of the environment.
    Force,
}

impl StackCapture {
    pub(crate) fn snapshot(self) -> StackOrigin {
        let backtrace = match self {
            Self::Disabled => return StackOrigin::Detached,
            Self::Env => Backtrace::capture(),
            Self::Force => Backtrace::force_capture(),
        };
        if backtrace.status() == BacktraceStatus::Captured {
            StackOrigin::Captured(backtrace)
        } else {
            StackOrigin::Detached
        }
    }
}

/// Where the frames of a stack come from.
pub(crate) enum StackOrigin {
    /// No snapshot: head line and causes only.
    Detached,
    /// Fresh snapshot taken by this crate; internal frames are trimmed.
    Captured(Backtrace),
    /// Complete stack inherited from a converted value, used unmodified.
    Inherited(String),
}

pub(crate) struct LazyStack {
    origin: Arc<StackOrigin>,
    resolved: OnceCell<String>,
}

impl LazyStack {
    fn derive(&self, incident: &Incident) -> IncidentResult<String> {
        let frames = match &*self.origin {
            StackOrigin::Inherited(raw) => return Ok(raw.clone()),
            StackOrigin::Detached => None,
            StackOrigin::Captured(backtrace) => Some(backtrace.to_string()),
        };

        let mut stack = String::new();
        push_head(&mut stack, incident.name(), incident.try_message()?);
        if let Some(frames) = &frames {
            for line in external_frames(frames) {
                stack.push('\n');
                stack.push_str(line);
            }
        }
        if let Some(cause) = incident.cause() {
            stack.push_str(CAUSED_BY);
            stack.push_str(&error_stack(cause.as_ref())?);
        }
        Ok(stack)
    }
}

/// Stack storage of an incident.
#[derive(Clone)]
pub(crate) enum StackSlot {
    Lazy(Arc<LazyStack>),
    Overridden(String),
}

impl StackSlot {
    pub(crate) fn new(origin: StackOrigin) -> Self {
        Self::from_origin(Arc::new(origin))
    }

    fn from_origin(origin: Arc<StackOrigin>) -> Self {
        Self::Lazy(Arc::new(LazyStack { origin, resolved: OnceCell::new() }))
    }

    /// Gives this slot its own resolve-once cell when the current one is
    /// still unresolved and shared with a copy of the incident.
    ///
    /// Called before a field feeding the derived stack changes, so the copies
    /// keep deriving from their own fields. The snapshot itself stays shared.
    pub(crate) fn detach(&mut self) {
        if let Self::Lazy(cell) = self {
            if cell.resolved.get().is_none() && Arc::strong_count(cell) > 1 {
                let origin = Arc::clone(&cell.origin);
                *self = Self::from_origin(origin);
            }
        }
    }

    pub(crate) fn detached() -> Self {
        Self::new(StackOrigin::Detached)
    }

    pub(crate) fn state(&self) -> FieldState {
        match self {
            Self::Lazy(cell) if cell.resolved.get().is_some() => FieldState::Resolved,
            Self::Lazy(_) => FieldState::Unresolved,
            Self::Overridden(_) => FieldState::Overridden,
        }
    }

    pub(crate) fn has_snapshot(&self) -> bool {
        matches!(self, Self::Lazy(cell) if matches!(*cell.origin, StackOrigin::Captured(_)))
    }

    pub(crate) fn resolve<'a>(&'a self, incident: &Incident) -> IncidentResult<&'a str> {
        match self {
            Self::Overridden(stack) => Ok(stack.as_str()),
            Self::Lazy(cell) => {
                cell.resolved.get_or_try_init(|| cell.derive(incident)).map(String::as_str)
            },
        }
    }
}

/// Stack handed over by an [`ErrorLike`](crate::ErrorLike) value during
/// conversion.
///
/// Either a raw stack string, used as-is, or the still-unresolved stack cell of
/// another incident, shared so that neither side evaluates it early.
#[derive(Clone)]
pub struct StackSource(pub(crate) StackSlot);

impl StackSource {
    /// A complete stack string taken verbatim from a foreign error.
    pub fn raw<S: Into<String>>(stack: S) -> Self {
        Self(StackSlot::new(StackOrigin::Inherited(stack.into())))
    }
}

impl fmt::Debug for StackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StackSource").field(&self.0.state()).finish()
    }
}

/// Writes the head line shared by `Display` and the stack.
pub(crate) fn write_head<W: Write>(out: &mut W, name: &str, message: &str) -> fmt::Result {
    if message.is_empty() {
        out.write_str(name)
    } else if name.is_empty() {
        out.write_str(message)
    } else {
        write!(out, "{}: {}", name, message)
    }
}

/// Appends the head line to a stack under construction.
pub(crate) fn push_head(out: &mut String, name: &str, message: &str) {
    if !name.is_empty() {
        out.push_str(name);
        if !message.is_empty() {
            out.push_str(": ");
        }
    }
    out.push_str(message);
}

/// Lines of a rendered backtrace after its leading internal frames.
fn external_frames(trace: &str) -> impl Iterator<Item = &str> {
    let mut lines = trace.lines().peekable();
    while lines.peek().and_then(|line| frame_symbol(line)).is_some_and(is_internal) {
        lines.next();
        while lines.peek().is_some_and(|line| frame_symbol(line).is_none()) {
            lines.next();
        }
    }
    lines
}

/// Symbol of a frame header line (`  12: symbol`), `None` for location lines.
fn frame_symbol(line: &str) -> Option<&str> {
    let (index, symbol) = line.trim_start().split_once(": ")?;
    (!index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())).then_some(symbol)
}

fn is_internal(symbol: &str) -> bool {
    INTERNAL_FRAME_PREFIXES.iter().any(|prefix| symbol.starts_with(prefix))
}
