use core::fmt::{self, Display};
use std::error::Error;
use std::io;

use super::Incident;
use crate::error::BoxError;
use crate::types::lazy_stack::write_head;

impl Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return Display::fmt(&self.fmt_chain(), f);
        }
        let message = self.try_message().map_err(|_| fmt::Error)?;
        write_head(f, &self.name, message)
    }
}

impl fmt::Debug for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Incident")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("data", &self.data)
            .field("cause", &self.cause)
            .field("stack", &self.stack.state())
            .finish()
    }
}

impl Error for Incident {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// Stackless incident with the default name, an empty message and no data.
impl Default for Incident {
    fn default() -> Self {
        Self::detached()
    }
}

impl From<io::Error> for Incident {
    #[inline]
    fn from(error: io::Error) -> Self {
        *Self::convert(Box::new(error))
    }
}

impl From<BoxError> for Incident {
    #[inline]
    fn from(error: BoxError) -> Self {
        *Self::convert(error)
    }
}

impl From<Box<Incident>> for Incident {
    #[inline]
    fn from(incident: Box<Incident>) -> Self {
        *incident
    }
}
