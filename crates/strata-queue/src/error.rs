//! Render queue error types.

use std::error::Error;
use std::fmt;

use strata_arena::ArenaError;

use crate::info::DrawId;

/// Errors that can occur while building or reading a render queue.
///
/// Contract violations during dispatch (zero keys, mismatched callbacks
/// under one instance key) are not represented here: they panic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueError {
    /// The underlying arena refused an allocation or access.
    Arena(ArenaError),
    /// A [`DrawId`] that this queue did not issue this frame.
    UnknownDraw {
        /// The offending id.
        id: DrawId,
        /// Descriptors currently registered.
        registered: usize,
    },
    /// A payload was requested from a descriptor that has none.
    MissingPayload {
        /// The descriptor without payload.
        id: DrawId,
    },
    /// Queue configuration failed validation.
    InvalidConfig {
        /// Which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena error: {e}"),
            Self::UnknownDraw { id, registered } => {
                write!(f, "unknown {id}: only {registered} descriptors registered")
            }
            Self::MissingPayload { id } => write!(f, "{id} has no payload"),
            Self::InvalidConfig { reason } => write!(f, "invalid queue config: {reason}"),
        }
    }
}

impl Error for QueueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ArenaError> for QueueError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}
