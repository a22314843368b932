//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The request cannot fit in a single empty block
    /// (`size + alignment > block_size`).
    OversizedAllocation {
        /// Number of bytes requested.
        requested: usize,
        /// Requested alignment.
        alignment: usize,
        /// Capacity of one block.
        block_size: usize,
    },
    /// Alignment is not a power of two.
    UnsupportedAlignment {
        /// The requested alignment.
        alignment: usize,
    },
    /// An `Allocation` from a generation that has since been reset.
    StaleAllocation {
        /// The generation encoded in the handle.
        allocation_generation: u32,
        /// The arena's current generation.
        arena_generation: u32,
    },
    /// An `Allocation` that does not describe a region of this arena.
    InvalidAllocation {
        /// Block index in the handle.
        block: usize,
        /// Byte offset in the handle.
        offset: usize,
        /// Byte length in the handle.
        len: usize,
    },
    /// The allocation's size or alignment does not fit the requested type.
    LayoutMismatch {
        /// Name of the type the bytes were viewed as.
        type_name: &'static str,
        /// Length of the allocation in bytes.
        len: usize,
    },
    /// Arena configuration failed validation.
    InvalidConfig {
        /// Which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedAllocation {
                requested,
                alignment,
                block_size,
            } => {
                write!(
                    f,
                    "allocation of {requested} bytes (align {alignment}) cannot fit in a {block_size} byte block"
                )
            }
            Self::UnsupportedAlignment { alignment } => {
                write!(f, "unsupported alignment {alignment}: must be a power of two")
            }
            Self::StaleAllocation {
                allocation_generation,
                arena_generation,
            } => {
                write!(
                    f,
                    "stale allocation: generation {allocation_generation}, arena is at {arena_generation}"
                )
            }
            Self::InvalidAllocation { block, offset, len } => {
                write!(
                    f,
                    "allocation (block {block}, offset {offset}, len {len}) is outside this arena"
                )
            }
            Self::LayoutMismatch { type_name, len } => {
                write!(f, "{len} byte allocation cannot be viewed as {type_name}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}
