//! Frame-scoped allocation handles.
//!
//! An [`Allocation`] encodes where an allocation lives inside an
//! [`Arena`](crate::Arena). It is generation-scoped: the `generation`
//! field allows O(1) staleness checks after the arena is reset.

use std::fmt;

/// Location of an allocation within the arena.
///
/// Handles are plain data (`Copy`, 20 bytes) and are resolved back to
/// bytes through the arena that issued them. They stay valid until that
/// arena's next `reset` or `reset_and_reclaim`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Allocation {
    /// Arena generation when this allocation was made.
    pub(crate) generation: u32,
    /// Index of the block holding the allocation.
    pub(crate) block: u32,
    /// Byte offset within the block.
    pub(crate) offset: u32,
    /// Length of the allocation in bytes.
    pub(crate) len: u32,
    /// Alignment the allocation was requested with.
    pub(crate) align: u32,
}

impl Allocation {
    /// Create a new handle.
    pub(crate) fn new(generation: u32, block: u32, offset: u32, len: u32, align: u32) -> Self {
        Self {
            generation,
            block,
            offset,
            len,
            align,
        }
    }

    /// The arena generation this handle belongs to.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Index of the block holding the allocation.
    pub fn block_index(&self) -> usize {
        self.block as usize
    }

    /// Byte offset within the block.
    pub fn offset(&self) -> usize {
        self.offset as usize
    }

    /// Length of the allocation in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment the allocation was requested with.
    pub fn align(&self) -> usize {
        self.align as usize
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Allocation(gen={}, block={}, off={}, len={}, align={})",
            self.generation, self.block, self.offset, self.len, self.align
        )
    }
}
