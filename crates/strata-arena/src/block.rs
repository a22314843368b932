//! Fixed-capacity memory blocks with bump allocation.
//!
//! A [`Block`] is the unit the [`Arena`](crate::Arena) chains together.
//! Its storage is allocated once at creation, aligned to [`BLOCK_ALIGN`],
//! and never resized or moved, so allocation can align against the real
//! address of the storage.

use bytemuck::{Pod, Zeroable};

/// Alignment of every block's base address.
///
/// Requests up to this alignment get offsets that are multiples of it.
/// Larger alignments are honoured against the block's address instead.
pub const BLOCK_ALIGN: usize = 16;

/// Storage unit that carries the block's base alignment.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Chunk([u8; BLOCK_ALIGN]);

/// A single fixed-capacity byte region with a bump cursor.
///
/// Invariant: `0 <= cursor <= capacity`. Resetting rewinds the cursor
/// without clearing the bytes; consumers always write before they read.
pub struct Block {
    /// Backing storage. Allocated to full capacity at creation.
    data: Box<[Chunk]>,
    /// Bump pointer: byte offset of the next free position.
    cursor: usize,
}

impl Block {
    /// Create a block of at least `capacity` bytes.
    ///
    /// The capacity is rounded up to a multiple of [`BLOCK_ALIGN`].
    pub fn new(capacity: usize) -> Self {
        let chunks = capacity.div_ceil(BLOCK_ALIGN);
        Self {
            data: vec![Chunk::zeroed(); chunks].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Bump-allocate `size` bytes aligned to `alignment`.
    ///
    /// The address at the cursor is first rounded up to `alignment`; if
    /// the aligned region fits, the cursor advances past it and its byte
    /// offset is returned. Returns `None` (leaving the cursor untouched)
    /// if the block lacks room.
    ///
    /// `alignment` must be a power of two.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> Option<usize> {
        debug_assert!(alignment.is_power_of_two());
        let base = self.base_address();
        let start = align_up(base.checked_add(self.cursor)?, alignment)? - base;
        let end = start.checked_add(size)?;
        if end > self.capacity() {
            return None;
        }
        self.cursor = end;
        Some(start)
    }

    /// Address of the first byte of storage. Stable for the block's life.
    pub fn base_address(&self) -> usize {
        self.data.as_ptr() as usize
    }

    /// Get a shared byte slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the block's capacity.
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &bytemuck::cast_slice::<Chunk, u8>(&self.data)[offset..offset + len]
    }

    /// Get a mutable byte slice at the given offset and length.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the block's capacity.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<Chunk, u8>(&mut self.data)[offset..offset + len]
    }

    /// Copy `len` bytes from `src` to `dst` inside this block.
    ///
    /// The ranges may overlap.
    ///
    /// # Panics
    ///
    /// Panics if either range exceeds the block's capacity.
    pub fn copy_within(&mut self, src: usize, dst: usize, len: usize) {
        bytemuck::cast_slice_mut::<Chunk, u8>(&mut self.data).copy_within(src..src + len, dst);
    }

    /// Rewind the bump pointer to zero without clearing contents.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Bytes consumed so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len() * BLOCK_ALIGN
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        std::mem::size_of_val(&*self.data)
    }
}

/// Round `value` up to a multiple of the power-of-two `alignment`.
///
/// Returns `None` on overflow.
#[inline]
pub(crate) fn align_up(value: usize, alignment: usize) -> Option<usize> {
    let mask = alignment - 1;
    Some(value.checked_add(mask)? & !mask)
}
