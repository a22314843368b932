//! The block chain: a growable, recyclable sequence of [`Block`]s.
//!
//! Allocation bump-allocates from the current block. When it is full the
//! arena advances to the next block, reusing one left over from an
//! earlier frame if there is one and appending a fresh block otherwise.
//! Allocations never span blocks.

use bytemuck::Pod;

use crate::block::Block;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::Allocation;

/// A bump arena over a chain of fixed-capacity blocks.
///
/// Invariant: every allocation made since the last reset lives either in
/// the current block or in a block before it, and blocks before the
/// current one are never allocated from again until a reset walks back
/// to them.
pub struct Arena {
    blocks: Vec<Block>,
    /// Index of the block currently being filled; equals `blocks.len()`
    /// before the first allocation after construction or reclaim.
    current: usize,
    block_size: usize,
    /// Bumped on every reset; stamped into each [`Allocation`].
    generation: u32,
}

/// Point-in-time memory usage of an [`Arena`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Blocks owned by the arena, in use or not.
    pub block_count: usize,
    /// Blocks allocated from since the last reset.
    pub blocks_in_use: usize,
    /// Capacity of each block in bytes.
    pub block_size: usize,
    /// Bytes consumed since the last reset, including alignment padding
    /// and the unused tails of blocks the arena advanced past.
    pub used_bytes: usize,
    /// Bytes of backing storage held across all blocks.
    pub memory_bytes: usize,
    /// Current generation.
    pub generation: u32,
}

impl Arena {
    /// Create an empty arena. No block is allocated until the first
    /// [`allocate`](Self::allocate).
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::with_block_size(config.block_size))
    }

    fn with_block_size(block_size: usize) -> Self {
        Self {
            blocks: Vec::new(),
            current: 0,
            block_size,
            generation: 0,
        }
    }

    /// Bump-allocate `size` bytes aligned to `alignment`.
    ///
    /// Any power-of-two alignment is honoured against the block's real
    /// address. Fails with [`ArenaError::OversizedAllocation`] if
    /// `size + alignment` exceeds the block size (such a request could
    /// never fit), and with [`ArenaError::UnsupportedAlignment`] if
    /// `alignment` is not a power of two. Otherwise always succeeds,
    /// creating a block if the chain is exhausted.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> Result<Allocation, ArenaError> {
        if !alignment.is_power_of_two() {
            return Err(ArenaError::UnsupportedAlignment { alignment });
        }

        // Reject allocations that can never fit in a single block.
        if size
            .checked_add(alignment)
            .is_none_or(|total| total > self.block_size)
        {
            return Err(self.oversized(size, alignment));
        }

        // First allocation since construction or reclaim.
        if self.current == self.blocks.len() {
            self.insert_block();
        }

        if let Some(offset) = self.blocks[self.current].allocate(size, alignment) {
            return Ok(self.handle(offset, size, alignment));
        }

        // Current block full: advance to the next existing block or create one.
        self.current += 1;
        if self.current == self.blocks.len() {
            self.insert_block();
        } else {
            // Left over from an earlier frame; its cursor is stale.
            self.blocks[self.current].reset();
            log::trace!("arena: reusing block {}", self.current);
        }

        // size + alignment <= block_size, so an empty block always fits:
        // aligning its base skips at most alignment - 1 bytes.
        match self.blocks[self.current].allocate(size, alignment) {
            Some(offset) => Ok(self.handle(offset, size, alignment)),
            None => Err(self.oversized(size, alignment)),
        }
    }

    /// Allocate space for `value` and write it.
    pub fn alloc_value<T: Pod>(&mut self, value: T) -> Result<Allocation, ArenaError> {
        let alloc = self.allocate(std::mem::size_of::<T>(), std::mem::align_of::<T>())?;
        *self.get_mut::<T>(alloc)? = value;
        Ok(alloc)
    }

    /// Allocate space for `values` and copy them in.
    pub fn alloc_slice<T: Pod>(&mut self, values: &[T]) -> Result<Allocation, ArenaError> {
        let alloc = self.allocate(std::mem::size_of_val(values), std::mem::align_of::<T>())?;
        self.slice_mut::<T>(alloc)?.copy_from_slice(values);
        Ok(alloc)
    }

    /// Rewind to the first block for a new frame.
    ///
    /// Only the first block's cursor is reset; later blocks are reset
    /// lazily as allocation advances into them again. Every outstanding
    /// [`Allocation`] becomes stale.
    pub fn reset(&mut self) {
        self.current = 0;
        if let Some(first) = self.blocks.first_mut() {
            first.reset();
        }
        self.generation = self.generation.wrapping_add(1);
        log::trace!("arena: reset to generation {}", self.generation);
    }

    /// Drop every block, returning their memory to the allocator.
    ///
    /// Use when the previous peak should not be retained. The next
    /// allocation starts a fresh block. Every outstanding [`Allocation`]
    /// becomes stale.
    pub fn reset_and_reclaim(&mut self) {
        let released = self.memory_bytes();
        let blocks = self.blocks.len();
        self.blocks.clear();
        self.blocks.shrink_to_fit();
        self.current = 0;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("arena: reclaimed {blocks} blocks ({released} bytes)");
    }

    /// The bytes of an allocation.
    pub fn bytes(&self, alloc: Allocation) -> Result<&[u8], ArenaError> {
        self.check(alloc)?;
        Ok(self.blocks[alloc.block_index()].bytes(alloc.offset(), alloc.len()))
    }

    /// The bytes of an allocation, mutably.
    pub fn bytes_mut(&mut self, alloc: Allocation) -> Result<&mut [u8], ArenaError> {
        self.check(alloc)?;
        Ok(self.blocks[alloc.block_index()].bytes_mut(alloc.offset(), alloc.len()))
    }

    /// View an allocation as a single `T`. The sizes must match exactly.
    pub fn get<T: Pod>(&self, alloc: Allocation) -> Result<&T, ArenaError> {
        let bytes = self.bytes(alloc)?;
        bytemuck::try_from_bytes(bytes).map_err(|_| layout_mismatch::<T>(alloc))
    }

    /// View an allocation as a single mutable `T`.
    pub fn get_mut<T: Pod>(&mut self, alloc: Allocation) -> Result<&mut T, ArenaError> {
        let bytes = self.bytes_mut(alloc)?;
        bytemuck::try_from_bytes_mut(bytes).map_err(|_| layout_mismatch::<T>(alloc))
    }

    /// View an allocation as a slice of `T`.
    pub fn slice<T: Pod>(&self, alloc: Allocation) -> Result<&[T], ArenaError> {
        let bytes = self.bytes(alloc)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| layout_mismatch::<T>(alloc))
    }

    /// View an allocation as a mutable slice of `T`.
    pub fn slice_mut<T: Pod>(&mut self, alloc: Allocation) -> Result<&mut [T], ArenaError> {
        let bytes = self.bytes_mut(alloc)?;
        bytemuck::try_cast_slice_mut(bytes).map_err(|_| layout_mismatch::<T>(alloc))
    }

    /// Copy the first `len` bytes of `src` into the start of `dst`.
    ///
    /// Both handles must belong to this arena's current generation and be
    /// at least `len` bytes long. They may live in the same block.
    pub fn copy_bytes(
        &mut self,
        src: Allocation,
        dst: Allocation,
        len: usize,
    ) -> Result<(), ArenaError> {
        self.check(src)?;
        self.check(dst)?;
        for alloc in [src, dst] {
            if len > alloc.len() {
                return Err(ArenaError::InvalidAllocation {
                    block: alloc.block_index(),
                    offset: alloc.offset(),
                    len,
                });
            }
        }

        let (s, d) = (src.block_index(), dst.block_index());
        match s.cmp(&d) {
            std::cmp::Ordering::Equal => {
                self.blocks[s].copy_within(src.offset(), dst.offset(), len);
            }
            std::cmp::Ordering::Less => {
                let (lo, hi) = self.blocks.split_at_mut(d);
                hi[0]
                    .bytes_mut(dst.offset(), len)
                    .copy_from_slice(lo[s].bytes(src.offset(), len));
            }
            std::cmp::Ordering::Greater => {
                let (lo, hi) = self.blocks.split_at_mut(s);
                lo[d]
                    .bytes_mut(dst.offset(), len)
                    .copy_from_slice(hi[0].bytes(src.offset(), len));
            }
        }
        Ok(())
    }

    /// Copy an allocation out of `source` into a fresh allocation here,
    /// preserving its length and alignment.
    pub fn import(&mut self, source: &Arena, alloc: Allocation) -> Result<Allocation, ArenaError> {
        let bytes = source.bytes(alloc)?;
        let copy = self.allocate(alloc.len(), alloc.align())?;
        self.bytes_mut(copy)?.copy_from_slice(bytes);
        Ok(copy)
    }

    /// Blocks owned by the arena.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Blocks allocated from since the last reset.
    pub fn blocks_in_use(&self) -> usize {
        if self.blocks.is_empty() {
            0
        } else {
            (self.current + 1).min(self.blocks.len())
        }
    }

    /// Capacity of each block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Current generation.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Bytes consumed since the last reset.
    pub fn used_bytes(&self) -> usize {
        self.blocks[..self.blocks_in_use()]
            .iter()
            .map(|b| b.used())
            .sum()
    }

    /// Total memory held across all blocks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.iter().map(|b| b.memory_bytes()).sum()
    }

    /// Snapshot of the arena's memory usage.
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            block_count: self.block_count(),
            blocks_in_use: self.blocks_in_use(),
            block_size: self.block_size,
            used_bytes: self.used_bytes(),
            memory_bytes: self.memory_bytes(),
            generation: self.generation,
        }
    }

    fn insert_block(&mut self) {
        self.blocks.push(Block::new(self.block_size));
        self.current = self.blocks.len() - 1;
        log::debug!(
            "arena: appended block {} ({} bytes)",
            self.current,
            self.block_size
        );
    }

    fn handle(&self, offset: usize, size: usize, alignment: usize) -> Allocation {
        // block_size <= u32::MAX (validated), so offset and size fit.
        Allocation::new(
            self.generation,
            self.current as u32,
            offset as u32,
            size as u32,
            alignment as u32,
        )
    }

    fn oversized(&self, size: usize, alignment: usize) -> ArenaError {
        ArenaError::OversizedAllocation {
            requested: size,
            alignment,
            block_size: self.block_size,
        }
    }

    fn check(&self, alloc: Allocation) -> Result<(), ArenaError> {
        if alloc.generation != self.generation {
            return Err(ArenaError::StaleAllocation {
                allocation_generation: alloc.generation,
                arena_generation: self.generation,
            });
        }
        let in_bounds = self.blocks.get(alloc.block_index()).is_some_and(|block| {
            alloc
                .offset()
                .checked_add(alloc.len())
                .is_some_and(|end| end <= block.capacity())
        });
        if !in_bounds {
            return Err(ArenaError::InvalidAllocation {
                block: alloc.block_index(),
                offset: alloc.offset(),
                len: alloc.len(),
            });
        }
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::with_block_size(ArenaConfig::DEFAULT_BLOCK_SIZE)
    }
}

fn layout_mismatch<T>(alloc: Allocation) -> ArenaError {
    ArenaError::LayoutMismatch {
        type_name: std::any::type_name::<T>(),
        len: alloc.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_arena() -> Arena {
        Arena::new(ArenaConfig::new(1024)).unwrap()
    }

    #[test]
    fn no_block_until_first_alloc() {
        let mut arena = small_arena();
        assert_eq!(arena.block_count(), 0);
        assert_eq!(arena.blocks_in_use(), 0);
        let a = arena.allocate(16, 8).unwrap();
        assert_eq!(arena.block_count(), 1);
        assert_eq!(a.block_index(), 0);
        assert_eq!(a.offset(), 0);
    }

    #[test]
    fn grows_on_overflow() {
        let mut arena = small_arena();
        let _ = arena.allocate(1000, 4).unwrap();
        let b = arena.allocate(100, 4).unwrap();
        assert_eq!(b.block_index(), 1);
        assert_eq!(b.offset(), 0);
        assert_eq!(arena.block_count(), 2);
        assert_eq!(arena.blocks_in_use(), 2);
    }

    #[test]
    fn oversized_alloc_returns_error_not_panic() {
        let mut arena = small_arena();
        let result = arena.allocate(1020, 8);
        assert!(matches!(
            result,
            Err(ArenaError::OversizedAllocation {
                requested: 1020,
                alignment: 8,
                block_size: 1024
            })
        ));
        // Nothing was allocated for the rejected request.
        assert_eq!(arena.block_count(), 0);
    }

    #[test]
    fn largest_fitting_alloc_succeeds() {
        let mut arena = small_arena();
        assert!(arena.allocate(1016, 8).is_ok());
    }

    #[test]
    fn rejects_unsupported_alignment() {
        let mut arena = small_arena();
        for alignment in [0, 3, 12, 48] {
            let result = arena.allocate(8, alignment);
            assert!(
                matches!(result, Err(ArenaError::UnsupportedAlignment { .. })),
                "alignment {alignment} should be rejected"
            );
        }
    }

    #[test]
    fn wide_alignments_are_honoured() {
        let mut arena = Arena::default();
        let _ = arena.allocate(3, 1).unwrap();
        for alignment in [32, 64, 128, 4096] {
            let a = arena.allocate(64, alignment).unwrap();
            assert_eq!(a.align(), alignment);
            let addr = arena.bytes(a).unwrap().as_ptr() as usize;
            assert_eq!(addr % alignment, 0, "alignment {alignment}");
        }
    }

    #[test]
    fn wide_alignment_fits_an_empty_block() {
        let mut arena = small_arena();
        let _ = arena.allocate(1000, 1).unwrap();
        // 512 + 512 == block size: must land at the start of a fresh block.
        let a = arena.allocate(512, 512).unwrap();
        assert_eq!(a.block_index(), 1);
        let addr = arena.bytes(a).unwrap().as_ptr() as usize;
        assert_eq!(addr % 512, 0);
        assert!(arena.allocate(513, 512).is_err());
    }

    #[test]
    fn reset_reuses_blocks_without_growth() {
        let mut arena = small_arena();
        let first: Vec<_> = (0..10).map(|_| arena.allocate(300, 4).unwrap()).collect();
        let blocks = arena.block_count();
        let memory = arena.memory_bytes();

        arena.reset();
        let second: Vec<_> = (0..10).map(|_| arena.allocate(300, 4).unwrap()).collect();

        assert_eq!(arena.block_count(), blocks);
        assert_eq!(arena.memory_bytes(), memory);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.block_index(), b.block_index());
            assert_eq!(a.offset(), b.offset());
        }
    }

    #[test]
    fn reset_resets_later_blocks_lazily() {
        let mut arena = small_arena();
        let _ = arena.allocate(1000, 4).unwrap();
        let _ = arena.allocate(1000, 4).unwrap();
        assert_eq!(arena.block_count(), 2);

        arena.reset();
        assert_eq!(arena.blocks_in_use(), 1);
        assert_eq!(arena.used_bytes(), 0);

        let _ = arena.allocate(1020, 4).unwrap();
        // Block 1 still holds last frame's cursor until we advance into it.
        let c = arena.allocate(10, 4).unwrap();
        assert_eq!(c.block_index(), 1);
        assert_eq!(c.offset(), 0);
        assert_eq!(arena.block_count(), 2);
    }

    #[test]
    fn reclaim_drops_all_blocks() {
        let mut arena = small_arena();
        let _ = arena.allocate(1000, 4).unwrap();
        let _ = arena.allocate(1000, 4).unwrap();
        arena.reset_and_reclaim();
        assert_eq!(arena.block_count(), 0);
        assert_eq!(arena.memory_bytes(), 0);

        let a = arena.allocate(8, 8).unwrap();
        assert_eq!(a.block_index(), 0);
        assert_eq!(arena.block_count(), 1);
    }

    #[test]
    fn reset_on_empty_arena_is_harmless() {
        let mut arena = small_arena();
        arena.reset();
        arena.reset_and_reclaim();
        assert_eq!(arena.block_count(), 0);
        assert!(arena.allocate(4, 4).is_ok());
    }

    #[test]
    fn stale_handle_is_rejected() {
        let mut arena = small_arena();
        let a = arena.alloc_value(7u32).unwrap();
        arena.reset();
        assert!(matches!(
            arena.get::<u32>(a),
            Err(ArenaError::StaleAllocation {
                allocation_generation: 0,
                arena_generation: 1
            })
        ));
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let mut big = small_arena();
        let _ = big.allocate(1020, 4).unwrap();
        let far = big.allocate(8, 4).unwrap();

        let mut other = small_arena();
        let _ = other.allocate(8, 4).unwrap();
        assert!(matches!(
            other.bytes(far),
            Err(ArenaError::InvalidAllocation { block: 1, .. })
        ));
    }

    #[test]
    fn typed_values_round_trip() {
        let mut arena = small_arena();
        let _ = arena.allocate(1, 1).unwrap();
        let a = arena.alloc_value(0xdead_beef_u64).unwrap();
        assert_eq!(a.offset() % 8, 0);
        assert_eq!(*arena.get::<u64>(a).unwrap(), 0xdead_beef);

        *arena.get_mut::<u64>(a).unwrap() += 1;
        assert_eq!(*arena.get::<u64>(a).unwrap(), 0xdead_bef0);
    }

    #[test]
    fn typed_slices_round_trip() {
        let mut arena = small_arena();
        let a = arena.alloc_slice(&[1.0f32, 2.0, 3.0]).unwrap();
        assert_eq!(a.len(), 12);
        assert_eq!(arena.slice::<f32>(a).unwrap(), &[1.0, 2.0, 3.0]);
        arena.slice_mut::<f32>(a).unwrap()[1] = 5.0;
        assert_eq!(arena.slice::<f32>(a).unwrap(), &[1.0, 5.0, 3.0]);
    }

    #[test]
    fn wrong_type_is_layout_mismatch() {
        let mut arena = small_arena();
        let a = arena.alloc_value(1u32).unwrap();
        assert!(matches!(
            arena.get::<u64>(a),
            Err(ArenaError::LayoutMismatch { len: 4, .. })
        ));
    }

    #[test]
    fn copy_within_one_block() {
        let mut arena = small_arena();
        let src = arena.alloc_slice(&[1u32, 2, 3]).unwrap();
        let dst = arena.allocate(24, 4).unwrap();
        arena.copy_bytes(src, dst, 12).unwrap();
        assert_eq!(&arena.slice::<u32>(dst).unwrap()[..3], &[1, 2, 3]);
    }

    #[test]
    fn copy_across_blocks() {
        let mut arena = small_arena();
        let src = arena.alloc_slice(&[9u32, 8, 7]).unwrap();
        let _ = arena.allocate(1020, 4).unwrap();
        let dst = arena.allocate(12, 4).unwrap();
        assert_ne!(src.block_index(), dst.block_index());
        arena.copy_bytes(src, dst, 12).unwrap();
        assert_eq!(arena.slice::<u32>(dst).unwrap(), &[9, 8, 7]);

        // And backwards, from a later block into an earlier one.
        let back = arena.alloc_slice(&[4u32, 5, 6]).unwrap();
        arena.copy_bytes(back, src, 12).unwrap();
        assert_eq!(arena.slice::<u32>(src).unwrap(), &[4, 5, 6]);
    }

    #[test]
    fn copy_longer_than_handle_is_rejected() {
        let mut arena = small_arena();
        let src = arena.allocate(8, 4).unwrap();
        let dst = arena.allocate(4, 4).unwrap();
        assert!(matches!(
            arena.copy_bytes(src, dst, 8),
            Err(ArenaError::InvalidAllocation { .. })
        ));
    }

    #[test]
    fn import_from_other_arena() {
        let mut source = small_arena();
        let a = source.alloc_value([1.0f32, 2.0, 3.0, 4.0]).unwrap();

        let mut target = small_arena();
        let _ = target.allocate(3, 1).unwrap();
        let b = target.import(&source, a).unwrap();
        assert_eq!(b.len(), 16);
        assert_eq!(b.align(), 4);
        assert_eq!(b.offset(), 4);
        assert_eq!(*target.get::<[f32; 4]>(b).unwrap(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn stats_track_usage() {
        let mut arena = small_arena();
        let _ = arena.allocate(1020, 4).unwrap();
        let _ = arena.allocate(10, 4).unwrap();
        let stats = arena.stats();
        assert_eq!(stats.block_count, 2);
        assert_eq!(stats.blocks_in_use, 2);
        assert_eq!(stats.block_size, 1024);
        assert_eq!(stats.used_bytes, 1030);
        assert_eq!(stats.memory_bytes, 2048);
        assert_eq!(stats.generation, 0);
    }

    #[test]
    fn default_arena_uses_default_block_size() {
        let arena = Arena::default();
        assert_eq!(arena.block_size(), ArenaConfig::DEFAULT_BLOCK_SIZE);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_request() -> impl Strategy<Value = (usize, usize)> {
            (
                0usize..400,
                prop_oneof![Just(1usize), Just(2), Just(4), Just(8), Just(16), Just(64), Just(256)],
            )
        }

        proptest! {
            #[test]
            fn allocations_are_aligned_and_disjoint(
                requests in proptest::collection::vec(arb_request(), 1..64),
            ) {
                let mut arena = small_arena();
                let mut handles = Vec::new();
                for &(size, align) in &requests {
                    let a = arena.allocate(size, align).unwrap();
                    let addr = arena.bytes(a).unwrap().as_ptr() as usize;
                    prop_assert_eq!(addr % align, 0);
                    prop_assert!(a.offset() + a.len() <= 1024);
                    handles.push(a);
                }
                for (i, a) in handles.iter().enumerate() {
                    for b in &handles[i + 1..] {
                        if a.block_index() == b.block_index() && !a.is_empty() && !b.is_empty() {
                            let disjoint = a.offset() + a.len() <= b.offset()
                                || b.offset() + b.len() <= a.offset();
                            prop_assert!(disjoint, "{} overlaps {}", a, b);
                        }
                    }
                }
            }

            #[test]
            fn replaying_a_frame_after_reset_never_grows(
                requests in proptest::collection::vec(arb_request(), 1..64),
            ) {
                let mut arena = small_arena();
                let first: Vec<_> = requests
                    .iter()
                    .map(|&(s, a)| arena.allocate(s, a).unwrap())
                    .collect();
                let blocks = arena.block_count();

                arena.reset();
                for (&(s, a), prev) in requests.iter().zip(&first) {
                    let again = arena.allocate(s, a).unwrap();
                    prop_assert_eq!(again.block_index(), prev.block_index());
                    prop_assert_eq!(again.offset(), prev.offset());
                }
                prop_assert_eq!(arena.block_count(), blocks);
            }
        }
    }
}
