//! Per-category render queues with stable sort and batched dispatch.

use std::ops::Range;

use bytemuck::Pod;
use strata_arena::{Allocation, Arena};
use strata_core::{CommandStream, QueueCategory};

use crate::batch::RenderBatch;
use crate::bin::QueueBin;
use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::info::{DrawId, RenderInfo};
use crate::stats::QueueStats;

/// A frame's worth of draw descriptors, binned by [`QueueCategory`].
///
/// The queue owns an [`Arena`] that holds descriptor payloads and each
/// bin's id array, plus a frame-local table of [`RenderInfo`]s addressed
/// by [`DrawId`]. Everything is released together by [`reset`](Self::reset).
///
/// A frame looks like:
///
/// 1. producers [`submit`](Self::submit) descriptors (or [`push`](Self::push)
///    once and [`enqueue`](Self::enqueue) into several categories);
/// 2. per-thread queues are merged with
///    [`combine_render_info`](Self::combine_render_info);
/// 3. [`sort`](Self::sort), then [`dispatch`](Self::dispatch) each category;
/// 4. [`reset`](Self::reset).
///
/// Not safe for concurrent mutation; build one queue per thread and merge.
pub struct RenderQueue<C> {
    arena: Arena,
    infos: Vec<RenderInfo<C>>,
    bins: [QueueBin; QueueCategory::COUNT],
    initial_bin_capacity: usize,
}

impl<C> RenderQueue<C> {
    /// An empty queue with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(Arena::default(), QueueConfig::DEFAULT_INITIAL_BIN_CAPACITY)
    }

    /// An empty queue with a validated configuration.
    pub fn with_config(config: QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;
        let arena = Arena::new(config.arena)?;
        Ok(Self::from_parts(arena, config.initial_bin_capacity))
    }

    fn from_parts(arena: Arena, initial_bin_capacity: usize) -> Self {
        Self {
            arena,
            infos: Vec::new(),
            bins: [QueueBin::default(); QueueCategory::COUNT],
            initial_bin_capacity,
        }
    }

    // ── Producer surface ────────────────────────────────────────

    /// Bump-allocate raw payload storage from the queue's arena.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> Result<Allocation, QueueError> {
        Ok(self.arena.allocate(size, alignment)?)
    }

    /// Allocate and write a payload value.
    pub fn alloc_value<T: Pod>(&mut self, value: T) -> Result<Allocation, QueueError> {
        Ok(self.arena.alloc_value(value)?)
    }

    /// Allocate and copy a payload slice.
    pub fn alloc_slice<T: Pod>(&mut self, values: &[T]) -> Result<Allocation, QueueError> {
        Ok(self.arena.alloc_slice(values)?)
    }

    /// The queue's arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The queue's arena, mutably, for filling payloads in place.
    ///
    /// Resetting the arena through this reference leaves the bins pointing
    /// at stale storage; reset the queue instead.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Register a descriptor for this frame without queueing it.
    ///
    /// # Panics
    ///
    /// If more than `u32::MAX` descriptors are registered in one frame.
    pub fn push(&mut self, info: RenderInfo<C>) -> DrawId {
        let id = u32::try_from(self.infos.len()).expect("descriptor count fits in u32");
        self.infos.push(info);
        DrawId(id)
    }

    /// The descriptor behind `id`, if this queue issued it this frame.
    pub fn info(&self, id: DrawId) -> Option<&RenderInfo<C>> {
        self.infos.get(id.index())
    }

    /// Append `id` to `category`'s bin.
    ///
    /// Duplicates are kept verbatim. Fails if `id` is unknown or if the
    /// bin needs to grow past what one arena block can hold.
    pub fn enqueue(&mut self, category: QueueCategory, id: DrawId) -> Result<(), QueueError> {
        if id.index() >= self.infos.len() {
            return Err(QueueError::UnknownDraw {
                id,
                registered: self.infos.len(),
            });
        }
        self.bins[category.index()].push(&mut self.arena, id, self.initial_bin_capacity)?;
        Ok(())
    }

    /// [`push`](Self::push) then [`enqueue`](Self::enqueue).
    pub fn submit(
        &mut self,
        category: QueueCategory,
        info: RenderInfo<C>,
    ) -> Result<DrawId, QueueError> {
        let id = self.push(info);
        self.enqueue(category, id)?;
        Ok(id)
    }

    // ── Frame driver ────────────────────────────────────────────

    /// Stable ascending sort of every bin by `sorting_key`.
    ///
    /// Entries with equal keys keep their enqueue order.
    pub fn sort(&mut self) {
        let infos = &self.infos;
        for bin in &self.bins {
            bin.ids_mut(&mut self.arena)
                .sort_by_key(|id| infos[id.index()].sorting_key);
        }
    }

    /// Append every entry of every bin of `other` to this queue, in order.
    ///
    /// `other`'s descriptors are copied into this queue's table and their
    /// payloads into this queue's arena, so `other` can be reset or dropped
    /// afterwards. On error this queue may hold a partial merge.
    ///
    /// # Panics
    ///
    /// If the merged descriptor table would exceed `u32::MAX` entries.
    pub fn combine_render_info(&mut self, other: &RenderQueue<C>) -> Result<(), QueueError> {
        let offset = u32::try_from(self.infos.len()).expect("descriptor count fits in u32");
        assert!(
            u32::try_from(self.infos.len() + other.infos.len()).is_ok(),
            "combined descriptor count exceeds u32::MAX"
        );

        self.infos.reserve(other.infos.len());
        for info in &other.infos {
            let mut info = *info;
            if let Some(payload) = info.payload {
                info.payload = Some(self.arena.import(&other.arena, payload)?);
            }
            self.infos.push(info);
        }

        for category in QueueCategory::ALL {
            for &id in other.queue(category) {
                self.bins[category.index()].push(
                    &mut self.arena,
                    DrawId(id.0 + offset),
                    self.initial_bin_capacity,
                )?;
            }
        }

        log::debug!(
            "render queue: combined {} descriptors ({} queued)",
            other.infos.len(),
            other.bins.iter().map(QueueBin::len).sum::<usize>()
        );
        Ok(())
    }

    /// Start a new frame: clear every bin and the descriptor table and
    /// rewind the arena, keeping its blocks.
    pub fn reset(&mut self) {
        self.infos.clear();
        for bin in &mut self.bins {
            bin.clear();
        }
        self.arena.reset();
    }

    /// Like [`reset`](Self::reset), but also release the arena's blocks
    /// and the descriptor table's memory.
    pub fn reset_and_reclaim(&mut self) {
        let draws = self.infos.capacity();
        self.infos = Vec::new();
        for bin in &mut self.bins {
            bin.clear();
        }
        self.arena.reset_and_reclaim();
        log::debug!("render queue: reclaimed descriptor table ({draws} slots)");
    }

    // ── Introspection ───────────────────────────────────────────

    /// The ids queued in `category`, in current order.
    pub fn queue(&self, category: QueueCategory) -> &[DrawId] {
        self.bins[category.index()].ids(&self.arena)
    }

    /// Number of entries queued in `category`.
    pub fn queue_count(&self, category: QueueCategory) -> usize {
        self.bins[category.index()].len()
    }

    /// Descriptors registered this frame.
    pub fn draw_count(&self) -> usize {
        self.infos.len()
    }

    /// Snapshot of bin sizes and arena usage.
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            draws: self.infos.len(),
            queued: self.bins.map(|bin| bin.len()),
            bin_capacity: self.bins.map(|bin| bin.capacity()),
            arena: self.arena.stats(),
        }
    }
}

impl<C: CommandStream> RenderQueue<C> {
    /// Dispatch `range` of `category`'s (sorted) bin.
    ///
    /// Each maximal run of equal instance keys is drawn with one call to
    /// the run's callback. When `state` is given it is restored onto `cmd`
    /// before every run.
    ///
    /// # Panics
    ///
    /// If `range` extends past the bin, if a dispatched descriptor has a
    /// zero sorting or instance key, or if two descriptors in one run have
    /// different callbacks.
    pub fn dispatch_range(
        &self,
        category: QueueCategory,
        cmd: &mut C,
        state: Option<&C::SavedState>,
        range: Range<usize>,
    ) {
        let ids = self.queue(category);
        assert!(
            range.start <= range.end && range.end <= ids.len(),
            "dispatch range {range:?} out of bounds for {category} bin of {}",
            ids.len()
        );

        let mut i = range.start;
        while i < range.end {
            let head = &self.infos[ids[i].index()];
            check_keys(ids[i], head);

            if let Some(state) = state {
                cmd.restore_state(state);
            }

            let mut instances = 1;
            while i + instances < range.end {
                let id = ids[i + instances];
                let next = &self.infos[id.index()];
                if next.instance_key != head.instance_key {
                    break;
                }
                check_keys(id, next);
                assert!(
                    next.same_renderer(head),
                    "{id} shares instance key {:#x} with {} but has a different callback",
                    head.instance_key,
                    ids[i]
                );
                instances += 1;
            }

            let batch = RenderBatch::new(&self.infos, &ids[i..i + instances], &self.arena);
            (head.render)(cmd, &batch);
            i += instances;
        }
    }

    /// Dispatch the whole of `category`'s bin.
    pub fn dispatch(&self, category: QueueCategory, cmd: &mut C, state: Option<&C::SavedState>) {
        self.dispatch_range(category, cmd, state, 0..self.queue_count(category));
    }
}

fn check_keys<C>(id: DrawId, info: &RenderInfo<C>) {
    assert!(info.instance_key != 0, "{id} dispatched with a zero instance key");
    assert!(info.sorting_key != 0, "{id} dispatched with a zero sorting key");
}

impl<C> Default for RenderQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}
