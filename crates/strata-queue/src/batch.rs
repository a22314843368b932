//! The view a draw callback receives.

use bytemuck::Pod;
use strata_arena::Arena;

use crate::error::QueueError;
use crate::info::{DrawId, RenderInfo};

/// A contiguous run of descriptors sharing one instance key.
///
/// Dispatch builds one `RenderBatch` per run and hands it to the run's
/// callback. The batch borrows the queue's descriptor table and arena, so
/// callbacks can read every instance's payload without copying.
pub struct RenderBatch<'a, C> {
    infos: &'a [RenderInfo<C>],
    ids: &'a [DrawId],
    arena: &'a Arena,
}

impl<'a, C> RenderBatch<'a, C> {
    /// `ids` must be non-empty and index into `infos`.
    pub(crate) fn new(infos: &'a [RenderInfo<C>], ids: &'a [DrawId], arena: &'a Arena) -> Self {
        debug_assert!(!ids.is_empty());
        Self { infos, ids, arena }
    }

    /// Number of instances in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false for batches built by dispatch.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The descriptor ids in dispatch order.
    pub fn ids(&self) -> &'a [DrawId] {
        self.ids
    }

    /// The run's first descriptor.
    pub fn first(&self) -> &'a RenderInfo<C> {
        self.info(0)
    }

    /// The instance key shared by every descriptor in the batch.
    pub fn instance_key(&self) -> u64 {
        self.first().instance_key
    }

    /// The `i`th descriptor.
    ///
    /// # Panics
    ///
    /// If `i >= self.len()`.
    pub fn info(&self, i: usize) -> &'a RenderInfo<C> {
        &self.infos[self.ids[i].index()]
    }

    /// Descriptors in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &'a RenderInfo<C>> + 'a {
        let infos = self.infos;
        self.ids.iter().map(move |id| &infos[id.index()])
    }

    /// The `i`th descriptor's payload viewed as `T`.
    pub fn payload<T: Pod>(&self, i: usize) -> Result<&'a T, QueueError> {
        let id = self.ids[i];
        let alloc = self.infos[id.index()]
            .payload
            .ok_or(QueueError::MissingPayload { id })?;
        Ok(self.arena.get::<T>(alloc)?)
    }

    /// Every payload in the batch, in dispatch order.
    pub fn payloads<T: Pod>(&self) -> impl Iterator<Item = Result<&'a T, QueueError>> + '_ {
        (0..self.len()).map(move |i| self.payload::<T>(i))
    }

    /// The arena holding the payloads.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }
}
