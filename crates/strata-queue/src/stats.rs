//! Point-in-time render queue statistics.

use strata_arena::ArenaStats;
use strata_core::QueueCategory;

/// Snapshot of a [`RenderQueue`](crate::RenderQueue)'s contents and memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Descriptors registered this frame, enqueued or not.
    pub draws: usize,
    /// Entries per bin, indexed by [`QueueCategory::index`].
    pub queued: [usize; QueueCategory::COUNT],
    /// Capacity of each bin's current id array.
    pub bin_capacity: [usize; QueueCategory::COUNT],
    /// The backing arena.
    pub arena: ArenaStats,
}

impl QueueStats {
    /// Entries across every bin.
    pub fn total_queued(&self) -> usize {
        self.queued.iter().sum()
    }
}
