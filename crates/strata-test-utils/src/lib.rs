//! Test utilities and mock types for Strata development.
//!
//! Provides a mock [`CommandStream`] ([`RecordingStream`]) that records
//! every batch it is handed, canned draw callbacks that record into it,
//! and deterministic scene fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use indexmap::IndexMap;
use smallvec::SmallVec;
use strata_core::{CommandStream, Hash};
use strata_queue::{DrawId, RenderBatch};

use crate::fixtures::SpriteInstance;

/// State captured and restored around batches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamState {
    pub pipeline: Hash,
    pub viewport: [u32; 4],
}

/// One callback invocation as seen by the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    /// Which canned callback issued the call.
    pub renderer: &'static str,
    pub instance_key: u64,
    pub sorting_keys: SmallVec<[u64; 8]>,
    pub ids: SmallVec<[DrawId; 8]>,
}

impl DrawCall {
    /// Instances drawn by this call.
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

/// Mock implementation of [`CommandStream`].
///
/// Records every batch, counts state restores, and keeps the last
/// restored state. Sprite callbacks also log each instance's payload.
#[derive(Debug, Default)]
pub struct RecordingStream {
    pub state: StreamState,
    pub restores: usize,
    pub sprites: Vec<SpriteInstance>,
    calls: Vec<DrawCall>,
}

impl RecordingStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call for `batch`.
    pub fn record(&mut self, renderer: &'static str, batch: &RenderBatch<'_, Self>) {
        self.calls.push(DrawCall {
            renderer,
            instance_key: batch.instance_key(),
            sorting_keys: batch.iter().map(|info| info.sorting_key).collect(),
            ids: batch.ids().iter().copied().collect(),
        });
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Instances drawn across every call.
    pub fn instance_count(&self) -> usize {
        self.calls.iter().map(DrawCall::count).sum()
    }

    /// Sorting keys in the order they reached the stream.
    pub fn sorting_keys(&self) -> Vec<u64> {
        self.calls
            .iter()
            .flat_map(|call| call.sorting_keys.iter().copied())
            .collect()
    }

    /// Call count per renderer, in first-seen order.
    pub fn calls_per_renderer(&self) -> IndexMap<&'static str, usize> {
        let mut counts = IndexMap::new();
        for call in &self.calls {
            *counts.entry(call.renderer).or_insert(0) += 1;
        }
        counts
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.sprites.clear();
        self.restores = 0;
    }
}

impl CommandStream for RecordingStream {
    type SavedState = StreamState;

    fn restore_state(&mut self, state: &StreamState) {
        self.state = *state;
        self.restores += 1;
    }
}

// ── Canned callbacks ─────────────────────────────────────────

/// Records the batch as `"mesh"`.
pub fn draw_mesh(cmd: &mut RecordingStream, batch: &RenderBatch<'_, RecordingStream>) {
    cmd.record("mesh", batch);
}

/// Records the batch as `"light"`.
pub fn draw_light(cmd: &mut RecordingStream, batch: &RenderBatch<'_, RecordingStream>) {
    cmd.record("light", batch);
}

/// Records the batch as `"sprite"` and logs every instance's
/// [`SpriteInstance`] payload.
///
/// # Panics
///
/// If an instance has no payload or a payload of another type.
pub fn draw_sprite(cmd: &mut RecordingStream, batch: &RenderBatch<'_, RecordingStream>) {
    for sprite in batch.payloads::<SpriteInstance>() {
        cmd.sprites
            .push(*sprite.expect("sprite draws carry a SpriteInstance payload"));
    }
    cmd.record("sprite", batch);
}
