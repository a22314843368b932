//! Strata: the per-frame draw-command batching core of a real-time renderer.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Strata sub-crates. For most users, adding `strata` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // The renderer's command buffer. Strata only ever restores its state.
//! #[derive(Default)]
//! struct Commands {
//!     draws: Vec<(u64, usize)>,
//! }
//!
//! impl CommandStream for Commands {
//!     type SavedState = ();
//!     fn restore_state(&mut self, _: &()) {}
//! }
//!
//! fn draw_instanced(cmd: &mut Commands, batch: &RenderBatch<'_, Commands>) {
//!     cmd.draws.push((batch.instance_key(), batch.len()));
//! }
//!
//! let camera = RenderParameters::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
//! let pipeline = {
//!     let mut h = Hasher::new();
//!     h.string("lit-opaque");
//!     h.get()
//! };
//!
//! let mut queue = RenderQueue::new();
//! for x in 0..3 {
//!     let center = Vec3::new(x as f32, 0.0, 0.0);
//!     let key = sort_key(&camera, QueueCategory::Opaque, pipeline, center, StaticLayer::Default);
//!     let info = RenderInfo::new(key, pipeline, draw_instanced as RenderFn<Commands>);
//!     queue.submit(QueueCategory::Opaque, info).unwrap();
//! }
//!
//! queue.sort();
//! let mut cmd = Commands::default();
//! queue.dispatch(QueueCategory::Opaque, &mut cmd, None);
//! assert_eq!(cmd.draws, vec![(pipeline, 3)]);
//!
//! queue.reset();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | Queue categories, static layers, hashing, boundary traits |
//! | [`arena`] | `strata-arena` | Block-chained bump arena and allocation handles |
//! | [`queue`] | `strata-queue` | Sort keys, descriptors, render queues, dispatch |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and boundary traits (`strata-core`).
///
/// Contains [`types::QueueCategory`], [`types::StaticLayer`], the
/// [`types::Hasher`] used for pipeline and instance keys, and the
/// [`types::CommandStream`] and [`types::ViewParameters`] traits.
pub use strata_core as types;

/// Block-chained bump arena (`strata-arena`).
///
/// Most users reach the arena through a render queue; use this module
/// directly for [`arena::ArenaConfig`] and [`arena::ArenaStats`].
pub use strata_arena as arena;

/// Sort keys, descriptors, and render queues (`strata-queue`).
pub use strata_queue as queue;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use strata_core::{
        CommandStream, Hash, Hasher, QueueCategory, RenderParameters, StaticLayer, ViewParameters,
    };

    // Arena
    pub use strata_arena::{Allocation, ArenaConfig};

    // Queue
    pub use strata_queue::{
        background_sort_key, sort_key, sprite_sort_key, DrawId, QueueConfig, QueueError,
        RenderBatch, RenderFn, RenderInfo, RenderQueue,
    };

    // Math
    pub use glam::Vec3;
}
