//! Render queues for the Strata draw batcher.
//!
//! Producers register [`RenderInfo`] descriptors and append them to
//! per-category bins. At render time each bin is stably sorted by its
//! 64-bit sort key and dispatched: contiguous descriptors sharing an
//! instance key become one call to their draw callback, which receives
//! the whole run as a [`RenderBatch`].
//!
//! # Architecture
//!
//! ```text
//! RenderQueue<C>
//! ├── Arena (payloads + bin id arrays, reset per frame)
//! ├── Vec<RenderInfo<C>> (descriptor table, indexed by DrawId)
//! └── QueueBin[QueueCategory::COUNT] (DrawId arrays, doubling growth)
//! ```
//!
//! Sort keys are built with [`background_sort_key`], [`sprite_sort_key`]
//! and [`sort_key()`]; the bit layouts are documented in the
//! [`sort_key`](mod@sort_key) module.
//!
//! Queues built on separate threads are merged into one with
//! [`RenderQueue::combine_render_info`] before sorting.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
mod bin;
pub mod config;
pub mod error;
pub mod info;
pub mod queue;
pub mod sort_key;
pub mod stats;

pub use batch::RenderBatch;
pub use config::QueueConfig;
pub use error::QueueError;
pub use info::{DrawId, RenderFn, RenderInfo};
pub use queue::RenderQueue;
pub use sort_key::{background_sort_key, sort_key, sprite_sort_key};
pub use stats::QueueStats;
