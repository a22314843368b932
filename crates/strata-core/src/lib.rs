//! Core types and traits for the Strata draw batcher.
//!
//! This is the leaf crate with no internal dependencies. It defines the
//! vocabulary shared by the arena and the render queue: queue categories,
//! static layers, pipeline/instance hashing, and the two boundary traits
//! through which the batcher talks to the rest of a renderer.
//!
//! # Boundaries
//!
//! - [`CommandStream`]: the graphics command buffer that draw callbacks
//!   record into. The batcher only ever asks it to restore a saved state.
//! - [`ViewParameters`]: the camera, consulted only to derive a
//!   view-relative depth for sort keys.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod category;
pub mod hash;
pub mod traits;
pub mod view;

pub use category::{QueueCategory, StaticLayer};
pub use hash::{Hash, Hasher};
pub use traits::{CommandStream, ViewParameters};
pub use view::RenderParameters;
