//! Block-chained bump arena for per-frame draw data.
//!
//! Provides a bump allocator over a chain of fixed-capacity blocks.
//! Resetting the arena only rewinds cursors, so after the first few
//! frames no block is ever created or freed: the chain grows to the
//! frame's high-water mark and is then reused.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── Block[] (fixed capacity, 16-byte aligned, bump cursor each)
//! ├── current (index of the block being filled)
//! └── generation (bumped on every reset; stamps each Allocation)
//! ```
//!
//! Allocations are addressed by [`Allocation`] handles rather than raw
//! pointers. A handle is valid until the next reset; using it afterwards
//! is reported as [`ArenaError::StaleAllocation`] instead of reading
//! another frame's bytes.
//!
//! Typed access goes through `bytemuck`, so only [`bytemuck::Pod`] data
//! can be stored.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod block;
pub mod config;
pub mod error;
pub mod handle;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats};
pub use block::{Block, BLOCK_ALIGN};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::Allocation;
