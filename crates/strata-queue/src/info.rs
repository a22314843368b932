//! Draw descriptors and their identifiers.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use strata_arena::Allocation;

use crate::batch::RenderBatch;

/// Index of a descriptor in a queue's frame-local descriptor table.
///
/// Bins store `DrawId`s rather than descriptors, so sorting moves 4-byte
/// values and duplicates share one descriptor. Ids are only meaningful to
/// the queue that issued them and only until its next reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct DrawId(pub u32);

impl DrawId {
    /// Position in the descriptor table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw#{}", self.0)
    }
}

/// Draw callback: submits one batch of instances to the command stream.
///
/// Called once per run of equal instance keys; `batch` covers the whole
/// run and is never empty.
pub type RenderFn<C> = fn(&mut C, &RenderBatch<'_, C>);

/// One drawable unit.
///
/// `sorting_key` orders dispatch; `instance_key` groups adjacent
/// descriptors into one instanced call. Both must be nonzero by the time
/// the descriptor is dispatched, and descriptors sharing an instance key
/// must share `render`.
pub struct RenderInfo<C> {
    /// Ascending dispatch order. Zero is reserved for "not computed".
    pub sorting_key: u64,
    /// Batch identity. Zero is reserved.
    pub instance_key: u64,
    /// Callback that performs the draw.
    pub render: RenderFn<C>,
    /// Per-draw data in the owning queue's arena.
    pub payload: Option<Allocation>,
}

impl<C> RenderInfo<C> {
    /// A descriptor without payload.
    pub fn new(sorting_key: u64, instance_key: u64, render: RenderFn<C>) -> Self {
        Self {
            sorting_key,
            instance_key,
            render,
            payload: None,
        }
    }

    /// Attach per-draw data allocated from the owning queue's arena.
    pub fn with_payload(mut self, payload: Allocation) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether both descriptors invoke the same callback.
    #[inline]
    pub fn same_renderer(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.render, other.render)
    }
}

// Manual impls: a derive would demand `C: Clone`/`C: Debug`, but `C` only
// appears behind a function pointer.
impl<C> Clone for RenderInfo<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for RenderInfo<C> {}

impl<C> fmt::Debug for RenderInfo<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderInfo")
            .field("sorting_key", &format_args!("{:#018x}", self.sorting_key))
            .field("instance_key", &format_args!("{:#018x}", self.instance_key))
            .field("render", &(self.render as *const ()))
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stream(u32);

    fn draw_a(s: &mut Stream, _: &RenderBatch<'_, Stream>) {
        s.0 += 1;
    }

    fn draw_b(s: &mut Stream, _: &RenderBatch<'_, Stream>) {
        s.0 += 2;
    }

    #[test]
    fn same_renderer_compares_callbacks() {
        let a = RenderInfo::new(1, 1, draw_a as RenderFn<Stream>);
        let a2 = RenderInfo::new(2, 1, draw_a as RenderFn<Stream>);
        let b = RenderInfo::new(1, 1, draw_b as RenderFn<Stream>);
        assert!(a.same_renderer(&a2));
        assert!(!a.same_renderer(&b));
    }

    #[test]
    fn copy_without_stream_bounds() {
        let a = RenderInfo::new(3, 4, draw_a as RenderFn<Stream>);
        let b = a;
        assert_eq!(a.sorting_key, b.sorting_key);
        assert!(b.payload.is_none());
    }

    #[test]
    fn debug_shows_keys_in_hex() {
        let a = RenderInfo::new(0x10, 0x20, draw_a as RenderFn<Stream>);
        let text = format!("{a:?}");
        assert!(text.contains("0x0000000000000010"));
        assert!(text.contains("0x0000000000000020"));
    }

    #[test]
    fn draw_id_display_and_index() {
        assert_eq!(DrawId(7).index(), 7);
        assert_eq!(DrawId(7).to_string(), "draw#7");
        assert_eq!(bytemuck::bytes_of(&DrawId(1)).len(), 4);
    }
}
