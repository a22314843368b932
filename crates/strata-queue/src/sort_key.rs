//! 64-bit sort-key encoding.
//!
//! A sort key packs everything that decides draw order into one integer
//! so a queue sorts with a single comparison per pair. Two layouts exist:
//!
//! ```text
//! opaque-like:  | layer:2 | pipeline:32 | depth>>2:30 |
//! transparent:  |      !depth:32        | pipeline:32 |
//! ```
//!
//! Opaque geometry groups by pipeline first to minimise state changes and
//! uses depth only inside a pipeline. Transparent geometry must blend back
//! to front, so inverted depth dominates and pipeline only breaks ties.
//! The bit positions encode the tie-break priority; changing them changes
//! the ordering guarantees tested below.

use glam::Vec3;
use strata_core::{Hash, QueueCategory, StaticLayer, ViewParameters};

const LOW_32: u64 = 0xffff_ffff;

/// Key for background elements that have no meaningful depth.
///
/// Transparent: only the low 32 bits of the pipeline hash, so background
/// blends sort ahead of every depth-keyed transparent draw while staying
/// grouped by pipeline. Note that a pipeline hash with zero low bits
/// yields a zero key, which dispatch rejects.
///
/// Everything else: the upper 32 bits set, so the element sorts after all
/// default-layer geometry but is still grouped by pipeline.
pub fn background_sort_key(category: QueueCategory, pipeline_hash: Hash) -> u64 {
    if category.is_transparent() {
        pipeline_hash & LOW_32
    } else {
        (u64::MAX << 32) | (pipeline_hash & LOW_32)
    }
}

/// Depth-aware key for a draw at view depth `z`.
///
/// `z` is clamped to `+0.0` when it is not strictly positive (negative
/// depths, `-0.0`, and NaN all collapse to the same minimum key), then
/// reinterpreted as its IEEE-754 bit pattern, which orders non-negative
/// floats the same way the floats themselves order.
///
/// `layer` only affects non-transparent categories.
pub fn sprite_sort_key(
    category: QueueCategory,
    pipeline_hash: Hash,
    z: f32,
    layer: StaticLayer,
) -> u64 {
    let z = if z > 0.0 { z } else { 0.0 };
    let depth_key = u64::from(z.to_bits());

    if category.is_transparent() {
        // Back to front: larger depth sorts first.
        let depth_key = !depth_key & LOW_32;
        (depth_key << 32) | (pipeline_hash & LOW_32)
    } else {
        let depth_key = depth_key >> 2;
        let pipeline = pipeline_hash & LOW_32;
        (layer.bits() << 62) | (pipeline << 30) | depth_key
    }
}

/// Depth-aware key for a draw centred at `center`, with depth measured
/// along the camera's forward axis.
pub fn sort_key<V: ViewParameters + ?Sized>(
    view: &V,
    category: QueueCategory,
    pipeline_hash: Hash,
    center: Vec3,
    layer: StaticLayer,
) -> u64 {
    let z = view.view_depth(center);
    sprite_sort_key(category, pipeline_hash, z, layer)
}
