//! Deterministic scene fixtures.
//!
//! - [`Lcg`]: seedable generator, no external RNG.
//! - [`scene`]: a mix of opaque, emissive, light, and transparent objects
//!   drawn from small pipeline and mesh pools so batches form.
//! - [`submit_object`] / [`build_queue`]: turn objects into descriptors
//!   the way a renderer's producer would.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use strata_core::{Hash, Hasher, QueueCategory, StaticLayer, ViewParameters};
use strata_queue::{sort_key, DrawId, QueueError, RenderFn, RenderInfo, RenderQueue};

use crate::{draw_light, draw_mesh, draw_sprite, RecordingStream};

/// Per-instance payload for transparent sprites.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SpriteInstance {
    pub position: [f32; 3],
    pub color: u32,
}

/// 64-bit linear congruential generator.
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x9e37_79b9_7f4a_7c15)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    /// Uniform in `0..n`.
    pub fn below(&mut self, n: u64) -> u64 {
        (self.next_u64() >> 33) % n
    }

    /// Uniform in `[lo, hi)`.
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        let unit = (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        lo + unit * (hi - lo)
    }
}

/// One thing to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub category: QueueCategory,
    pub pipeline: Hash,
    pub mesh: u32,
    pub center: Vec3,
    pub layer: StaticLayer,
    pub color: u32,
}

impl SceneObject {
    /// Identity of the instanced batch this object can join.
    pub fn instance_key(&self) -> u64 {
        let mut h = Hasher::with_seed(self.pipeline);
        h.u32(self.mesh);
        h.u32(self.category.index() as u32);
        h.get().max(1)
    }

    /// The callback for this object's category.
    pub fn renderer(&self) -> RenderFn<RecordingStream> {
        match self.category {
            QueueCategory::Opaque | QueueCategory::OpaqueEmissive => draw_mesh,
            QueueCategory::Light => draw_light,
            QueueCategory::Transparent => draw_sprite,
        }
    }
}

/// Hash for the `n`th fixture pipeline.
pub fn pipeline_hash(n: u32) -> Hash {
    let mut h = Hasher::new();
    h.string("fixture-pipeline");
    h.u32(n);
    h.get()
}

/// `count` objects scattered in front of and around a camera at the
/// origin looking down -Z. Roughly one in ten lands behind the camera.
pub fn scene(seed: u64, count: usize) -> Vec<SceneObject> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|_| {
            let category = match rng.below(10) {
                0..=4 => QueueCategory::Opaque,
                5 => QueueCategory::OpaqueEmissive,
                6 => QueueCategory::Light,
                _ => QueueCategory::Transparent,
            };
            let layer = match rng.below(8) {
                0 => StaticLayer::Front,
                1 => StaticLayer::Back,
                _ => StaticLayer::Default,
            };
            SceneObject {
                category,
                pipeline: pipeline_hash(rng.below(4) as u32),
                mesh: rng.below(3) as u32,
                center: Vec3::new(
                    rng.range_f32(-50.0, 50.0),
                    rng.range_f32(-50.0, 50.0),
                    rng.range_f32(-200.0, 20.0),
                ),
                layer,
                color: rng.next_u64() as u32,
            }
        })
        .collect()
}

/// Register `object` with `queue`, keyed against `view`.
///
/// Transparent objects carry a [`SpriteInstance`] payload.
pub fn submit_object<V: ViewParameters>(
    queue: &mut RenderQueue<RecordingStream>,
    view: &V,
    object: &SceneObject,
) -> Result<DrawId, QueueError> {
    let key = sort_key(
        view,
        object.category,
        object.pipeline,
        object.center,
        object.layer,
    )
    .max(1);
    let mut info = RenderInfo::new(key, object.instance_key(), object.renderer());
    if object.category.is_transparent() {
        let sprite = SpriteInstance {
            position: object.center.to_array(),
            color: object.color,
        };
        info = info.with_payload(queue.alloc_value(sprite)?);
    }
    queue.submit(object.category, info)
}

/// A fresh queue holding every object.
pub fn build_queue<V: ViewParameters>(
    view: &V,
    objects: &[SceneObject],
) -> Result<RenderQueue<RecordingStream>, QueueError> {
    let mut queue = RenderQueue::new();
    for object in objects {
        submit_object(&mut queue, view, object)?;
    }
    Ok(queue)
}
