//! Benchmark profiles and utilities for the Strata draw batcher.
//!
//! Provides pre-built [`SceneProfile`]s for benchmarking:
//!
//! - [`reference_profile`]: 10K draws over 16 pipelines and 32 meshes
//! - [`stress_profile`]: 200K draws, with a larger arena block so bins fit
//! - [`generate_scene`]: deterministic object placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use glam::Vec3;
use strata_arena::ArenaConfig;
use strata_core::{CommandStream, Hash, Hasher, QueueCategory, StaticLayer, ViewParameters};
use strata_queue::{
    sort_key, QueueConfig, QueueError, RenderBatch, RenderFn, RenderInfo, RenderQueue,
};

/// Shape of a generated frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneProfile {
    /// Draws per frame.
    pub objects: usize,
    /// Distinct pipeline states.
    pub pipelines: u32,
    /// Distinct meshes per pipeline.
    pub meshes: u32,
    /// Fraction of draws in the transparent category.
    pub transparent_ratio: f32,
    /// Arena block size for the profile's queues.
    pub block_size: usize,
}

impl SceneProfile {
    /// Queue configuration sized for this profile.
    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            arena: ArenaConfig::new(self.block_size),
            ..QueueConfig::default()
        }
    }
}

/// 10K draws: a typical scene.
pub fn reference_profile() -> SceneProfile {
    SceneProfile {
        objects: 10_000,
        pipelines: 16,
        meshes: 32,
        transparent_ratio: 0.2,
        block_size: ArenaConfig::DEFAULT_BLOCK_SIZE,
    }
}

/// 200K draws. Needs 2 MiB blocks: a bin's id array must fit one block.
pub fn stress_profile() -> SceneProfile {
    SceneProfile {
        objects: 200_000,
        pipelines: 64,
        meshes: 64,
        transparent_ratio: 0.2,
        block_size: 2 * 1024 * 1024,
    }
}

/// One generated draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BenchObject {
    pub category: QueueCategory,
    pub pipeline: Hash,
    pub instance_key: u64,
    pub center: Vec3,
}

/// Generate a deterministic scene for `profile`.
///
/// Positions fill a box in front of a camera at the origin looking down
/// -Z. Of the draws that are not transparent, every sixteenth is a light,
/// every other eighth is opaque-emissive, and the rest are opaque.
pub fn generate_scene(profile: &SceneProfile, seed: u64) -> Vec<BenchObject> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };
    let transparent_cut = (profile.transparent_ratio.clamp(0.0, 1.0) * 1024.0) as u64;

    (0..profile.objects)
        .map(|i| {
            let category = if next() % 1024 < transparent_cut {
                QueueCategory::Transparent
            } else if i % 16 == 0 {
                QueueCategory::Light
            } else if i % 8 == 0 {
                QueueCategory::OpaqueEmissive
            } else {
                QueueCategory::Opaque
            };
            let pipeline_index = (next() % u64::from(profile.pipelines.max(1))) as u32;
            let mesh = (next() % u64::from(profile.meshes.max(1))) as u32;

            let mut h = Hasher::new();
            h.u32(pipeline_index);
            let pipeline = h.get();
            h.u32(mesh);
            h.u32(category.index() as u32);
            let instance_key = h.get().max(1);

            let unit = |v: u64| (v % 10_000) as f32 / 10_000.0;
            let center = Vec3::new(
                unit(next()) * 200.0 - 100.0,
                unit(next()) * 200.0 - 100.0,
                -unit(next()) * 500.0,
            );
            BenchObject {
                category,
                pipeline,
                instance_key,
                center,
            }
        })
        .collect()
}

/// Command stream that counts what it is asked to draw.
#[derive(Debug, Default)]
pub struct NullStream {
    pub draws: u64,
    pub instances: u64,
    pub restores: u64,
}

impl CommandStream for NullStream {
    type SavedState = ();

    fn restore_state(&mut self, _: &()) {
        self.restores += 1;
    }
}

/// Draw callback for [`NullStream`].
pub fn draw_null(cmd: &mut NullStream, batch: &RenderBatch<'_, NullStream>) {
    cmd.draws += 1;
    cmd.instances += batch.len() as u64;
}

/// Submit every object to `queue`, keyed against `view`.
pub fn fill_queue<V: ViewParameters>(
    queue: &mut RenderQueue<NullStream>,
    view: &V,
    objects: &[BenchObject],
) -> Result<(), QueueError> {
    for object in objects {
        let key = sort_key(
            view,
            object.category,
            object.pipeline,
            object.center,
            StaticLayer::Default,
        );
        let render = draw_null as RenderFn<NullStream>;
        let info = RenderInfo::new(key.max(1), object.instance_key, render);
        queue.submit(object.category, info)?;
    }
    Ok(())
}

/// Sort then dispatch every category.
pub fn render_frame(queue: &mut RenderQueue<NullStream>, cmd: &mut NullStream) {
    queue.sort();
    for category in QueueCategory::ALL {
        queue.dispatch(category, cmd, Some(&()));
    }
}
