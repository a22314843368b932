//! Plain camera parameters.

use glam::Vec3;

use crate::traits::ViewParameters;

/// Per-frame camera parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderParameters {
    /// World-space camera position.
    pub camera_position: Vec3,
    /// Normalised world-space forward axis.
    pub camera_front: Vec3,
}

impl RenderParameters {
    /// Camera at `position` looking along `front`.
    ///
    /// `front` is normalised here; a zero vector stays zero, which makes
    /// every depth zero.
    pub fn new(position: Vec3, front: Vec3) -> Self {
        Self {
            camera_position: position,
            camera_front: front.normalize_or_zero(),
        }
    }

    /// Camera at `eye` looking at `target`.
    pub fn look_at(eye: Vec3, target: Vec3) -> Self {
        Self::new(eye, target - eye)
    }
}

impl Default for RenderParameters {
    /// Camera at the origin looking down -Z.
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

impl ViewParameters for RenderParameters {
    fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    fn camera_front(&self) -> Vec3 {
        self.camera_front
    }
}
