//! Boundary traits for the command stream and the camera.

use glam::Vec3;

/// The graphics command stream that draw callbacks record into.
///
/// The batcher never issues GPU work itself. It borrows the stream for
/// the duration of a dispatch, optionally restores a saved state before
/// each batch, and hands the stream to each batch's draw callback.
pub trait CommandStream {
    /// A captured snapshot of stream state (bound pipeline, viewport,
    /// descriptor sets, ...).
    type SavedState;

    /// Reapply a previously captured snapshot.
    fn restore_state(&mut self, state: &Self::SavedState);
}

/// Camera parameters used to derive a view-relative depth.
///
/// Implemented by [`RenderParameters`](crate::RenderParameters); renderers
/// with their own camera type can implement it directly.
pub trait ViewParameters {
    /// World-space camera position.
    fn camera_position(&self) -> Vec3;

    /// World-space forward axis. Expected to be normalised.
    fn camera_front(&self) -> Vec3;

    /// Signed distance of `center` along the forward axis.
    ///
    /// Negative for points behind the camera.
    fn view_depth(&self, center: Vec3) -> f32 {
        self.camera_front().dot(center - self.camera_position())
    }
}
