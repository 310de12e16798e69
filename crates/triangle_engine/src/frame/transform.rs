//! Projection and model-view for one frame

use crate::foundation::math::{constants::FULL_TURN_DEGREES, Mat4, Mat4Ext};

/// Near plane handed to the orthographic projection
pub const ORTHO_NEAR: f32 = 1.0;

/// Far plane handed to the orthographic projection (behind near, flipping depth)
pub const ORTHO_FAR: f32 = -1.0;

/// Rotation angle in degrees at `seconds`, wrapped into `[0, 360)`
///
/// The product is wrapped in f64 before narrowing so precision does not
/// degrade as the clock grows. Narrowing can round up to 360, which is folded
/// back to 0.
#[allow(clippy::cast_possible_truncation)]
pub fn rotation_degrees(seconds: f64, degrees_per_second: f64) -> f32 {
    let angle = (seconds * degrees_per_second).rem_euclid(FULL_TURN_DEGREES) as f32;
    if angle >= FULL_TURN_DEGREES as f32 {
        0.0
    } else {
        angle
    }
}

/// Projection and model-view matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Orthographic over `[-aspect, aspect] x [-1, 1]`
    pub projection: Mat4,
    /// Rotation about +Z
    pub model_view: Mat4,
}

impl FrameTransform {
    /// Build the transform for a frame with the given aspect ratio and angle
    pub fn new(aspect_ratio: f32, rotation_degrees: f32) -> Self {
        Self {
            projection: Mat4::orthographic(
                -aspect_ratio,
                aspect_ratio,
                -1.0,
                1.0,
                ORTHO_NEAR,
                ORTHO_FAR,
            ),
            model_view: Mat4::rotation_z_degrees(rotation_degrees),
        }
    }

    /// `projection * model_view` in OpenGL clip conventions
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.model_view
    }

    /// [`mvp`](Self::mvp) corrected for Vulkan's clip space
    pub fn vulkan_mvp(&self) -> Mat4 {
        Mat4::vulkan_clip_correction() * self.mvp()
    }
}
