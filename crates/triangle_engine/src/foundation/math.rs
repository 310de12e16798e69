//! Math utilities and types
//!
//! Matrix builders mirroring the fixed-function calls of the classic GLFW
//! sample (`glOrtho`, `glRotatef`), plus the correction needed to feed
//! OpenGL-convention clip space to Vulkan.

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// Full turn in degrees
    pub const FULL_TURN_DEGREES: f64 = 360.0;
}

/// Extension trait for Mat4 with the builders the frame loop needs
pub trait Mat4Ext {
    /// Rotation about the +Z axis, angle in degrees (same handedness as `glRotatef`)
    fn rotation_z_degrees(degrees: f32) -> Mat4;

    /// Orthographic projection with `glOrtho` semantics
    ///
    /// `near` and `far` are distances along -Z, so `near > far` is legal and
    /// simply flips the depth mapping. No argument validation happens here;
    /// callers must not pass `left == right`, `bottom == top` or `near == far`.
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Maps OpenGL clip space to Vulkan clip space
    ///
    /// Flips Y (Vulkan's framebuffer Y points down) and remaps depth from
    /// [-1, 1] to [0, 1].
    fn vulkan_clip_correction() -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_z_degrees(degrees: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), degrees * constants::DEG_TO_RAD)
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        #[rustfmt::skip]
        let matrix = Mat4::new(
            2.0 / width, 0.0,          0.0,          -(right + left) / width,
            0.0,         2.0 / height, 0.0,          -(top + bottom) / height,
            0.0,         0.0,          -2.0 / depth, -(far + near) / depth,
            0.0,         0.0,          0.0,          1.0,
        );
        matrix
    }

    fn vulkan_clip_correction() -> Mat4 {
        #[rustfmt::skip]
        let matrix = Mat4::new(
            1.0,  0.0, 0.0, 0.0,
            0.0, -1.0, 0.0, 0.0,
            0.0,  0.0, 0.5, 0.5,
            0.0,  0.0, 0.0, 1.0,
        );
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_orthographic_matches_gl_ortho() {
        let ratio = 800.0 / 600.0;
        let m = Mat4::orthographic(-ratio, ratio, -1.0, 1.0, 1.0, -1.0);

        assert_relative_eq!(m[(0, 0)], 1.0 / ratio);
        assert_relative_eq!(m[(1, 1)], 1.0);
        // Inverted near/far keeps z unchanged
        assert_relative_eq!(m[(2, 2)], 1.0);
        assert_relative_eq!(m[(2, 3)], 0.0);
        assert_relative_eq!(m[(0, 3)], 0.0);
        assert_relative_eq!(m[(3, 3)], 1.0);
    }

    #[test]
    fn test_orthographic_maps_edges_to_ndc() {
        let m = Mat4::orthographic(-2.0, 2.0, -1.0, 1.0, 1.0, -1.0);
        let corner = m.transform_point(&Point3::new(2.0, 1.0, 0.0));
        assert_relative_eq!(corner.x, 1.0);
        assert_relative_eq!(corner.y, 1.0);
        assert_relative_eq!(corner.z, 0.0);
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Mat4::rotation_z_degrees(90.0);
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_clip_correction_flips_y_and_remaps_depth() {
        let m = Mat4::vulkan_clip_correction();
        let top_near = m.transform_point(&Point3::new(0.0, 1.0, -1.0));
        assert_relative_eq!(top_near.y, -1.0);
        assert_relative_eq!(top_near.z, 0.0);

        let far = m.transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(far.z, 1.0);
    }
}
