//! Per-frame viewport and aspect ratio

/// Pixel rectangle the frame is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Top edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Viewport and aspect ratio for one frame
///
/// Rebuilt from the framebuffer size every frame; nothing here outlives the
/// frame it was computed for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// Always `(0, 0, width, height)` of the framebuffer
    pub viewport: Viewport,
    /// `width / max(height, 1)`
    pub aspect_ratio: f32,
}

impl FrameGeometry {
    /// Derive the geometry for a framebuffer of `width` x `height` pixels
    ///
    /// A zero height is clamped to 1 for the ratio so minimized windows never
    /// divide by zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_framebuffer(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport {
                x: 0,
                y: 0,
                width,
                height,
            },
            aspect_ratio: width as f32 / height.max(1) as f32,
        }
    }

    /// Whether there is anything to render into
    pub const fn is_drawable(&self) -> bool {
        self.viewport.width > 0 && self.viewport.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_geometry() {
        let geometry = FrameGeometry::from_framebuffer(640, 480);
        assert_eq!(
            geometry.viewport,
            Viewport {
                x: 0,
                y: 0,
                width: 640,
                height: 480
            }
        );
        assert_eq!(geometry.aspect_ratio, 640.0 / 480.0);
        assert!(geometry.is_drawable());
    }

    #[test]
    fn test_ratio_is_exact_for_nonzero_sizes() {
        for (w, h) in [(1, 1), (800, 600), (1920, 1080), (1, 4096), (4096, 1), (333, 777)] {
            let geometry = FrameGeometry::from_framebuffer(w, h);
            assert_eq!(geometry.aspect_ratio, w as f32 / h as f32);
            assert_eq!(geometry.viewport.width, w);
            assert_eq!(geometry.viewport.height, h);
            assert_eq!((geometry.viewport.x, geometry.viewport.y), (0, 0));
        }
    }

    #[test]
    fn test_zero_height_is_clamped() {
        let geometry = FrameGeometry::from_framebuffer(640, 0);
        assert_eq!(geometry.aspect_ratio, 640.0);
        assert!(geometry.aspect_ratio.is_finite());
        assert_eq!(geometry.viewport.height, 0);
        assert!(!geometry.is_drawable());
    }

    #[test]
    fn test_zero_width_is_not_drawable() {
        let geometry = FrameGeometry::from_framebuffer(0, 480);
        assert_eq!(geometry.aspect_ratio, 0.0);
        assert!(!geometry.is_drawable());

        let minimized = FrameGeometry::from_framebuffer(0, 0);
        assert_eq!(minimized.aspect_ratio, 0.0);
        assert!(!minimized.is_drawable());
    }
}
