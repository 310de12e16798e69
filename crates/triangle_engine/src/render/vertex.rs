//! Vertex data for the triangle

/// Interleaved position + color vertex, matching the shader's input layout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorVertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Linear RGB color
    pub color: [f32; 3],
}

// Two tightly packed [f32; 3] arrays, no padding
unsafe impl bytemuck::Pod for ColorVertex {}
unsafe impl bytemuck::Zeroable for ColorVertex {}

impl ColorVertex {
    /// Create a vertex
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// The drawn triangle: red, green and blue corners
pub const TRIANGLE_VERTICES: [ColorVertex; 3] = [
    ColorVertex::new([-0.6, -0.4, 0.0], [1.0, 0.0, 0.0]),
    ColorVertex::new([0.6, -0.4, 0.0], [0.0, 1.0, 0.0]),
    ColorVertex::new([0.0, 0.6, 0.0], [0.0, 0.0, 1.0]),
];

/// Positions uploaded by the buffered variant, interleaved x,y,z
///
/// Kept resident on the GPU but never bound for drawing.
#[rustfmt::skip]
pub const AUXILIARY_TRIANGLE_POSITIONS: [f32; 9] = [
    -1.0, -1.0, 0.0,
     1.0, -1.0, 0.0,
     0.0,  1.0, 0.0,
];
