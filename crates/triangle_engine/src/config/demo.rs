//! Demo configuration
//!
//! Defaults reproduce the classic GLFW "Simple example": a 640x480 resizable
//! window, a black clear color and a triangle turning 50 degrees per second.

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for both demo binaries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Renderer settings
    pub render: RenderConfig,
    /// Animation settings
    pub animation: AnimationConfig,
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Load from `path` when given, otherwise use defaults; always validates
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::load_from_file(path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.validate()?;
        self.render.validate()?;
        self.animation.validate()
    }
}

/// Window creation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial width in screen coordinates
    pub width: u32,
    /// Initial height in screen coordinates
    pub height: u32,
    /// Window title
    pub title: String,
    /// Whether the user may resize the window
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            title: "Simple example".to_string(),
            resizable: true,
        }
    }
}

impl WindowConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window.size",
                reason: format!("{}x{} has a zero dimension", self.width, self.height),
            });
        }
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "window.title",
                reason: "title cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// # Shader Configuration
///
/// Paths of the compiled SPIR-V stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Path to the vertex shader SPIR-V file
    pub vertex_shader_path: PathBuf,
    /// Path to the fragment shader SPIR-V file
    pub fragment_shader_path: PathBuf,
}

impl ShaderConfig {
    /// Create a new shader configuration
    pub fn new(vertex_path: impl Into<PathBuf>, fragment_path: impl Into<PathBuf>) -> Self {
        Self {
            vertex_shader_path: vertex_path.into(),
            fragment_shader_path: fragment_path.into(),
        }
    }

    /// Create shader config with automatic path resolution
    ///
    /// Tries the build script's output directory first, then common locations
    /// relative to the working directory.
    pub fn with_path_resolution(vertex_file: &str, fragment_file: &str) -> Self {
        let mut shader_dirs: Vec<PathBuf> = Vec::new();
        if let Some(build_dir) = option_env!("TRIANGLE_SHADER_DIR") {
            shader_dirs.push(PathBuf::from(build_dir));
        }
        shader_dirs.extend(
            ["target/shaders", "shaders", "resources/shaders", "../target/shaders", "."]
                .iter()
                .map(PathBuf::from),
        );

        let find = |file: &str| {
            shader_dirs
                .iter()
                .map(|dir| dir.join(file))
                .find(|candidate| candidate.exists())
                .unwrap_or_else(|| Path::new("target/shaders").join(file))
        };

        Self {
            vertex_shader_path: find(vertex_file),
            fragment_shader_path: find(fragment_file),
        }
    }

    /// Validate that shader files exist
    pub fn validate(&self) -> Result<(), String> {
        if !self.vertex_shader_path.exists() {
            return Err(format!("Vertex shader not found: {}", self.vertex_shader_path.display()));
        }
        if !self.fragment_shader_path.exists() {
            return Err(format!(
                "Fragment shader not found: {}",
                self.fragment_shader_path.display()
            ));
        }
        Ok(())
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self::with_path_resolution("triangle.vert.spv", "triangle.frag.spv")
    }
}

/// # Renderer Configuration
///
/// Vulkan instance metadata, presentation and debug settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// RGBA clear color
    pub clear_color: [f32; 4],
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Maximum frames in flight
    pub max_frames_in_flight: usize,
    /// Whether to enable Vulkan validation layers (unset: debug builds only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_validation: Option<bool>,
    /// Shader configuration
    pub shaders: ShaderConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            application_name: "Spinning Triangle".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
            max_frames_in_flight: 2,
            enable_validation: None,
            shaders: ShaderConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Validation layers requested, resolving the auto setting
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid {
                field: "render.application_name",
                reason: "application name cannot be empty".to_string(),
            });
        }
        if !(1..=8).contains(&self.max_frames_in_flight) {
            return Err(ConfigError::Invalid {
                field: "render.max_frames_in_flight",
                reason: format!("{} is outside 1..=8", self.max_frames_in_flight),
            });
        }
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid {
                field: "render.clear_color",
                reason: "components must be finite".to_string(),
            });
        }
        Ok(())
    }
}

/// Animation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Rotation speed about +Z in degrees per second
    pub rotation_degrees_per_second: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            rotation_degrees_per_second: 50.0,
        }
    }
}

impl AnimationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.rotation_degrees_per_second.is_finite() {
            return Err(ConfigError::Invalid {
                field: "animation.rotation_degrees_per_second",
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}
