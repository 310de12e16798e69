//! # Triangle Engine
//!
//! A single-window frame loop that draws one spinning, vertex-colored triangle
//! through Vulkan, with GLFW providing the window and input.
//!
//! ## Layout
//!
//! - **`window`**: GLFW window ownership, the error callback and the Escape key binding
//! - **`frame`**: per-frame viewport/projection math, the lifecycle state machine
//!   and the [`FrameLoop`](frame::FrameLoop) driver
//! - **`render`**: the [`FrameRenderer`](render::FrameRenderer) seam and its Vulkan backend
//! - **`config`**: TOML/RON configuration with defaults matching the classic GLFW sample
//! - **`app`**: bootstrap, variant selection and exit-code mapping
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use triangle_engine::app::{self, Variant};
//! use triangle_engine::config::DemoConfig;
//!
//! let config = DemoConfig::default();
//! let code = app::run_variant(Variant::Immediate, &config);
//! std::process::exit(code.code());
//! ```

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod foundation;
pub mod frame;
pub mod render;
pub mod window;

pub use app::{AppError, ExitStatus, Variant};
pub use frame::{FrameLoop, FrameStats};

/// Common imports for applications built on the engine
pub mod prelude {
    pub use crate::{
        app::{launch, run_variant, AppError, ExitStatus, Variant},
        config::{Config, DemoConfig},
        foundation::math::{Mat4, Mat4Ext, Vec3},
        frame::{FrameGeometry, FrameLoop, FrameStats, FrameTransform},
        render::{FrameRenderer, RenderFrame},
        window::{GlfwPlatform, GlfwWindow, Platform, WindowBackend},
    };
}
