//! Application bootstrap
//!
//! Wires configuration, window, renderer and frame loop together, walks the
//! lifecycle state machine and maps every failure to a process exit code.

use crate::config::{ConfigError, DemoConfig};
use crate::frame::{FrameLoop, FrameStats, Lifecycle, LifecycleError, Termination};
use crate::render::vulkan::VulkanRenderer;
use crate::render::{FrameRenderer, RenderError, RenderResult};
use crate::window::{reported_error_count, GlfwPlatform, Platform, WindowError};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Which of the two demo programs is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Draws the colored triangle only
    Immediate,
    /// Also uploads the auxiliary static vertex buffer
    Buffered,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate => write!(f, "immediate"),
            Self::Buffered => write!(f, "buffered"),
        }
    }
}

/// Process outcome, one per exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Window closed normally
    Success,
    /// Windowing library init, window creation or surface creation failed
    WindowFailure,
    /// The Vulkan loader could not be loaded
    LoaderFailure,
    /// Any other renderer failure, at startup or while running
    RendererFailure,
    /// The configuration file could not be read or is invalid
    ConfigFailure,
}

impl ExitStatus {
    /// Process exit code
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::WindowFailure => 1,
            Self::LoaderFailure => 2,
            Self::RendererFailure => 3,
            Self::ConfigFailure => 4,
        }
    }
}

/// Anything that ends the program early
#[derive(Error, Debug)]
pub enum AppError {
    /// Window layer failure
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Renderer failure
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal lifecycle violation
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl AppError {
    /// Exit status this error terminates the process with
    pub const fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Window(_) | Self::Render(RenderError::Window(_)) => ExitStatus::WindowFailure,
            Self::Render(RenderError::LoaderUnavailable(_)) => ExitStatus::LoaderFailure,
            Self::Render(_) | Self::Lifecycle(_) => ExitStatus::RendererFailure,
            Self::Config(_) => ExitStatus::ConfigFailure,
        }
    }

    /// Process exit code for this error
    pub const fn exit_code(&self) -> i32 {
        self.exit_status().code()
    }
}

/// Initialize, run the frame loop until the window closes, then tear down
///
/// `config` is validated before the windowing library is touched.
/// `make_renderer` receives the freshly created window. If it fails, the
/// window and windowing library are released before this returns.
pub fn launch<P, R, F>(config: &DemoConfig, make_renderer: F) -> Result<FrameStats, AppError>
where
    P: Platform,
    R: FrameRenderer,
    F: FnOnce(&mut P::Window) -> RenderResult<R>,
{
    config.validate()?;

    let mut lifecycle = Lifecycle::new();
    lifecycle.begin_initialization()?;

    let mut frame_loop = match initialize::<P, R, F>(config, make_renderer) {
        Ok(frame_loop) => frame_loop,
        Err(e) => {
            log::error!("Initialization failed: {}", e);
            lifecycle.terminate(Termination::Failure)?;
            return Err(e);
        }
    };

    lifecycle.start_running()?;
    let result = frame_loop.run();

    lifecycle.begin_shutdown()?;
    // Renderer first, then the window, then the library
    drop(frame_loop);

    match result {
        Ok(stats) => {
            lifecycle.terminate(Termination::Success)?;
            Ok(stats)
        }
        Err(e) => {
            log::error!("Frame loop failed: {}", e);
            lifecycle.terminate(Termination::Failure)?;
            Err(e.into())
        }
    }
}

fn initialize<P, R, F>(
    config: &DemoConfig,
    make_renderer: F,
) -> Result<FrameLoop<P::Window, R>, AppError>
where
    P: Platform,
    R: FrameRenderer,
    F: FnOnce(&mut P::Window) -> RenderResult<R>,
{
    let platform = P::init()?;
    let mut window = platform.create_window(&config.window)?;
    let renderer = make_renderer(&mut window)?;
    Ok(FrameLoop::new(window, renderer, config))
}

/// Run one variant on GLFW + Vulkan with an already loaded configuration
pub fn run_variant(variant: Variant, config: &DemoConfig) -> ExitStatus {
    log::info!("Starting {} variant", variant);
    let result = launch::<GlfwPlatform, _, _>(config, |window| {
        VulkanRenderer::new(window, &config.render, variant)
    });

    let errors = reported_error_count();
    if errors > 0 {
        log::warn!("GLFW reported {} error(s) during the run", errors);
    }

    match result {
        Ok(_) => ExitStatus::Success,
        Err(e) => {
            let status = e.exit_status();
            log::error!("{} (exit code {})", e, status.code());
            status
        }
    }
}

/// Load the configuration from `config_path` (or defaults) and run `variant`
pub fn run_with_config_path(variant: Variant, config_path: Option<&Path>) -> ExitStatus {
    match DemoConfig::load_or_default(config_path) {
        Ok(config) => run_variant(variant, &config),
        Err(e) => {
            let e = AppError::from(e);
            log::error!("{}", e);
            e.exit_status()
        }
    }
}
