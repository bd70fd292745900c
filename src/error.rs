//! Error types for the viewer
//!
//! Startup failures (window, surface, adapter, device, kernel compilation) are
//! fatal and abort before the frame loop starts. Runtime failures raised by the
//! device stop the loop and are handed back from [`crate::app::ViewerApp::run`].
//! Transient conditions, such as a skipped surface acquisition, never become
//! errors and are handled inside the frame loop.

use thiserror::Error;

/// Errors that terminate the viewer
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    AdapterNotFound(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to compile kernel `{name}`: {message}")]
    ShaderCompile { name: &'static str, message: String },

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("surface is unusable: {0}")]
    SurfaceFatal(wgpu::SurfaceError),

    #[error("device error: {0}")]
    Device(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Invalid viewer configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be nonzero, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("grid of {width}x{height} cells does not fit in one storage buffer")]
    GridTooLarge { width: u32, height: u32 },

    #[error("step rate must be positive and finite, got {0}")]
    InvalidStepRate(f64),

    #[error("swapchain image count must be at least 1")]
    NoSwapchainImages,

    #[error("seed range upper bound must be positive, got {0}")]
    InvalidSeedRange(i32),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
