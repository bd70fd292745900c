// src/lib.rs
//! Interactive GPU cellular-automaton viewer
//!
//! A fixed-size grid of cells evolves under a compute-shader rule, is drawn
//! into a window with pan and zoom, and can be painted with the pointer while
//! running or paused. Built on wgpu, winit and imgui.

pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod simulation;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};

/// Opens the viewer window and runs until it is closed.
pub fn run(config: ViewerConfig) -> Result<()> {
    ViewerApp::new(config)?.run()
}
