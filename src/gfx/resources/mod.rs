// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Output image, per-slot framebuffers, the frame arena and the manager that
//! keeps them sized to the window.

pub mod arena;
pub mod framebuffer;
pub mod manager;
pub mod output_image;

// Re-export main types
pub use arena::FrameArena;
pub use framebuffer::Framebuffer;
pub use manager::{Extent, FramebufferSet, ResourceFactory, ResourceManager};
pub use output_image::{OutputImage, OUTPUT_FORMAT};
