//! # Graphics Module
//!
//! Everything between the cell buffers and the window:
//!
//! - **Camera** ([`camera`]) - pan/zoom mapping between window and grid space
//! - **Device** ([`device`]) - wgpu device, queue and the configured surface
//! - **Resources** ([`resources`]) - output image, per-slot framebuffers and
//!   the frame arena, kept sized to the window
//! - **Draw** ([`draw`]) - compute pass colouring the output image from the
//!   cell buffers
//! - **Blit** ([`blit`]) - copies the output image onto the acquired surface
//!   texture

pub mod blit;
pub mod camera;
pub mod device;
pub mod draw;
pub mod resources;

pub use blit::Blitter;
pub use camera::Camera2D;
pub use device::{Acquired, RenderDevice};
pub use draw::{DrawKernel, DrawParams};
