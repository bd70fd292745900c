// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers for the binding layouts, uniform blocks and
//! kernel compilation the viewer repeats across its passes.

pub mod binding_types;
pub mod pipeline;
pub mod uniform_buffer;

// Re-export main types
pub use binding_types::*;
pub use pipeline::{compile_compute, dispatch_size, validated};
pub use uniform_buffer::UniformBuffer;
