//! Per-swapchain-slot framebuffer state
//!
//! A wgpu surface hands out a fresh texture every frame, so a slot's
//! framebuffer is the state bound alongside whichever image lands in that
//! slot: the extent it was built for and the slot's own draw-parameter block.
//! Giving each slot its own uniform block means a frame never rewrites
//! parameters that an earlier, still in-flight frame reads.

use super::manager::Extent;
use crate::gfx::draw::DrawParams;
use crate::wgpu_utils::UniformBuffer;

pub struct Framebuffer {
    slot: usize,
    extent: Extent,
    params: UniformBuffer<DrawParams>,
}

impl Framebuffer {
    pub fn new(device: &wgpu::Device, slot: usize, extent: Extent) -> Self {
        Self {
            slot,
            extent,
            params: UniformBuffer::new(device),
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn params(&self) -> &UniformBuffer<DrawParams> {
        &self.params
    }

    /// Uploads this frame's draw parameters.
    pub fn write_params(&mut self, queue: &wgpu::Queue, params: DrawParams) {
        self.params.update_content(queue, params);
    }
}
