//! Draw pass: cell grid to output image
//!
//! A compute kernel evaluates the camera transform for every output pixel and
//! writes the colour of the cell under it. It reads both cell buffers (the
//! current generation and the one before it) and never writes them.

use wgpu::ShaderStages;

use super::camera::Camera2D;
use super::resources::{Extent, Framebuffer, OutputImage, OUTPUT_FORMAT};
use crate::error::Result;
use crate::simulation::{GridDims, SimulationState};
use crate::wgpu_utils;

pub const DRAW_SHADER: &str = include_str!("../shaders/draw.wgsl");

const WORKGROUP: (u32, u32) = (8, 8);

/// Camera and display parameters as laid out in the draw kernel's uniform block
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawParams {
    pub offset: [f32; 2],
    pub display: [f32; 2],
    pub grid: [u32; 2],
    pub scale: f32,
    pub _padding: f32,
}

impl DrawParams {
    pub fn new(camera: &Camera2D, display: Extent, grid: GridDims) -> Self {
        Self {
            offset: camera.offset.into(),
            display: display.as_vec2().into(),
            grid: [grid.width, grid.height],
            scale: camera.scale,
            _padding: 0.0,
        }
    }
}

/// Compiled draw kernel
pub struct DrawKernel {
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
}

impl DrawKernel {
    pub fn new(device: &wgpu::Device) -> Result<Self> {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[
                wgpu_utils::entry(0, ShaderStages::COMPUTE, wgpu_utils::uniform()),
                wgpu_utils::entry(
                    1,
                    ShaderStages::COMPUTE,
                    wgpu_utils::storage_buffer_read_only(),
                ),
                wgpu_utils::entry(
                    2,
                    ShaderStages::COMPUTE,
                    wgpu_utils::storage_buffer_read_only(),
                ),
                wgpu_utils::entry(
                    3,
                    ShaderStages::COMPUTE,
                    wgpu_utils::image_2d(OUTPUT_FORMAT, wgpu::StorageTextureAccess::WriteOnly),
                ),
            ],
        });

        let pipeline = wgpu_utils::compile_compute(device, "draw", DRAW_SHADER, "main", &layout)?;

        Ok(Self { pipeline, layout })
    }

    /// Binds this frame's parameters, both cell buffers and the output image.
    ///
    /// The bind group names resources that can change between frames, so it is
    /// a transient the caller parks in the frame arena.
    pub fn bind(
        &self,
        device: &wgpu::Device,
        framebuffer: &Framebuffer,
        state: &SimulationState,
        output: &OutputImage,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: framebuffer.params().binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: state.current_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: state.next_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&output.view),
                },
            ],
        })
    }

    /// Records the draw dispatch over the output image's pixel range.
    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &wgpu::BindGroup,
        output: &OutputImage,
    ) {
        let extent = output.extent();
        let (x, y) = wgpu_utils::dispatch_size(extent.width, extent.height, WORKGROUP);

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Draw Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(x, y, 1);
    }
}
