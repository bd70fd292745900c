//! Rule kernel: one automaton step on the device
//!
//! The kernel reads the current buffer and writes the next one over a
//! grid-sized thread range. Both role assignments are bound up front, so a
//! step is a single compute pass selecting the bind group that matches the
//! current read index.

use wgpu::ShaderStages;

use super::{GridUniform, SimulationState};
use crate::error::Result;
use crate::wgpu_utils::{self, UniformBuffer};

/// Default life-like rule, alive iff the cell holds [`super::ALIVE`]
pub const UPDATE_SHADER: &str = include_str!("../shaders/update.wgsl");

const WORKGROUP: (u32, u32) = (8, 8);

/// Compiled rule kernel bound to a simulation's two cell buffers
pub struct RuleKernel {
    pipeline: wgpu::ComputePipeline,
    // Held for the lifetime of the bind groups that reference it.
    _grid: UniformBuffer<GridUniform>,
    /// Indexed by the read index the bind group reads from
    bind_groups: [wgpu::BindGroup; 2],
}

impl RuleKernel {
    /// Compiles the default rule for `state`.
    pub fn new(device: &wgpu::Device, state: &SimulationState) -> Result<Self> {
        Self::with_source(device, state, "update", UPDATE_SHADER, "update")
    }

    /// Compiles a custom rule. The module must declare the same three bindings
    /// as the default rule: grid uniform, input cells, output cells.
    pub fn with_source(
        device: &wgpu::Device,
        state: &SimulationState,
        name: &'static str,
        source: &str,
        entry_point: &str,
    ) -> Result<Self> {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Rule Bind Group Layout"),
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
                    wgpu_utils::storage_buffer_read_write(),
                ),
            ],
        });

        let pipeline = wgpu_utils::compile_compute(device, name, source, entry_point, &layout)?;
        let grid = UniformBuffer::new_with_data(device, &GridUniform::from(state.dims()));

        let [a, b] = state.buffers();
        let bind = |label: &str, input: &wgpu::Buffer, output: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: grid.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: input.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: output.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [bind("Rule A->B", a, b), bind("Rule B->A", b, a)];

        Ok(Self {
            pipeline,
            _grid: grid,
            bind_groups,
        })
    }

    /// Records one step reading `state`'s current buffer into its next buffer.
    ///
    /// The caller swaps roles afterwards; recording into the frame's encoder
    /// keeps the step ahead of the draw pass in submission order.
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, state: &SimulationState) {
        let dims = state.dims();
        let (x, y) = wgpu_utils::dispatch_size(dims.width, dims.height, WORKGROUP);

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Rule Step Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[state.read_index()], &[]);
        pass.dispatch_workgroups(x, y, 1);
    }
}
