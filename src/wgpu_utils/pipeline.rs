//! Kernel compilation helpers

use crate::error::{Result, ViewerError};

/// Runs `create` inside a validation error scope and turns any validation
/// failure into [`ViewerError::ShaderCompile`].
pub fn validated<T>(
    device: &wgpu::Device,
    name: &'static str,
    create: impl FnOnce() -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(error) => Err(ViewerError::ShaderCompile {
            name,
            message: error.to_string(),
        }),
    }
}

/// Compiles `source` and builds a compute pipeline for `entry_point` over the
/// given bind group layout.
pub fn compile_compute(
    device: &wgpu::Device,
    name: &'static str,
    source: &str,
    entry_point: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> Result<wgpu::ComputePipeline> {
    validated(device, name, || {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(name),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(name),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(name),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some(entry_point),
            compilation_options: Default::default(),
            cache: None,
        })
    })
}

/// Workgroup counts covering a `width` x `height` thread range
pub fn dispatch_size(width: u32, height: u32, workgroup: (u32, u32)) -> (u32, u32) {
    (width.div_ceil(workgroup.0), height.div_ceil(workgroup.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_size_covers_range() {
        assert_eq!(dispatch_size(1024, 1024, (8, 8)), (128, 128));
        assert_eq!(dispatch_size(1, 1, (8, 8)), (1, 1));
        assert_eq!(dispatch_size(17, 9, (8, 8)), (3, 2));
        assert_eq!(dispatch_size(0, 0, (8, 8)), (0, 0));
    }
}
