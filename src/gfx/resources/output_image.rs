//! Device-side color target the draw kernel writes into
//!
//! The output image always matches the acquired presentable image's size. It
//! is written as a storage image by the draw pass and read back as a sampled
//! texture by the blit pass.

use super::manager::Extent;

/// The output image format. Half-float keeps it writable as storage on every
/// backend.
pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Output render target with its default view
pub struct OutputImage {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    extent: Extent,
}

impl OutputImage {
    /// Allocates a shader-readable and shader-writable image of `extent`.
    pub fn new(device: &wgpu::Device, extent: Extent) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("output_texture"),
            size: wgpu::Extent3d {
                width: extent.width,
                height: extent.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OUTPUT_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            extent,
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }
}
