//! Device and swapchain ownership
//!
//! Wraps the wgpu instance, surface, device and queue. The configured surface
//! plays the role of the swapchain: its frame latency is the swapchain image
//! count, and acquiring its current texture yields the presentable image for
//! one frame.

use std::sync::{Arc, Mutex};

use winit::window::Window;

use super::resources::{Extent, Framebuffer, OutputImage, ResourceFactory};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};

/// Output of a surface acquisition attempt
pub enum Acquired {
    /// A presentable image and the swapchain slot it occupies
    Image {
        slot: usize,
        texture: wgpu::SurfaceTexture,
    },
    /// Transient failure; the frame is skipped
    Skipped(wgpu::SurfaceError),
}

/// GPU device bound to a window surface
pub struct RenderDevice {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    frames_acquired: u64,
    /// First uncaptured device error, raised by the device on any thread
    device_error: Arc<Mutex<Option<String>>>,
}

impl RenderDevice {
    /// Creates the device and configures the window surface.
    ///
    /// Any failure here is fatal and returned before the frame loop starts.
    pub async fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let flags = if config.debug_layers {
            wgpu::InstanceFlags::debugging()
        } else {
            wgpu::InstanceFlags::empty()
        };
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags,
            ..Default::default()
        });

        let (width, height): (u32, u32) = window.inner_size().into();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let adapter_info = adapter.get_info();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 8192,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let device_error = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&device_error);
        device.on_uncaptured_error(Box::new(move |error| {
            log::error!("uncaptured device error: {error}");
            if let Ok(mut slot) = sink.lock() {
                slot.get_or_insert_with(|| error.to_string());
            }
        }));

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(ViewerError::NoSurfaceFormat)?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(config.vsync),
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: config.swapchain_images,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "using {} ({:?}), surface {:?} {}x{}",
            adapter_info.name,
            adapter_info.backend,
            format,
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config: surface_config,
            frames_acquired: 0,
            device_error,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current swapchain dimensions
    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Number of swapchain image slots
    pub fn image_count(&self) -> usize {
        self.config.desired_maximum_frame_latency.max(1) as usize
    }

    /// Acquires the next presentable image.
    ///
    /// Timeouts and out-of-date or lost surfaces skip the frame (the surface is
    /// reconfigured for the latter two). Out-of-memory is fatal.
    pub fn acquire(&mut self) -> Result<Acquired> {
        match self.surface.get_current_texture() {
            Ok(texture) => {
                let slot = (self.frames_acquired % self.image_count() as u64) as usize;
                self.frames_acquired += 1;
                Ok(Acquired::Image { slot, texture })
            }
            Err(error @ wgpu::SurfaceError::Timeout) => Ok(Acquired::Skipped(error)),
            Err(error @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                self.surface.configure(&self.device, &self.config);
                Ok(Acquired::Skipped(error))
            }
            Err(error) => Err(ViewerError::SurfaceFatal(error)),
        }
    }

    /// Fails with the first device error raised since startup, if any.
    pub fn check_device(&self) -> Result<()> {
        let error = self.device_error.lock().ok().and_then(|mut slot| slot.take());
        match error {
            Some(message) => Err(ViewerError::Device(message)),
            None => Ok(()),
        }
    }

    /// Blocks until all submitted device work has completed.
    pub fn wait_idle(&self) {
        if let Err(error) = self.device.poll(wgpu::PollType::Wait) {
            log::error!("device wait failed: {error}");
        }
    }

    /// Blocks until the given submission has completed.
    pub fn wait_for(&self, submission: wgpu::SubmissionIndex) {
        if let Err(error) = self
            .device
            .poll(wgpu::PollType::WaitForSubmissionIndex(submission))
        {
            log::error!("device wait failed: {error}");
        }
    }

    /// Reconfigures the swapchain. Zero-sized requests (minimised window) are
    /// ignored.
    pub fn resize_swapchain(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }
}

impl ResourceFactory for RenderDevice {
    type OutputImage = OutputImage;
    type Framebuffer = Framebuffer;

    fn output_extent(image: &OutputImage) -> Extent {
        image.extent()
    }

    fn create_output_image(&mut self, extent: Extent) -> OutputImage {
        OutputImage::new(&self.device, extent)
    }

    fn image_count(&self) -> usize {
        RenderDevice::image_count(self)
    }

    fn create_framebuffer(&mut self, slot: usize, extent: Extent) -> Framebuffer {
        Framebuffer::new(&self.device, slot, extent)
    }

    fn wait_idle(&mut self) {
        RenderDevice::wait_idle(self);
    }

    fn resize_swapchain(&mut self, extent: Extent) {
        RenderDevice::resize_swapchain(self, extent.width, extent.height);
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
