//! Display-size-dependent resources
//!
//! Two triggers keep GPU resources in step with the window:
//!
//! - **Window resize**: every framebuffer is released, the device is drained,
//!   the swapchain is resized and one framebuffer per swapchain image is
//!   rebuilt. The set is never patched in place.
//! - **Display size drift**: each frame, the output image is compared with the
//!   freshly acquired presentable image and reallocated when they differ
//!   (including the very first frame).
//!
//! Resource creation goes through [`ResourceFactory`], implemented for the
//! real device in [`crate::gfx::device`].

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_vec2(&self) -> cgmath::Vector2<f32> {
        cgmath::Vector2::new(self.width as f32, self.height as f32)
    }
}

impl From<(u32, u32)> for Extent {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Creates and synchronises the resources tracked by [`ResourceManager`]
pub trait ResourceFactory {
    type OutputImage;
    type Framebuffer;

    fn output_extent(image: &Self::OutputImage) -> Extent;

    /// Allocates a shader-readable, shader-writable color target.
    fn create_output_image(&mut self, extent: Extent) -> Self::OutputImage;

    /// Number of swapchain image slots
    fn image_count(&self) -> usize;

    fn create_framebuffer(&mut self, slot: usize, extent: Extent) -> Self::Framebuffer;

    /// Blocks until no submitted work can reference swapchain images.
    fn wait_idle(&mut self);

    fn resize_swapchain(&mut self, extent: Extent);
}

/// One framebuffer per swapchain image slot, all built for the same extent
pub struct FramebufferSet<F> {
    extent: Extent,
    framebuffers: Vec<F>,
}

impl<F> FramebufferSet<F> {
    fn build<R>(factory: &mut R, extent: Extent) -> Self
    where
        R: ResourceFactory<Framebuffer = F>,
    {
        let framebuffers = (0..factory.image_count())
            .map(|slot| factory.create_framebuffer(slot, extent))
            .collect();
        Self {
            extent,
            framebuffers,
        }
    }

    fn empty(extent: Extent) -> Self {
        Self {
            extent,
            framebuffers: Vec::new(),
        }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.framebuffers.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&F> {
        self.framebuffers.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut F> {
        self.framebuffers.get_mut(slot)
    }
}

/// Owns the output image and the framebuffer set
pub struct ResourceManager<R: ResourceFactory> {
    output: Option<R::OutputImage>,
    framebuffers: FramebufferSet<R::Framebuffer>,
}

impl<R: ResourceFactory> ResourceManager<R> {
    /// Builds the initial framebuffer set. The output image is created lazily
    /// on the first acquired frame.
    pub fn new(factory: &mut R, extent: Extent) -> Self {
        Self {
            output: None,
            framebuffers: FramebufferSet::build(factory, extent),
        }
    }

    /// Handles an explicit window resize.
    ///
    /// A zero-sized window (minimised) keeps the current resources.
    ///
    /// # Arguments
    /// * `factory` - Creates the replacement images and framebuffers
    /// * `extent` - New window size in physical pixels
    pub fn on_window_resize(&mut self, factory: &mut R, extent: Extent) {
        if extent.is_empty() {
            return;
        }

        self.framebuffers = FramebufferSet::empty(self.framebuffers.extent);
        factory.wait_idle();
        factory.resize_swapchain(extent);
        self.framebuffers = FramebufferSet::build(factory, extent);

        log::debug!(
            "rebuilt {} framebuffers at {}x{}",
            self.framebuffers.len(),
            extent.width,
            extent.height
        );
    }

    /// Makes sure the output image matches the acquired image's extent and
    /// returns it. The flag is `true` when a new image was allocated.
    pub fn ensure_output_image(
        &mut self,
        factory: &mut R,
        extent: Extent,
    ) -> (&R::OutputImage, bool) {
        let stale = self
            .output
            .as_ref()
            .map_or(true, |image| R::output_extent(image) != extent);

        if stale {
            // Release the old image before allocating its replacement.
            self.output = None;
            log::debug!("allocating output image {}x{}", extent.width, extent.height);
        }

        let image = self
            .output
            .get_or_insert_with(|| factory.create_output_image(extent));
        (image, stale)
    }

    pub fn output_image(&self) -> Option<&R::OutputImage> {
        self.output.as_ref()
    }

    pub fn framebuffers(&self) -> &FramebufferSet<R::Framebuffer> {
        &self.framebuffers
    }

    pub fn framebuffers_mut(&mut self) -> &mut FramebufferSet<R::Framebuffer> {
        &mut self.framebuffers
    }
}
