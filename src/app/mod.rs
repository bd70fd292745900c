//! Frame orchestration
//!
//! [`ViewerApp`] owns the winit event loop. Once the window exists, a
//! [`Viewer`] holds the run state, the step gate and the [`ViewerContext`]
//! with everything on the device side, and drives one frame per redraw
//! through [`frame::run_frame`]:
//!
//! 1. acquire the next surface texture (a transient failure skips the frame)
//! 2. wait on the slot's previous submission, size the output image to the
//!    texture and look up the slot's framebuffer
//! 3. paint under the pointer if the paint button is held
//! 4. step the automaton if the scheduler grants it
//! 5. draw the grid into the output image, blit it, overlay the UI
//! 6. submit, seal the slot with the submission, present
//!
//! Every stage records into one encoder and goes out in one submission, so the
//! rule step always executes before the draw that shows it.

pub mod events;
pub mod frame;

pub use events::{
    apply_event, Action, Key, KeyKind, LoopState, PointerButton, PointerEvent, PointerKind,
    RunState, SeedKind, ViewerEvent,
};
pub use frame::{run_frame, FrameOutcome, FrameStages};

use std::sync::Arc;
use std::time::Instant;

use cgmath::Vector2;
use rand::{rngs::StdRng, SeedableRng};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::editor::InteractiveEditor;
use crate::error::{Result, ViewerError};
use crate::gfx::{
    resources::{Extent, FrameArena, ResourceManager},
    Acquired, Blitter, Camera2D, DrawKernel, DrawParams, RenderDevice,
};
use crate::performance::PerformanceMonitor;
use crate::simulation::{seed, RuleKernel, SimulationState, UpdateScheduler};
use crate::ui::{settings_panel, PanelInfo, UiManager};

/// Device-side state held between window creation and shutdown
///
/// Device-owning fields are declared in reverse construction order, so drop
/// glue releases the UI first and the device and window last. [`Drop`] waits
/// for the device before any of them go.
pub struct ViewerContext {
    encoder: Option<wgpu::CommandEncoder>,
    ui: UiManager,
    arena: FrameArena<wgpu::BindGroup, wgpu::SubmissionIndex>,
    resources: ResourceManager<RenderDevice>,
    blitter: Blitter,
    draw: DrawKernel,
    rule: RuleKernel,
    simulation: SimulationState,
    device: RenderDevice,
    window: Arc<Window>,

    camera: Camera2D,
    editor: InteractiveEditor,
    performance: PerformanceMonitor,
    rng: StdRng,
    seed_max: i32,
}

impl ViewerContext {
    pub fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let mut device = pollster::block_on(RenderDevice::new(Arc::clone(&window), config))?;
        let mut rng = StdRng::from_os_rng();

        let grid = config.grid();
        let simulation = SimulationState::new(device.device(), grid, config.seed_max, &mut rng);
        let rule = RuleKernel::new(device.device(), &simulation)?;
        let draw = DrawKernel::new(device.device())?;
        let blitter = Blitter::new(device.device(), device.surface_format())?;

        let (width, height) = device.surface_size();
        let resources = ResourceManager::new(&mut device, Extent::new(width, height));
        let arena = FrameArena::new(device.image_count());

        let mut ui = UiManager::new(
            device.device(),
            device.queue(),
            device.surface_format(),
            &window,
        );
        ui.update_display_size(width, height);

        // Kernel compilation and resource creation can fail asynchronously.
        device.check_device()?;

        log::info!(
            "grid {}x{}, stepping every {:?}, {} swapchain images",
            grid.width,
            grid.height,
            config.step_interval,
            device.image_count()
        );

        Ok(Self {
            encoder: None,
            ui,
            arena,
            resources,
            blitter,
            draw,
            rule,
            simulation,
            device,
            window,
            camera: Camera2D::new(config.initial_scale),
            editor: InteractiveEditor::new(),
            performance: PerformanceMonitor::new(),
            rng,
            seed_max: config.seed_max,
        })
    }

    fn resize(&mut self, extent: Extent) {
        if extent.is_empty() {
            log::debug!("ignoring resize to {}x{}", extent.width, extent.height);
            return;
        }
        self.resources.on_window_resize(&mut self.device, extent);
        // The device is idle after the rebuild, so every parked transient can go.
        self.arena.retire_all();
        self.ui.update_display_size(extent.width, extent.height);
    }

    fn reseed(&mut self, kind: SeedKind) {
        let count = self.simulation.dims().cell_count();
        let cells = match kind {
            SeedKind::Random => seed::random_cells(count, self.seed_max, &mut self.rng),
            SeedKind::Cleared => seed::cleared_cells(count),
        };
        self.simulation.reseed(self.device.queue(), &cells);
        log::info!("grid reseeded ({kind:?})");
    }
}

fn image_extent(image: &wgpu::SurfaceTexture) -> Extent {
    Extent::new(image.texture.width(), image.texture.height())
}

impl FrameStages for ViewerContext {
    type Image = wgpu::SurfaceTexture;

    fn acquire(&mut self) -> Result<Option<(usize, wgpu::SurfaceTexture)>> {
        self.performance.record_frame(Instant::now());

        match self.device.acquire()? {
            Acquired::Image { slot, texture } => Ok(Some((slot, texture))),
            Acquired::Skipped(reason) => {
                log::warn!("skipping frame: {reason}");
                Ok(None)
            }
        }
    }

    fn prepare(&mut self, slot: usize, image: &wgpu::SurfaceTexture) -> bool {
        self.arena.begin(slot, |fence| self.device.wait_for(fence));

        let extent = image_extent(image);
        self.resources.ensure_output_image(&mut self.device, extent);
        if self.resources.output_image().is_none() {
            log::warn!("no output image for {}x{}, skipping frame", extent.width, extent.height);
            return false;
        }

        let params = DrawParams::new(&self.camera, extent, self.simulation.dims());
        match self.resources.framebuffers_mut().get_mut(slot) {
            Some(framebuffer) => framebuffer.write_params(self.device.queue(), params),
            None => {
                log::warn!("no framebuffer for swapchain slot {slot}, skipping frame");
                return false;
            }
        }

        self.encoder = Some(self.device.device().create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            },
        ));
        true
    }

    fn paint(&mut self, pointer: Vector2<f32>, image: &wgpu::SurfaceTexture) {
        self.editor.paint(
            self.device.queue(),
            &self.simulation,
            &self.camera,
            pointer,
            image_extent(image),
        );
    }

    fn step(&mut self) {
        if let Some(encoder) = self.encoder.as_mut() {
            self.rule.record(encoder, &self.simulation);
            self.simulation.swap();
        }
    }

    fn draw(
        &mut self,
        slot: usize,
        image: &wgpu::SurfaceTexture,
        run: &RunState,
    ) -> Option<ViewerEvent> {
        let device = self.device.device();
        let encoder = self.encoder.as_mut()?;
        let (Some(output), Some(framebuffer)) = (
            self.resources.output_image(),
            self.resources.framebuffers().get(slot),
        ) else {
            return None;
        };

        let draw_group = self.draw.bind(device, framebuffer, &self.simulation, output);
        self.draw.record(encoder, &draw_group, output);
        self.arena.park(slot, draw_group);

        let target = image
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let blit_group = self.blitter.bind(device, output);
        self.blitter.record(encoder, &blit_group, &target);
        self.arena.park(slot, blit_group);

        let info = PanelInfo {
            fps: self.performance.stats().fps,
            generation: self.simulation.generation(),
            grid: self.simulation.dims(),
            zoom: self.camera.scale,
            playing: run.playing,
        };
        let pressed = self
            .ui
            .update_logic(&self.window, |ui| settings_panel(ui, &info));
        self.ui.render(device, self.device.queue(), encoder, &target);
        pressed
    }

    fn present(&mut self, slot: usize, image: wgpu::SurfaceTexture) -> Result<()> {
        if let Some(encoder) = self.encoder.take() {
            let submission = self.device.queue().submit(Some(encoder.finish()));
            self.arena.seal(slot, submission);
        }

        self.window.pre_present_notify();
        image.present();

        self.device.check_device()
    }
}

impl Drop for ViewerContext {
    fn drop(&mut self) {
        self.device.wait_idle();
        self.arena.retire_all();
    }
}

/// Run state, step gate and device context of an open viewer window
pub struct Viewer {
    run: RunState,
    scheduler: UpdateScheduler,
    context: ViewerContext,
}

impl Viewer {
    pub fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self> {
        let context = ViewerContext::new(window, config)?;
        Ok(Self {
            run: RunState::new(config.start_playing),
            scheduler: UpdateScheduler::new(config.step_interval, Instant::now()),
            context,
        })
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Applies an event and carries out any device work it requires.
    pub fn handle_event(&mut self, event: ViewerEvent) {
        match apply_event(&mut self.run, &mut self.context.camera, event) {
            Some(Action::Resize(extent)) => self.context.resize(extent),
            Some(Action::Reseed(kind)) => self.context.reseed(kind),
            None if !self.run.is_running() => log::info!("close requested"),
            None => {}
        }
    }

    /// Renders one frame. Errors are fatal device failures.
    pub fn render_frame(&mut self) -> Result<()> {
        let outcome = run_frame(
            &mut self.context,
            &self.run,
            &mut self.scheduler,
            Instant::now(),
        )?;

        if let FrameOutcome::Presented {
            pressed: Some(event),
            ..
        } = outcome
        {
            self.handle_event(event);
        }
        Ok(())
    }
}

struct AppState {
    config: ViewerConfig,
    viewer: Option<Viewer>,
    error: Option<ViewerError>,
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{error}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

/// The viewer application: event loop plus the state it drives
pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new()?;

        Ok(Self {
            event_loop: Some(event_loop),
            state: AppState {
                config,
                viewer: None,
                error: None,
            },
        })
    }

    /// Runs until the window closes. Returns the error that stopped the
    /// loop, if any.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.state)?;

        self.state.viewer = None;
        match self.state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(true);

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => return self.fail(event_loop, error.into()),
        };

        match Viewer::new(window, &self.config) {
            Ok(viewer) => self.viewer = Some(viewer),
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        // The UI sees input first; a claimed event goes no further.
        let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        let window = Arc::clone(&viewer.context.window);
        if viewer.context.ui.handle_input(&window, &ui_event) {
            return;
        }

        if let WindowEvent::RedrawRequested = event {
            if let Err(error) = viewer.render_frame() {
                return self.fail(event_loop, error);
            }
        } else if let Some(viewer_event) = events::translate(&event, viewer.run.pointer) {
            viewer.handle_event(viewer_event);
        }

        if !viewer.is_running() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = self.viewer.as_ref() {
            viewer.context.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release device resources while the window still exists.
        self.viewer = None;
    }
}
