//! ImGui integration
//!
//! Owns the imgui context together with its winit platform glue and wgpu
//! renderer. The frame loop feeds it window events first, builds the panel
//! once per frame and records its overlay pass onto the acquired surface
//! texture after the blit.

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use std::time::Instant;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

const FONT_SIZE: f32 = 24.0;

/// Which imgui capture flag an input event is subject to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pointer,
    Keyboard,
}

pub fn input_kind(event: &WindowEvent) -> Option<InputKind> {
    match event {
        WindowEvent::CursorMoved { .. }
        | WindowEvent::MouseInput { .. }
        | WindowEvent::MouseWheel { .. } => Some(InputKind::Pointer),
        WindowEvent::KeyboardInput { .. } | WindowEvent::ModifiersChanged(_) => {
            Some(InputKind::Keyboard)
        }
        _ => None,
    }
}

/// Whether imgui keeps an event of `kind` given its current capture flags
pub fn claimed(kind: InputKind, want_mouse: bool, want_keyboard: bool) -> bool {
    match kind {
        InputKind::Pointer => want_mouse,
        InputKind::Keyboard => want_keyboard,
    }
}

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Sets up imgui for `window`, rendering into `output_color_format`.
    ///
    /// DPI is locked to 1.0 so panel sizes are in physical pixels, like the
    /// output image.
    ///
    /// # Arguments
    /// * `device` - Device the imgui renderer allocates its buffers on
    /// * `queue` - Queue for font atlas uploads
    /// * `output_color_format` - Format of the texture the UI is drawn into
    /// * `window` - Window imgui reads input and size from
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: output_color_format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, device, queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Forwards an input event to imgui and reports whether it was claimed.
    ///
    /// Pointer events are claimed while imgui wants the mouse, key events
    /// while it wants the keyboard. A claimed event must not reach the
    /// viewer's own handlers.
    ///
    /// # Arguments
    /// * `window` - Window the event belongs to
    /// * `event` - Event as delivered by winit
    pub fn handle_input<T>(&mut self, window: &Window, event: &Event<T>) -> bool {
        let Event::WindowEvent {
            event: window_event,
            ..
        } = event
        else {
            return false;
        };

        let kind = input_kind(window_event);
        if kind.is_none() && !matches!(window_event, WindowEvent::Focused(_)) {
            return false;
        }

        self.platform
            .handle_event(self.context.io_mut(), window, event);

        let io = self.context.io();
        kind.is_some_and(|kind| claimed(kind, io.want_capture_mouse, io.want_capture_keyboard))
    }

    /// Starts a frame and builds the UI with `run_ui`, returning its result.
    pub fn update_logic<F, R>(&mut self, window: &Window, run_ui: F) -> R
    where
        F: FnOnce(&imgui::Ui) -> R,
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(error) = self.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("imgui frame preparation failed: {error}");
        }

        let ui = self.context.frame();
        let result = run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        result
    }

    /// Records the UI built by the last [`update_logic`](Self::update_logic)
    /// on top of `color_attachment`.
    pub fn render(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_attachment: &TextureView,
    ) {
        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    // Keep the blitted grid underneath
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(error) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            log::error!("imgui render failed: {error:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hovering_panel_leaves_keys_to_viewer() {
        // Pointer over the settings window, no text field focused
        assert!(claimed(InputKind::Pointer, true, false));
        assert!(!claimed(InputKind::Keyboard, true, false));
    }

    #[test]
    fn test_keyboard_capture_claims_keys_only() {
        assert!(claimed(InputKind::Keyboard, false, true));
        assert!(!claimed(InputKind::Pointer, false, true));
    }

    #[test]
    fn test_event_classification() {
        assert_eq!(
            input_kind(&WindowEvent::ModifiersChanged(Default::default())),
            Some(InputKind::Keyboard)
        );
        assert_eq!(input_kind(&WindowEvent::Focused(true)), None);
        assert_eq!(input_kind(&WindowEvent::CloseRequested), None);
        assert_eq!(input_kind(&WindowEvent::RedrawRequested), None);
    }
}
