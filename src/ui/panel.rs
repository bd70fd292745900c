//! Settings panel
//!
//! Read-only figures about the running viewer and the play controls. Button
//! presses come back as [`ViewerEvent`]s and go through the same event path
//! as keyboard and pointer input.

use crate::app::ViewerEvent;
use crate::simulation::GridDims;

const PANEL_SIZE: [f32; 2] = [500.0, 300.0];

/// Figures shown in the settings panel for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelInfo {
    pub fps: f32,
    pub generation: u64,
    pub grid: GridDims,
    pub zoom: f32,
    pub playing: bool,
}

/// Builds the settings window and returns the control the user pressed, if
/// any.
pub fn settings_panel(ui: &imgui::Ui, info: &PanelInfo) -> Option<ViewerEvent> {
    let mut pressed = None;

    ui.window("Settings")
        .size(PANEL_SIZE, imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            ui.text(format!("FPS: {:.1}", info.fps));
            ui.text(format!("Generation: {}", info.generation));
            ui.text(format!("Grid: {} x {}", info.grid.width, info.grid.height));
            ui.text(format!("Zoom: {:.2}", info.zoom));
            ui.text(if info.playing { "Running" } else { "Paused" });

            ui.separator();

            if ui.button("Start") {
                pressed = Some(ViewerEvent::Play);
            }
            ui.same_line();
            if ui.button("Stop") {
                pressed = Some(ViewerEvent::Pause);
            }
            ui.same_line();
            if ui.button("Randomize") {
                pressed = Some(ViewerEvent::Randomize);
            }
            ui.same_line();
            if ui.button("Clear") {
                pressed = Some(ViewerEvent::Clear);
            }

            ui.spacing();
            ui.text_disabled("Left drag: paint   Right drag: pan   Wheel: zoom");
            ui.text_disabled("Space: play/pause   Arrows: pan   Esc: quit");
        });

    pressed
}
