//! Viewer events and the single function that applies them
//!
//! Window input is translated into [`ViewerEvent`]s, and the settings panel
//! emits the same type for its buttons. [`apply_event`] is the only place
//! that mutates the camera and the run state in response to input; anything
//! that needs the device (resizing, reseeding) comes back as an [`Action`]
//! for the frame loop to carry out. Closing moves [`RunState::loop_state`] to
//! [`LoopState::Closed`], which the event loop checks after every event.

use cgmath::Vector2;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::camera::Camera2D;
use crate::gfx::resources::Extent;

/// Screen pixels panned per arrow-key press
pub const ARROW_PAN_PIXELS: f32 = 32.0;

/// Trackpad pixels per scroll line
pub const PIXELS_PER_SCROLL_LINE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Press,
    Release,
}

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Space,
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    ButtonDown,
    ButtonUp,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Window position in physical pixels
    pub position: Vector2<f32>,
    pub button: Option<PointerButton>,
    /// Scroll amount in lines
    pub scroll: Vector2<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    Resized { width: u32, height: u32 },
    Keyboard { kind: KeyKind, key: Key },
    Pointer(PointerEvent),
    CloseRequested,
    Play,
    Pause,
    Randomize,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Random,
    Cleared,
}

/// Follow-up work the frame loop performs after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resize(Extent),
    Reseed(SeedKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Closed,
}

/// Input-driven state owned by the frame loop
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub pointer: Vector2<f32>,
    /// Paint button held
    pub painting: bool,
    /// Pan button held
    pub panning: bool,
    pub playing: bool,
    pub loop_state: LoopState,
}

impl RunState {
    pub fn new(playing: bool) -> Self {
        Self {
            pointer: Vector2::new(0.0, 0.0),
            painting: false,
            panning: false,
            playing,
            loop_state: LoopState::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.loop_state == LoopState::Running
    }
}

/// Applies one event to the camera and run state.
pub fn apply_event(
    run: &mut RunState,
    camera: &mut Camera2D,
    event: ViewerEvent,
) -> Option<Action> {
    match event {
        ViewerEvent::Resized { width, height } => Some(Action::Resize(Extent::new(width, height))),
        ViewerEvent::CloseRequested => {
            run.loop_state = LoopState::Closed;
            None
        }
        ViewerEvent::Keyboard {
            kind: KeyKind::Press,
            key,
        } => match key {
            Key::Escape => {
                run.loop_state = LoopState::Closed;
                None
            }
            Key::Space => {
                run.playing = !run.playing;
                None
            }
            Key::Left => pan(camera, ARROW_PAN_PIXELS, 0.0),
            Key::Right => pan(camera, -ARROW_PAN_PIXELS, 0.0),
            Key::Up => pan(camera, 0.0, ARROW_PAN_PIXELS),
            Key::Down => pan(camera, 0.0, -ARROW_PAN_PIXELS),
        },
        ViewerEvent::Keyboard { .. } => None,
        ViewerEvent::Pointer(pointer) => {
            apply_pointer(run, camera, pointer);
            None
        }
        ViewerEvent::Play => {
            run.playing = true;
            None
        }
        ViewerEvent::Pause => {
            run.playing = false;
            None
        }
        ViewerEvent::Randomize => Some(Action::Reseed(SeedKind::Random)),
        ViewerEvent::Clear => Some(Action::Reseed(SeedKind::Cleared)),
    }
}

fn pan(camera: &mut Camera2D, dx: f32, dy: f32) -> Option<Action> {
    camera.pan_pixels(Vector2::new(dx, dy));
    None
}

fn apply_pointer(run: &mut RunState, camera: &mut Camera2D, event: PointerEvent) {
    match event.kind {
        PointerKind::Move => {
            if run.panning {
                camera.pan_pixels(event.position - run.pointer);
            }
            run.pointer = event.position;
        }
        PointerKind::ButtonDown | PointerKind::ButtonUp => {
            let held = event.kind == PointerKind::ButtonDown;
            match event.button {
                Some(PointerButton::Left) => run.painting = held,
                Some(PointerButton::Right) => run.panning = held,
                _ => {}
            }
        }
        PointerKind::Scroll => camera.zoom(event.scroll.y),
    }
}

/// Translates a winit window event. `pointer` is the last known cursor
/// position, used for button and scroll events that carry none.
pub fn translate(event: &WindowEvent, pointer: Vector2<f32>) -> Option<ViewerEvent> {
    let pointer_event = |kind, position, button, scroll| {
        Some(ViewerEvent::Pointer(PointerEvent {
            kind,
            position,
            button,
            scroll,
        }))
    };

    match event {
        WindowEvent::CloseRequested => Some(ViewerEvent::CloseRequested),
        WindowEvent::Resized(size) => Some(ViewerEvent::Resized {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat,
                    ..
                },
            ..
        } => {
            let key = match code {
                KeyCode::Escape => Key::Escape,
                KeyCode::Space if !repeat => Key::Space,
                KeyCode::ArrowLeft => Key::Left,
                KeyCode::ArrowRight => Key::Right,
                KeyCode::ArrowUp => Key::Up,
                KeyCode::ArrowDown => Key::Down,
                _ => return None,
            };
            let kind = match state {
                ElementState::Pressed => KeyKind::Press,
                ElementState::Released => KeyKind::Release,
            };
            Some(ViewerEvent::Keyboard { kind, key })
        }
        WindowEvent::CursorMoved { position, .. } => pointer_event(
            PointerKind::Move,
            Vector2::new(position.x as f32, position.y as f32),
            None,
            Vector2::new(0.0, 0.0),
        ),
        WindowEvent::MouseInput { state, button, .. } => {
            let button = match button {
                MouseButton::Left => PointerButton::Left,
                MouseButton::Right => PointerButton::Right,
                MouseButton::Middle => PointerButton::Middle,
                _ => return None,
            };
            let kind = match state {
                ElementState::Pressed => PointerKind::ButtonDown,
                ElementState::Released => PointerKind::ButtonUp,
            };
            pointer_event(kind, pointer, Some(button), Vector2::new(0.0, 0.0))
        }
        WindowEvent::MouseWheel { delta, .. } => {
            pointer_event(PointerKind::Scroll, pointer, None, scroll_lines(delta))
        }
        _ => None,
    }
}

/// Scroll amount in lines. Trackpads report pixels, which are converted at a
/// fixed line height.
pub fn scroll_lines(delta: &MouseScrollDelta) -> Vector2<f32> {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vector2::new(*x, *y),
        MouseScrollDelta::PixelDelta(position) => {
            Vector2::new(position.x as f32, position.y as f32) / PIXELS_PER_SCROLL_LINE
        }
    }
}
