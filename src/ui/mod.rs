//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the grid.
//!
//! - [`UiManager`] - imgui context, winit input glue and wgpu renderer
//! - [`panel`] - the settings window with frame figures and play controls
//!
//! The manager sees every window event before the viewer does. When imgui
//! wants the pointer or keyboard the event is claimed and the viewer's own
//! handling is skipped, so clicking a button never paints the grid beneath it.

pub mod manager;
pub mod panel;

pub use manager::{claimed, input_kind, InputKind, UiManager};
pub use panel::{settings_panel, PanelInfo};
