//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/status bars and overlays
//! - `input`: keyboard event handling
//! - `styles`: colors and text styling
//! - `views`: the list and detail views selected by the current route

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
