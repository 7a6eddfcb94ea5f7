//! # Rendering Module
//!
//! Macroquad drawing of the town, map and combat screens.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
