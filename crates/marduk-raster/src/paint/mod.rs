//! Paint model shared by the rasterizer, blit engine and text painter.
//!
//! Scope:
//! - color representation (straight alpha, 8 bits per channel)
//! - gradient fills
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorStop, Gradient, Orientation};
