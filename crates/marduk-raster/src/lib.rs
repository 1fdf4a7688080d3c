//! Marduk raster crate.
//!
//! A software 2D painter: primitive shapes, resampled bitmap blits and
//! bidi-aware text, drawn into any [`surface::Surface`] under a stack of
//! translation/clip/draw-op state.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod painter;
pub mod surface;
pub mod text;

pub use coords::{AffineTransform, CornerRadii, IntPoint, IntRect, IntSize, Rect, Vec2};
pub use paint::Color;
pub use painter::{DrawOp, Painter, PainterStateSaver, ScalingMode, Stroke, TextAlignment};
pub use surface::{Bitmap, PixelFormat, Surface};
