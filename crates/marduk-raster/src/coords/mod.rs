//! Coordinate and geometry types shared by the painter and text layout.
//!
//! Canonical space:
//! - Logical pixels (scale-aware); physical = logical × surface scale
//! - Origin top-left
//! - +X right, +Y down
//!
//! Integer rectangles are half-open: `[x, x + width) × [y, y + height)`.

mod affine;
mod corner_radii;
mod fixed;
mod int_rect;
mod rect;
mod vec2;

pub use affine::AffineTransform;
pub use corner_radii::CornerRadii;
pub use fixed::Fixed;
pub use int_rect::{IntPoint, IntRect, IntSize};
pub use rect::Rect;
pub use vec2::Vec2;
