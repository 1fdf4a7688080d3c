use super::Color;

/// Axis along which a gradient varies.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; stops are sorted by `Gradient::new`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient spanning the rectangle it fills.
///
/// Semantics:
/// - `t = 0` is the left (horizontal) or top (vertical) edge.
/// - Outside the first/last stop the edge color is held.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub orientation: Orientation,
    pub stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(orientation: Orientation, mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { orientation, stops }
    }

    /// Two-stop gradient from `start` to `end`.
    pub fn linear(orientation: Orientation, start: Color, end: Color) -> Self {
        Self::new(orientation, vec![ColorStop::new(0.0, start), ColorStop::new(1.0, end)])
    }

    /// Returns true when the gradient has at least one stop and all
    /// positions are finite.
    pub fn is_valid(&self) -> bool {
        !self.stops.is_empty() && self.stops.iter().all(|s| s.t.is_finite())
    }

    /// Color at position `t`.
    pub fn color_at(&self, t: f32) -> Color {
        let Some(first) = self.stops.first() else {
            return Color::TRANSPARENT;
        };
        if t <= first.t {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.mixed_with(b.color, (t - a.t) / span);
            }
        }
        self.stops.last().map_or(first.color, |s| s.color)
    }
}
