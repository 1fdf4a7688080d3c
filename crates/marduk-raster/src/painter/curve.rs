//! Curve flattening.
//!
//! Beziers are subdivided on an explicit work stack rather than by call
//! recursion, so pathological control points cost at most `MAX_DEPTH`
//! levels of subdivision and a bounded amount of heap.

use crate::coords::{IntPoint, IntRect, Vec2};

use super::{Painter, Stroke};

/// Upper bound for `max(ux², vx²) + max(uy², vy²)` of an accepted segment.
///
/// The bound keeps the curve within `sqrt(tolerance) / 4` of its chord,
/// about a fifth of a pixel.
pub const FLATNESS_TOLERANCE: f32 = 0.5;

/// Subdivision depth at which a segment is emitted regardless of flatness.
const MAX_DEPTH: u8 = 16;

#[derive(Debug, Copy, Clone)]
struct CubicSegment {
    p1: Vec2,
    c1: Vec2,
    c2: Vec2,
    p2: Vec2,
    depth: u8,
}

impl CubicSegment {
    #[inline]
    fn is_flat(&self) -> bool {
        let u = self.c1 * 3.0 - self.p1 * 2.0 - self.p2;
        let v = self.c2 * 3.0 - self.p1 - self.p2 * 2.0;
        let (ux, uy) = (u.x * u.x, u.y * u.y);
        let (vx, vy) = (v.x * v.x, v.y * v.y);
        ux.max(vx) + uy.max(vy) <= FLATNESS_TOLERANCE
    }

    /// De Casteljau split at `t = 0.5`.
    #[inline]
    fn split(&self) -> (CubicSegment, CubicSegment) {
        let ab = self.p1.midpoint(self.c1);
        let bc = self.c1.midpoint(self.c2);
        let cd = self.c2.midpoint(self.p2);
        let abc = ab.midpoint(bc);
        let bcd = bc.midpoint(cd);
        let mid = abc.midpoint(bcd);
        let depth = self.depth + 1;
        (
            CubicSegment { p1: self.p1, c1: ab, c2: abc, p2: mid, depth },
            CubicSegment { p1: mid, c1: bcd, c2: cd, p2: self.p2, depth },
        )
    }
}

/// Flattens the quadratic curve `p1 → p2` with control point `control`,
/// calling `emit(a, b)` for each line segment in order from `p1` to `p2`.
///
/// The curve is degree-elevated to a cubic first, so a straight input
/// (control on the chord) is emitted as a single segment.
pub fn flatten_quadratic_bezier(control: Vec2, p1: Vec2, p2: Vec2, emit: impl FnMut(Vec2, Vec2)) {
    let c1 = p1 + (control - p1) * (2.0 / 3.0);
    let c2 = p2 + (control - p2) * (2.0 / 3.0);
    flatten_cubic_bezier(c1, c2, p1, p2, emit);
}

/// Flattens the cubic curve `p1 → p2` with control points `c1`, `c2`.
/// Non-finite input emits nothing.
pub fn flatten_cubic_bezier(
    c1: Vec2,
    c2: Vec2,
    p1: Vec2,
    p2: Vec2,
    mut emit: impl FnMut(Vec2, Vec2),
) {
    if !(c1.is_finite() && c2.is_finite() && p1.is_finite() && p2.is_finite()) {
        log::debug!("flatten_cubic_bezier: non-finite input skipped");
        return;
    }

    let mut stack = vec![CubicSegment { p1, c1, c2, p2, depth: 0 }];
    while let Some(seg) = stack.pop() {
        if seg.depth >= MAX_DEPTH || seg.is_flat() {
            emit(seg.p1, seg.p2);
            continue;
        }
        let (first, second) = seg.split();
        // LIFO: push the second half first so output stays in curve order.
        stack.push(second);
        stack.push(first);
    }
}

/// An elliptical arc in center parameterization.
///
/// `theta_1` is the start angle and `theta_delta` the signed sweep, both in
/// radians before the `x_axis_rotation` is applied. `start` and `end` are
/// the arc's endpoints; the last emitted segment ends exactly at `end`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipticalArc {
    pub start: Vec2,
    pub end: Vec2,
    pub center: Vec2,
    pub radii: Vec2,
    pub x_axis_rotation: f32,
    pub theta_1: f32,
    pub theta_delta: f32,
}

/// Flattens `arc` into segments roughly one device pixel long, where
/// `pixels_per_unit` device pixels make one input unit.
///
/// A negative sweep is walked from `end` back to `start`.
pub fn flatten_elliptical_arc(
    arc: &EllipticalArc,
    pixels_per_unit: f32,
    mut emit: impl FnMut(Vec2, Vec2),
) {
    let (a, b) = (arc.radii.x, arc.radii.y);
    if a <= 0.0 || b <= 0.0 || pixels_per_unit <= 0.0 {
        return;
    }
    if !(arc.theta_1.is_finite() && arc.theta_delta.is_finite() && arc.center.is_finite()) {
        return;
    }

    let (mut start, mut end) = (arc.start, arc.end);
    let (mut theta_1, mut theta_delta) = (arc.theta_1 as f64, arc.theta_delta as f64);
    if theta_delta < 0.0 {
        core::mem::swap(&mut start, &mut end);
        theta_1 += theta_delta;
        theta_delta = -theta_delta;
    }

    let largest = a.max(b) as f64 * pixels_per_unit as f64;
    let step = (1.0 / largest).atan();
    let (sin_rot, cos_rot) = arc.x_axis_rotation.sin_cos();
    let rotate = |p: Vec2| Vec2::new(p.x * cos_rot - p.y * sin_rot, p.x * sin_rot + p.y * cos_rot);

    let mut current = start - arc.center;
    let theta_end = theta_1 + theta_delta;
    let mut theta = theta_1;
    while theta <= theta_end {
        let (s, c) = theta.sin_cos();
        let next = rotate(Vec2::new(a * c as f32, b * s as f32));
        emit(current + arc.center, next + arc.center);
        current = next;
        theta += step;
    }
    emit(current + arc.center, end);
}

impl Painter<'_> {
    pub fn draw_quadratic_bezier_curve(
        &mut self,
        control: IntPoint,
        p1: IntPoint,
        p2: IntPoint,
        stroke: &Stroke,
    ) {
        if control == p1 && p1 == p2 {
            return;
        }
        flatten_quadratic_bezier(control.into(), p1.into(), p2.into(), |a, b| {
            self.draw_line(a.round_to_int(), b.round_to_int(), stroke);
        });
    }

    pub fn draw_cubic_bezier_curve(
        &mut self,
        c1: IntPoint,
        c2: IntPoint,
        p1: IntPoint,
        p2: IntPoint,
        stroke: &Stroke,
    ) {
        if c1 == p1 && c2 == p1 && p1 == p2 {
            return;
        }
        flatten_cubic_bezier(c1.into(), c2.into(), p1.into(), p2.into(), |a, b| {
            self.draw_line(a.round_to_int(), b.round_to_int(), stroke);
        });
    }

    pub fn draw_elliptical_arc(&mut self, arc: &EllipticalArc, stroke: &Stroke) {
        if arc.start == arc.end && arc.theta_delta == 0.0 {
            return;
        }
        let ppu = self.scale() as f32;
        flatten_elliptical_arc(arc, ppu, |a, b| {
            self.draw_line(a.round_to_int(), b.round_to_int(), stroke);
        });
    }

    /// Outlines the ellipse inscribed in `rect`.
    pub fn draw_ellipse(&mut self, rect: IntRect, stroke: &Stroke) {
        if rect.is_empty() {
            return;
        }
        // Stroke blocks grow right/down, so the path runs `thickness` inside.
        let t = stroke.thickness.max(1) as f32;
        let radii = Vec2::new((rect.width as f32 - t) / 2.0, (rect.height as f32 - t) / 2.0);
        if radii.x <= 0.0 || radii.y <= 0.0 {
            self.fill_rect(rect, stroke.color);
            return;
        }
        let center = Vec2::new(rect.x as f32 + radii.x, rect.y as f32 + radii.y);
        let start = Vec2::new(center.x + radii.x, center.y);
        let arc = EllipticalArc {
            start,
            end: start,
            center,
            radii,
            x_axis_rotation: 0.0,
            theta_1: 0.0,
            theta_delta: core::f32::consts::TAU,
        };
        self.draw_elliptical_arc(&arc, stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::painter::test_support::*;
    use crate::surface::Surface;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn collect_cubic(c1: Vec2, c2: Vec2, p1: Vec2, p2: Vec2) -> Vec<(Vec2, Vec2)> {
        let mut out = Vec::new();
        flatten_cubic_bezier(c1, c2, p1, p2, |a, b| out.push((a, b)));
        out
    }

    // ── bezier ────────────────────────────────────────────────────────────

    #[test]
    fn segments_are_contiguous_and_ordered() {
        let (p1, p2) = (v(0.0, 0.0), v(100.0, 0.0));
        let segs = collect_cubic(v(10.0, 80.0), v(90.0, -80.0), p1, p2);
        assert!(segs.len() > 4);
        assert_eq!(segs[0].0, p1);
        assert_eq!(segs[segs.len() - 1].1, p2);
        for w in segs.windows(2) {
            assert_eq!(w[0].1, w[1].0);
        }
    }

    #[test]
    fn reflattening_is_idempotent() {
        let mut first = Vec::new();
        let push = |a: Vec2, b: Vec2| first.push((a, b));
        flatten_quadratic_bezier(v(50.0, 90.0), v(0.0, 0.0), v(100.0, 10.0), push);
        assert!(first.len() > 1);

        for &(a, b) in &first {
            let (c1, c2) = (a + (b - a) * (1.0 / 3.0), a + (b - a) * (2.0 / 3.0));
            let again = collect_cubic(c1, c2, a, b);
            assert_eq!(again, vec![(a, b)]);

            let mut quad = Vec::new();
            flatten_quadratic_bezier(a.midpoint(b), a, b, |x, y| quad.push((x, y)));
            assert_eq!(quad, vec![(a, b)]);
        }
    }

    #[test]
    fn pathological_input_is_bounded() {
        let segs = collect_cubic(v(1e9, -1e9), v(-1e9, 1e9), v(0.0, 0.0), v(1.0, 1.0));
        assert!(segs.len() <= 1 << MAX_DEPTH);
        assert!(collect_cubic(v(f32::NAN, 0.0), v(0.0, 0.0), v(0.0, 0.0), v(1.0, 1.0)).is_empty());
    }

    // ── arcs ──────────────────────────────────────────────────────────────

    #[test]
    fn arc_ends_exactly_at_end_point() {
        let arc = EllipticalArc {
            start: v(10.0, 0.0),
            end: v(0.0, 10.0),
            center: v(0.0, 0.0),
            radii: v(10.0, 10.0),
            x_axis_rotation: 0.0,
            theta_1: 0.0,
            theta_delta: core::f32::consts::FRAC_PI_2,
        };
        let mut segs = Vec::new();
        flatten_elliptical_arc(&arc, 1.0, |a, b| segs.push((a, b)));
        assert_eq!(segs[0].0, arc.start);
        assert_eq!(segs[segs.len() - 1].1, arc.end);
        for (a, b) in &segs {
            let d = *b - *a;
            assert!((d.x * d.x + d.y * d.y).sqrt() < 1.5);
        }
    }

    #[test]
    fn negative_sweep_runs_from_end() {
        let arc = EllipticalArc {
            start: v(0.0, 10.0),
            end: v(10.0, 0.0),
            center: v(0.0, 0.0),
            radii: v(10.0, 10.0),
            x_axis_rotation: 0.0,
            theta_1: core::f32::consts::FRAC_PI_2,
            theta_delta: -core::f32::consts::FRAC_PI_2,
        };
        let mut segs = Vec::new();
        flatten_elliptical_arc(&arc, 2.0, |a, b| segs.push((a, b)));
        assert_eq!(segs[0].0, v(10.0, 0.0));
        assert_eq!(segs[segs.len() - 1].1, v(0.0, 10.0));
    }

    // ── painter wrappers ──────────────────────────────────────────────────

    #[test]
    fn coincident_curve_is_noop() {
        let mut b = canvas(8, 8);
        let before = b.clone();
        {
            let mut p = Painter::new(&mut b);
            let q = IntPoint::new(3, 3);
            p.draw_quadratic_bezier_curve(q, q, q, &Stroke::new(Color::RED, 1));
            p.draw_cubic_bezier_curve(q, q, q, q, &Stroke::new(Color::RED, 1));
        }
        assert_eq!(b, before);
    }

    #[test]
    fn straight_quadratic_matches_line() {
        let mut curve = canvas(12, 4);
        let mut line = canvas(12, 4);
        let stroke = Stroke::new(Color::RED, 1);
        Painter::new(&mut curve).draw_quadratic_bezier_curve(
            IntPoint::new(5, 1),
            IntPoint::new(1, 1),
            IntPoint::new(10, 1),
            &stroke,
        );
        Painter::new(&mut line).draw_line(IntPoint::new(1, 1), IntPoint::new(10, 1), &stroke);
        assert_eq!(curve, line);
    }

    #[test]
    fn ellipse_outline_stays_inside_rect() {
        let mut b = canvas(20, 20);
        {
            let mut p = Painter::new(&mut b);
            p.draw_ellipse(IntRect::new(2, 4, 16, 12), &Stroke::new(Color::RED, 1));
        }
        assert!(count(&b, Color::RED) > 20);
        for y in 0..20 {
            for x in 0..20 {
                if b.get_pixel(x, y) == Color::RED {
                    assert!(IntRect::new(2, 4, 16, 12).contains(IntPoint::new(x, y)), "{x},{y}");
                }
            }
        }
        assert_eq!(b.get_pixel(10, 10), Color::WHITE);
    }
}
