//! Resampled blits.
//!
//! The sampling strategy and the blend-vs-store decision are fixed once per
//! call: every mode is its own [`Sampler`] type and the pixel loop is
//! monomorphized over it and over a `BLEND` const.

use crate::coords::{Fixed, IntRect, Rect};
use crate::paint::Color;
use crate::surface::{Bitmap, PixelFormat, Surface};

use super::Painter;

/// Resampling policy of [`Painter::draw_scaled_bitmap`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ScalingMode {
    /// Nearest source pixel; exact multiples use block replication.
    #[default]
    NearestNeighbor,
    /// Nearest source pixel, blending only where a destination pixel
    /// straddles a source pixel boundary.
    SmoothPixels,
    /// Bilinear interpolation of the four nearest source pixels.
    BilinearBlend,
    /// Area-weighted average of every source pixel under the destination
    /// pixel's footprint. Best for downscaling.
    BoxSampling,
    /// No resampling: the destination shows a same-size crop of the source.
    None,
}

/// Shared stepping state: destination physical rect, source physical rect,
/// and the 32.32 source step per destination pixel.
#[derive(Debug, Copy, Clone)]
struct Mapping {
    dst: IntRect,
    /// Source physical pixels that may be read.
    bounds: IntRect,
    left: Fixed,
    top: Fixed,
    hscale: Fixed,
    vscale: Fixed,
    format: PixelFormat,
}

impl Mapping {
    fn new(dst: IntRect, src: Rect, bounds: IntRect, format: PixelFormat) -> Self {
        Self {
            dst,
            bounds,
            left: Fixed::from_f64(src.x as f64),
            top: Fixed::from_f64(src.y as f64),
            hscale: Fixed::from_f64(src.width as f64).div_int(dst.width as i64),
            vscale: Fixed::from_f64(src.height as f64).div_int(dst.height as i64),
            format,
        }
    }

    /// Source coordinate of the left/top edge of destination pixel `x`/`y`.
    #[inline]
    fn src_x(&self, x: i32) -> Fixed {
        self.hscale.mul_int((x - self.dst.x) as i64) + self.left
    }

    #[inline]
    fn src_y(&self, y: i32) -> Fixed {
        self.vscale.mul_int((y - self.dst.y) as i64) + self.top
    }

    #[inline]
    fn clamp_x(&self, v: i64) -> i32 {
        v.clamp(self.bounds.x as i64, self.bounds.right() as i64 - 1) as i32
    }

    #[inline]
    fn clamp_y(&self, v: i64) -> i32 {
        v.clamp(self.bounds.y as i64, self.bounds.bottom() as i64 - 1) as i32
    }

    #[inline]
    fn get(&self, source: &Bitmap, x: i32, y: i32) -> Color {
        Color::from_pixel(source.pixel(x, y), self.format)
    }
}

trait Sampler {
    fn sample(&self, source: &Bitmap, x: i32, y: i32) -> Option<Color>;
}

struct NearestSampler(Mapping);

impl Sampler for NearestSampler {
    #[inline]
    fn sample(&self, source: &Bitmap, x: i32, y: i32) -> Option<Color> {
        let m = &self.0;
        // Sample at the destination pixel center.
        let sx = m.clamp_x((m.src_x(x) + Fixed(m.hscale.0 / 2)).floor());
        let sy = m.clamp_y((m.src_y(y) + Fixed(m.vscale.0 / 2)).floor());
        Some(m.get(source, sx, sy))
    }
}

struct BilinearSampler {
    m: Mapping,
    offset_x: Fixed,
    offset_y: Fixed,
}

impl BilinearSampler {
    fn new(m: Mapping) -> Self {
        // Shift pixel-edge coordinates so pixel centers line up:
        // half a source step minus half a source pixel.
        Self {
            m,
            offset_x: Fixed((m.hscale.0 - Fixed::ONE.0) / 2),
            offset_y: Fixed((m.vscale.0 - Fixed::ONE.0) / 2),
        }
    }
}

impl Sampler for BilinearSampler {
    #[inline]
    fn sample(&self, source: &Bitmap, x: i32, y: i32) -> Option<Color> {
        let m = &self.m;
        let fx = m.src_x(x) + self.offset_x;
        let fy = m.src_y(y) + self.offset_y;
        let (x0, x1) = (m.clamp_x(fx.floor()), m.clamp_x(fx.floor() + 1));
        let (y0, y1) = (m.clamp_y(fy.floor()), m.clamp_y(fy.floor() + 1));
        let (rx, ry) = (fx.fract(), fy.fract());

        let top = m.get(source, x0, y0).mixed_with(m.get(source, x1, y0), rx);
        let bottom = m.get(source, x0, y1).mixed_with(m.get(source, x1, y1), rx);
        Some(top.mixed_with(bottom, ry))
    }
}

struct SmoothPixelsSampler(Mapping);

impl SmoothPixelsSampler {
    /// Source pixels `(p0, p1)` under one destination pixel starting at
    /// `start` with extent `step`, and the weight of `p1`.
    #[inline]
    fn axis(start: Fixed, step: Fixed, clamp: impl Fn(i64) -> i32) -> (i32, i32, f32) {
        let end = start + step;
        let last = Fixed(end.0 - 1).floor();
        let boundary = Fixed::from_int(last as i32);
        if start >= boundary || step.0 <= 0 {
            let p = clamp(start.floor());
            return (p, p, 0.0);
        }
        // Weight by the share of the destination pixel past the boundary.
        let ratio = ((end - boundary).to_f64() / step.to_f64()).clamp(0.0, 1.0) as f32;
        (clamp(last - 1), clamp(last), ratio)
    }
}

impl Sampler for SmoothPixelsSampler {
    #[inline]
    fn sample(&self, source: &Bitmap, x: i32, y: i32) -> Option<Color> {
        let m = &self.0;
        let (x0, x1, rx) = Self::axis(m.src_x(x), m.hscale, |v| m.clamp_x(v));
        let (y0, y1, ry) = Self::axis(m.src_y(y), m.vscale, |v| m.clamp_y(v));

        let top = m.get(source, x0, y0).mixed_with(m.get(source, x1, y0), rx);
        let bottom = m.get(source, x0, y1).mixed_with(m.get(source, x1, y1), rx);
        Some(top.mixed_with(bottom, ry))
    }
}

struct BoxSampler {
    m: Mapping,
    src: Rect,
    pixel_w: f32,
    pixel_h: f32,
}

impl Sampler for BoxSampler {
    fn sample(&self, source: &Bitmap, x: i32, y: i32) -> Option<Color> {
        let m = &self.m;
        let footprint = Rect::new(
            self.src.x + (x - m.dst.x) as f32 * self.pixel_w,
            self.src.y + (y - m.dst.y) as f32 * self.pixel_h,
            self.pixel_w,
            self.pixel_h,
        );
        let cover = footprint.enclosing_int_rect().intersected(m.bounds);

        let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
        let mut weighted_alpha = 0.0f32;
        let mut covered = 0.0f32;
        for sy in cover.y..cover.bottom() {
            for sx in cover.x..cover.right() {
                let pixel = Rect::new(sx as f32, sy as f32, 1.0, 1.0);
                let Some(overlap) = footprint.intersection(pixel) else { continue };
                let area = overlap.area();
                let c = m.get(source, sx, sy);
                let w = area * c.a as f32 / 255.0;
                r += c.r as f32 * w;
                g += c.g as f32 * w;
                b += c.b as f32 * w;
                weighted_alpha += w;
                covered += area;
            }
        }
        if weighted_alpha <= 0.0 || covered <= 0.0 {
            return None;
        }

        let ch = |v: f32| (v / weighted_alpha).round().clamp(0.0, 255.0) as u8;
        let a = (weighted_alpha / covered * 255.0).round().clamp(0.0, 255.0) as u8;
        Some(Color::from_rgba(ch(r), ch(g), ch(b), a))
    }
}

/// Writes `color` over `dst` in `format`, either blending or storing.
#[inline]
fn put<const BLEND: bool>(dst: &mut u32, color: Color, format: PixelFormat) {
    if BLEND {
        *dst = Color::from_pixel(*dst, format).blend(color).to_pixel(format);
    } else {
        *dst = color.to_pixel(format);
    }
}

/// How source alpha and the call's opacity combine into the written alpha.
#[derive(Debug, Copy, Clone)]
pub(super) struct SourceAlpha {
    pub(super) opacity: f32,
    /// When false, samples count as opaque before `opacity` applies.
    pub(super) apply_alpha: bool,
}

impl SourceAlpha {
    #[inline]
    fn apply(self, c: Color) -> Color {
        let c = if self.apply_alpha { c } else { c.with_alpha(255) };
        if self.opacity < 1.0 { c.with_opacity(self.opacity) } else { c }
    }

    /// Whether writes must blend rather than store.
    #[inline]
    fn blends(self, source: &Bitmap) -> bool {
        self.opacity < 1.0 || (self.apply_alpha && source.has_alpha_channel())
    }
}

fn resample<S: Sampler, const BLEND: bool>(
    target: &mut dyn Surface,
    clipped: IntRect,
    source: &Bitmap,
    sampler: &S,
    alpha: SourceAlpha,
) {
    let format = target.format();
    for y in clipped.y..clipped.bottom() {
        let row = target.scanline_mut(y);
        for x in clipped.x..clipped.right() {
            let Some(c) = sampler.sample(source, x, y) else { continue };
            put::<BLEND>(&mut row[x as usize], alpha.apply(c), format);
        }
    }
}

/// Replicates every source pixel of `src` into an `hf × vf` block of `dst`.
#[inline(always)]
fn replicate_blocks<const BLEND: bool>(
    target: &mut dyn Surface,
    dst: IntRect,
    source: &Bitmap,
    src: IntRect,
    hf: i32,
    vf: i32,
    alpha: SourceAlpha,
) {
    let (tf, sf) = (target.format(), source.format());
    for sy in 0..src.height {
        for dy in 0..vf {
            let row = target.scanline_mut(dst.y + sy * vf + dy);
            for sx in 0..src.width {
                let c = alpha.apply(Color::from_pixel(source.pixel(src.x + sx, src.y + sy), sf));
                let base = (dst.x + sx * hf) as usize;
                for px in &mut row[base..base + hf as usize] {
                    put::<BLEND>(px, c, tf);
                }
            }
        }
    }
}

fn replicate_fixed<const H: i32, const V: i32, const BLEND: bool>(
    target: &mut dyn Surface,
    dst: IntRect,
    source: &Bitmap,
    src: IntRect,
    alpha: SourceAlpha,
) {
    replicate_blocks::<BLEND>(target, dst, source, src, H, V, alpha);
}

fn replicate<const BLEND: bool>(
    target: &mut dyn Surface,
    dst: IntRect,
    source: &Bitmap,
    src: IntRect,
    alpha: SourceAlpha,
) {
    let hf = dst.width / src.width;
    let vf = dst.height / src.height;
    log::trace!("draw_scaled_bitmap: {hf}x{vf} replication");
    match (hf, vf) {
        (2, 2) => replicate_fixed::<2, 2, BLEND>(target, dst, source, src, alpha),
        (3, 3) => replicate_fixed::<3, 3, BLEND>(target, dst, source, src, alpha),
        (4, 4) => replicate_fixed::<4, 4, BLEND>(target, dst, source, src, alpha),
        _ => replicate_blocks::<BLEND>(target, dst, source, src, hf, vf, alpha),
    }
}

fn draw_resampled<const BLEND: bool>(
    target: &mut dyn Surface,
    dst: IntRect,
    clipped: IntRect,
    source: &Bitmap,
    src: Rect,
    bounds: IntRect,
    alpha: SourceAlpha,
    mode: ScalingMode,
) {
    let src_int = src.enclosing_int_rect();
    let exact = dst == clipped
        && src.is_integral()
        && src_int == bounds
        && dst.width % src_int.width == 0
        && dst.height % src_int.height == 0;
    if matches!(mode, ScalingMode::NearestNeighbor | ScalingMode::SmoothPixels) && exact {
        return replicate::<BLEND>(target, dst, source, src_int, alpha);
    }

    let m = Mapping::new(dst, src, bounds, source.format());
    match mode {
        ScalingMode::BoxSampling => {
            let sampler = BoxSampler {
                m,
                src,
                pixel_w: src.width / dst.width as f32,
                pixel_h: src.height / dst.height as f32,
            };
            resample::<_, BLEND>(target, clipped, source, &sampler, alpha)
        }
        ScalingMode::BilinearBlend => {
            resample::<_, BLEND>(target, clipped, source, &BilinearSampler::new(m), alpha)
        }
        ScalingMode::SmoothPixels => {
            resample::<_, BLEND>(target, clipped, source, &SmoothPixelsSampler(m), alpha)
        }
        ScalingMode::NearestNeighbor | ScalingMode::None => {
            resample::<_, BLEND>(target, clipped, source, &NearestSampler(m), alpha)
        }
    }
}

impl Painter<'_> {
    /// Draws the `src_rect` part of `source` (logical source coordinates,
    /// fractional allowed) stretched over `dst_rect`.
    pub fn draw_scaled_bitmap(
        &mut self,
        dst_rect: IntRect,
        source: &Bitmap,
        src_rect: Rect,
        opacity: f32,
        mode: ScalingMode,
    ) {
        let alpha = SourceAlpha { opacity, apply_alpha: true };
        self.draw_resampled_bitmap(dst_rect, source, src_rect, alpha, mode);
    }

    pub(super) fn draw_resampled_bitmap(
        &mut self,
        dst_rect: IntRect,
        source: &Bitmap,
        src_rect: Rect,
        alpha: SourceAlpha,
        mode: ScalingMode,
    ) {
        let SourceAlpha { opacity, apply_alpha } = alpha;
        if dst_rect.is_empty() || src_rect.is_empty() || !src_rect.is_finite() || opacity <= 0.0 {
            return;
        }

        let int_src = src_rect.enclosing_int_rect();
        let same_size = dst_rect.size() == int_src.size();
        if self.scale() == source.scale() && src_rect.is_integral() && same_size {
            return self.blit(dst_rect.location(), source, int_src, opacity, apply_alpha);
        }
        if mode == ScalingMode::None {
            let crop = IntRect::new(
                src_rect.x as i32,
                src_rect.y as i32,
                dst_rect.width,
                dst_rect.height,
            );
            if self.scale() >= source.scale() {
                return self.blit(dst_rect.location(), source, crop, opacity, apply_alpha);
            }
            let nearest = ScalingMode::NearestNeighbor;
            return self.draw_resampled_bitmap(dst_rect, source, Rect::from(crop), alpha, nearest);
        }

        let dst = self.to_physical(dst_rect);
        let clipped = dst.intersected(self.physical_clip());
        if clipped.is_empty() {
            return;
        }
        let src = src_rect.scaled(source.scale() as f32);
        let bounds = src.enclosing_int_rect().intersected(source.physical_rect());
        if bounds.is_empty() {
            return;
        }

        let target = &mut *self.target;
        if alpha.blends(source) {
            draw_resampled::<true>(target, dst, clipped, source, src, bounds, alpha, mode);
        } else {
            draw_resampled::<false>(target, dst, clipped, source, src, bounds, alpha, mode);
        }
    }
}
