//! Vector overlay drawing for crater and storm post-passes
//!
//! Generators paint their base noise field straight into a [`PixelBuffer`].
//! Features that need shapes (rims, radial gradients, soft shadows) go
//! through the [`VectorOverlay`] trait instead, so the same biome code runs
//! against any surface that can draw them. [`RasterCanvas`] is the built-in
//! software implementation and works on any thread.

use glam::Vec2;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;

/// One color stop of a radial gradient
///
/// Stops with `alpha == 0.0` are fully transparent. Interpolation between
/// stops happens on premultiplied color, so fading to transparent never
/// darkens toward black.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient radius, 0.0 at the center to 1.0 at the edge
    pub offset: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl GradientStop {
    pub const fn opaque(offset: f32, color: Rgb) -> Self {
        GradientStop { offset, color, alpha: 1.0 }
    }

    pub const fn transparent(offset: f32) -> Self {
        GradientStop {
            offset,
            color: Rgb::new(0, 0, 0),
            alpha: 0.0,
        }
    }
}

/// A drawing surface that supports the overlay shapes biomes use
pub trait VectorOverlay {
    /// Alpha multiplied into every subsequent draw, clamped to [0, 1]
    fn set_global_alpha(&mut self, alpha: f32);

    /// Stroke a circle outline centered on the circle's radius
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgb);

    /// Fill a solid circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);

    /// Fill an axis-aligned ellipse with a circular radial gradient
    ///
    /// The gradient runs from `center` out to `gradient_radius`; the ellipse
    /// with half-axes `radii` clips it. Pixels past the last stop take the
    /// last stop's color.
    fn fill_radial_ellipse(&mut self, center: Vec2, radii: Vec2, gradient_radius: f32, stops: &[GradientStop]);
}

/// Software rasterizer drawing onto a [`PixelBuffer`]
///
/// Shapes are sampled at pixel centers with a one-pixel anti-aliased edge
/// and composited source-over. The buffer stays opaque.
pub struct RasterCanvas<'a> {
    buffer: &'a mut PixelBuffer,
    global_alpha: f32,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        RasterCanvas {
            buffer,
            global_alpha: 1.0,
        }
    }

    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    /// Clip a bounding box to the buffer, as inclusive pixel ranges
    fn bounds(&self, center: Vec2, extent: Vec2) -> Option<(u32, u32, u32, u32)> {
        let res = self.buffer.resolution() as f32;
        let min = (center - extent - Vec2::ONE).max(Vec2::ZERO);
        let max = (center + extent + Vec2::ONE).min(Vec2::splat(res - 1.0));
        if !(min.x <= max.x && min.y <= max.y) || res < 1.0 {
            return None;
        }
        Some((min.x.floor() as u32, min.y.floor() as u32, max.x.ceil() as u32, max.y.ceil() as u32))
    }

    /// Composite `color` at `(x, y)` with the given source alpha
    fn blend(&mut self, x: u32, y: u32, color: Rgb, alpha: f32) {
        let alpha = (alpha * self.global_alpha).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let Some([r, g, b, _]) = self.buffer.pixel(x, y) else {
            return;
        };
        let mix = |dst: u8, src: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        self.buffer
            .put_pixel(x, y, Rgb::new(mix(r, color.r), mix(g, color.g), mix(b, color.b)));
    }

    /// Visit every pixel center in a clipped box
    fn for_each_center<F>(&mut self, center: Vec2, extent: Vec2, mut visit: F)
    where
        F: FnMut(&mut Self, u32, u32, Vec2),
    {
        let Some((x0, y0, x1, y1)) = self.bounds(center, extent) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let point = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                visit(self, x, y, point);
            }
        }
    }
}

/// Sample a gradient at `t` in [0, 1], returning straight color and alpha
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> (Rgb, f32) {
    let Some(first) = stops.first() else {
        return (Rgb::default(), 0.0);
    };
    if t <= first.offset {
        return (first.color, first.alpha);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let k = ((t - a.offset) / span).clamp(0.0, 1.0);
            let alpha = a.alpha + (b.alpha - a.alpha) * k;
            if alpha <= 0.0 {
                return (a.color, 0.0);
            }
            // Premultiplied interpolation, then back to straight color
            let channel = |ca: u8, cb: u8| {
                let pa = ca as f32 * a.alpha;
                let pb = cb as f32 * b.alpha;
                ((pa + (pb - pa) * k) / alpha).round().clamp(0.0, 255.0) as u8
            };
            let color = Rgb::new(
                channel(a.color.r, b.color.r),
                channel(a.color.g, b.color.g),
                channel(a.color.b, b.color.b),
            );
            return (color, alpha);
        }
    }
    let last = stops[stops.len() - 1];
    (last.color, last.alpha)
}

impl VectorOverlay for RasterCanvas<'_> {
    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgb) {
        let half = line_width.max(0.0) * 0.5;
        let extent = Vec2::splat(radius + half);
        self.for_each_center(center, extent, |canvas, x, y, point| {
            let distance = (point.distance(center) - radius).abs();
            let coverage = (half - distance + 0.5).clamp(0.0, 1.0);
            canvas.blend(x, y, color, coverage);
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.for_each_center(center, Vec2::splat(radius), |canvas, x, y, point| {
            let coverage = (radius - point.distance(center) + 0.5).clamp(0.0, 1.0);
            canvas.blend(x, y, color, coverage);
        });
    }

    fn fill_radial_ellipse(&mut self, center: Vec2, radii: Vec2, gradient_radius: f32, stops: &[GradientStop]) {
        if radii.x <= 0.0 || radii.y <= 0.0 || stops.is_empty() {
            return;
        }
        let gradient_radius = gradient_radius.max(f32::EPSILON);
        let min_radius = radii.x.min(radii.y);
        self.for_each_center(center, radii, |canvas, x, y, point| {
            let offset = point - center;
            // Normalized ellipse distance, converted to an approximate pixel edge distance
            let normalized = (offset / radii).length();
            let coverage = ((1.0 - normalized) * min_radius + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                return;
            }
            let t = (offset.length() / gradient_radius).clamp(0.0, 1.0);
            let (color, alpha) = sample_gradient(stops, t);
            canvas.blend(x, y, color, alpha * coverage);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_buffer(resolution: u32) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(resolution);
        buffer.fill(Rgb::new(100, 100, 100));
        buffer
    }

    #[test]
    fn test_fill_circle_covers_center_not_corners() {
        let mut buffer = gray_buffer(32);
        let mut canvas = RasterCanvas::new(&mut buffer);
        canvas.fill_circle(Vec2::new(16.0, 16.0), 6.0, Rgb::WHITE);

        assert_eq!(buffer.rgb(16, 16), Some(Rgb::WHITE));
        assert_eq!(buffer.rgb(0, 0), Some(Rgb::new(100, 100, 100)));
        assert_eq!(buffer.rgb(16, 25), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn test_stroke_circle_leaves_inside_untouched() {
        let mut buffer = gray_buffer(64);
        let mut canvas = RasterCanvas::new(&mut buffer);
        canvas.stroke_circle(Vec2::new(32.0, 32.0), 20.0, 3.0, Rgb::WHITE);

        assert_eq!(buffer.rgb(32, 32), Some(Rgb::new(100, 100, 100)), "Ring interior should be untouched");
        // Pixel center (52.5, 32.5) sits half a pixel off the ring radius
        assert_eq!(buffer.rgb(52, 32), Some(Rgb::WHITE));
        assert_eq!(buffer.rgb(60, 32), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut buffer = gray_buffer(16);
        let mut canvas = RasterCanvas::new(&mut buffer);
        canvas.set_global_alpha(0.5);
        canvas.fill_circle(Vec2::new(8.0, 8.0), 4.0, Rgb::new(200, 200, 200));
        assert_eq!(buffer.rgb(8, 8), Some(Rgb::new(150, 150, 150)));
        assert!(buffer.as_pixels().iter().all(|p| p[3] == 255), "Canvas must stay opaque");
    }

    #[test]
    fn test_shapes_clip_at_buffer_edges() {
        let mut buffer = gray_buffer(8);
        let mut canvas = RasterCanvas::new(&mut buffer);
        canvas.fill_circle(Vec2::new(-2.0, -2.0), 5.0, Rgb::WHITE);
        canvas.stroke_circle(Vec2::new(40.0, 40.0), 3.0, 2.0, Rgb::WHITE);
        canvas.fill_radial_ellipse(Vec2::new(9.0, 4.0), Vec2::new(4.0, 2.0), 4.0, &[GradientStop::opaque(0.0, Rgb::WHITE)]);
        assert_eq!(buffer.rgb(0, 0), Some(Rgb::WHITE));
        assert_eq!(buffer.rgb(7, 7), Some(Rgb::new(100, 100, 100)));
    }

    #[test]
    fn test_radial_gradient_fades_to_transparent() {
        let mut buffer = gray_buffer(64);
        let mut canvas = RasterCanvas::new(&mut buffer);
        let stops = [
            GradientStop::opaque(0.0, Rgb::new(250, 250, 250)),
            GradientStop::opaque(0.5, Rgb::new(200, 200, 200)),
            GradientStop::transparent(1.0),
        ];
        canvas.fill_radial_ellipse(Vec2::new(32.0, 32.0), Vec2::new(20.0, 12.0), 20.0, &stops);

        let center = buffer.rgb(32, 32).unwrap();
        assert!(center.r > 240, "Center should take the first stop, got {:?}", center);
        let rim = buffer.rgb(50, 32).unwrap();
        assert!(rim.r >= 100 && rim.r < 140, "Edge should fade toward the background, got {:?}", rim);
        assert_eq!(buffer.rgb(32, 50), Some(Rgb::new(100, 100, 100)), "Outside the ellipse is untouched");
    }

    #[test]
    fn test_sample_gradient_premultiplied() {
        let stops = [GradientStop::opaque(0.0, Rgb::new(200, 100, 50)), GradientStop::transparent(1.0)];
        let (color, alpha) = sample_gradient(&stops, 0.5);
        assert_eq!(color, Rgb::new(200, 100, 50), "Fading out keeps the hue");
        assert!((alpha - 0.5).abs() < 1e-6);

        let (_, alpha) = sample_gradient(&stops, 1.0);
        assert_eq!(alpha, 0.0);
        assert_eq!(sample_gradient(&[], 0.3).1, 0.0);
    }
}
