use std::f64::consts::PI;

use crate::biomes::offset;
use crate::buffer::PixelBuffer;
use crate::color::{Palette, lerp_color, scale_color};
use crate::noise::Fbm;

const WISPS: Fbm = Fbm::new(4, 2.0, 0.4).amplified();

/// Paint a smooth pole-to-pole gradient with faint bands and cloud wisps
///
/// The equator is dimmed by up to 15% relative to the poles, which reads as
/// bright polar caps on the rendered sphere.
pub fn paint(buffer: &mut PixelBuffer, palette: &Palette, seed: u32) {
    let s = offset(seed);
    buffer.shade_uv(|u, v| {
        let gradient = (v * PI).sin();
        let bands = (v * 24.0).sin() * 0.08;
        let wisps = WISPS.sample(u * 6.0 + s, v * 4.0 + s) * 0.15;

        let t = gradient * 0.7 + bands + wisps + 0.3;
        let color = lerp_color(palette.base, palette.secondary, t);

        let polar_bright = 1.0 - gradient.max(0.0).sqrt() * 0.15;
        scale_color(color, polar_bright)
    });
}
