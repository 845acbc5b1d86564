use crate::biomes::offset;
use crate::buffer::PixelBuffer;
use crate::color::{Palette, adjust_color, lerp_color};
use crate::noise::Fbm;

const TERRAIN: Fbm = Fbm::new(5, 2.0, 0.5).amplified();
const CRACKS: Fbm = Fbm::new(4, 2.0, 0.5).amplified();
const HOTSPOTS: Fbm = Fbm::new(3, 2.0, 0.5).amplified();

/// Step used for the crack field's finite differences, in noise space
pub const CRACK_EPSILON: f64 = 0.01;

/// Scaled gradient magnitude above which a crack starts to glow
pub const CRACK_THRESHOLD: f64 = 0.8;

/// Hotspot field value above which the surface glows
pub const HOTSPOT_THRESHOLD: f64 = 0.3;

/// Magma blend factor for thin cracks where the crack field is steep
fn crack_intensity(u: f64, v: f64, s: f64) -> f64 {
    let gradient = CRACKS.central_difference(u * 12.0 + s, v * 12.0 + s, CRACK_EPSILON) * 50.0;
    if gradient > CRACK_THRESHOLD {
        ((gradient - CRACK_THRESHOLD) * 3.0).min(1.0) * 0.8
    } else {
        0.0
    }
}

/// Magma blend factor for the broad, soft hotspot glow
fn hotspot_glow(u: f64, v: f64, s: f64) -> f64 {
    let hotspot = HOTSPOTS.sample(u * 5.0 + 300.0 + s, v * 5.0 + 300.0 + s);
    if hotspot > HOTSPOT_THRESHOLD {
        ((hotspot - HOTSPOT_THRESHOLD) * 2.0).min(1.0) * 0.4
    } else {
        0.0
    }
}

/// Paint dark rock split by magma cracks and warmed by hotspots
///
/// # Arguments
///
/// * `buffer` - Target buffer, fully overwritten
/// * `palette` - Base is the rock color, secondary is the magma color
/// * `seed` - Shifts every noise field so palettes differ
pub fn paint(buffer: &mut PixelBuffer, palette: &Palette, seed: u32) {
    let rock = palette.base;
    let scorched = adjust_color(rock, -40);
    let magma = palette.secondary;
    let s = offset(seed);

    buffer.shade_uv(|u, v| {
        let terrain = TERRAIN.sample(u * 10.0 + s, v * 10.0 + s);
        let mut color = lerp_color(scorched, rock, (terrain + 1.0) * 0.5);

        let crack = crack_intensity(u, v, s);
        if crack > 0.0 {
            color = lerp_color(color, magma, crack);
        }

        let glow = hotspot_glow(u, v, s);
        if glow > 0.0 {
            color = lerp_color(color, magma, glow);
        }

        color
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn test_blend_factors_stay_bounded() {
        let mut cracked = 0;
        for y in 0..64 {
            for x in 0..64 {
                let (u, v) = (x as f64 / 64.0, y as f64 / 64.0);
                let crack = crack_intensity(u, v, 12.0);
                let glow = hotspot_glow(u, v, 12.0);
                assert!((0.0..=0.8).contains(&crack), "Crack {} out of range", crack);
                assert!((0.0..=0.4).contains(&glow), "Glow {} out of range", glow);
                cracked += (crack > 0.0) as u32;
            }
        }
        assert!(cracked > 0, "Expected at least one crack over the sampled grid");
    }

    #[test]
    fn test_magma_shows_through() {
        let rock = Rgb::new(60, 40, 40);
        let magma = Rgb::new(255, 90, 0);
        let palette = Palette::new(rock, magma);

        let mut buffer = PixelBuffer::new(64);
        paint(&mut buffer, &palette, 77);

        let hottest = buffer.as_pixels().iter().map(|p| p[0]).max().unwrap_or(0);
        assert!(hottest > rock.r + 20, "Magma should brighten some pixels, max red {}", hottest);
        assert!(buffer.as_pixels().iter().all(|p| p[3] == 255));
    }

    #[test]
    fn test_channels_within_palette_span() {
        let rock = Rgb::new(90, 80, 70);
        let magma = Rgb::new(250, 120, 20);
        let mut buffer = PixelBuffer::new(48);
        paint(&mut buffer, &Palette::new(rock, magma), 5);

        let scorched = adjust_color(rock, -40);
        for pixel in buffer.as_pixels() {
            assert!(pixel[0] >= scorched.r && pixel[0] <= magma.r, "Red {} outside span", pixel[0]);
            assert!(pixel[2] <= rock.b, "Blue {} should never exceed the rock", pixel[2]);
        }
    }
}
