use crate::biomes::offset;
use crate::buffer::PixelBuffer;
use crate::color::{Palette, Rgb, adjust_color, lerp_color};
use crate::noise::Fbm;

/// Elevation of the shoreline in raw fBm units
pub const SEA_LEVEL: f64 = 0.05;

/// Color of polar caps and high snow
pub const ICE: Rgb = Rgb::new(230, 240, 255);

const CONTINENTS: Fbm = Fbm::new(6, 2.1, 0.5);
const DETAIL: Fbm = Fbm::new(4, 2.0, 0.5);
const ICE_EDGE: Fbm = Fbm::new(3, 2.0, 0.5);
const CLOUDS: Fbm = Fbm::new(4, 2.5, 0.5);

/// Surface tones derived from the caller's ocean and land colors
#[derive(Debug, Clone, Copy)]
struct Surface {
    deep_ocean: Rgb,
    ocean: Rgb,
    land: Rgb,
    highland: Rgb,
    desert: Rgb,
}

impl Surface {
    fn new(palette: &Palette) -> Self {
        let ocean = palette.base;
        let land = palette.secondary;
        Surface {
            deep_ocean: adjust_color(ocean, -40),
            ocean,
            land,
            highland: adjust_color(land, 30),
            desert: adjust_color(land, 50),
        }
    }

    /// Classify an elevation sample into a surface color
    fn shade(&self, elevation: f64, v: f64) -> Rgb {
        if elevation < SEA_LEVEL - 0.1 {
            self.deep_ocean
        } else if elevation < SEA_LEVEL {
            lerp_color(self.deep_ocean, self.ocean, (elevation - SEA_LEVEL + 0.1) * 10.0)
        } else if elevation < SEA_LEVEL + 0.15 {
            lerp_color(self.land, self.highland, (elevation - SEA_LEVEL) / 0.15)
        } else if elevation < SEA_LEVEL + 0.3 {
            lerp_color(self.highland, self.desert, (elevation - SEA_LEVEL - 0.15) / 0.15)
        } else {
            // Snow line drops toward the poles
            let snow_line = 0.1 + (v - 0.5).abs() * 0.3;
            if elevation - SEA_LEVEL > snow_line + 0.45 {
                ICE
            } else {
                adjust_color(self.desert, -20)
            }
        }
    }
}

/// Paint continents, oceans, polar ice and a cloud layer
///
/// The base color is the ocean and the secondary color is the land.
pub fn paint(buffer: &mut PixelBuffer, palette: &Palette, seed: u32) {
    let surface = Surface::new(palette);
    let s = offset(seed);

    buffer.shade_uv(|u, v| {
        let continental = CONTINENTS.sample(u * 5.0 + s, v * 5.0 + s);
        let detail = DETAIL.sample(u * 20.0 + s * 2.0, v * 20.0 + s * 2.0) * 0.15;
        let mut color = surface.shade(continental + detail, v);

        // Ice caps with a noisy, irregular edge
        let lat = (v - 0.5).abs() * 2.0;
        let ice_line = 0.82 + ICE_EDGE.sample(u * 10.0 + 300.0 + s, v * 10.0 + 300.0 + s) * 0.06;
        if lat > ice_line {
            color = lerp_color(color, ICE, ((lat - ice_line) * 10.0).min(1.0));
        }

        let cloud = CLOUDS.sample(u * 8.0 + 500.0 + s, v * 6.0 + 500.0 + s);
        if cloud > 0.15 {
            color = lerp_color(color, Rgb::WHITE, ((cloud - 0.15) * 1.5).min(0.35));
        }

        color
    });
}
