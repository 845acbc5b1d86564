use std::f64::consts::PI;

use glam::Vec2;

use crate::biomes::offset;
use crate::buffer::PixelBuffer;
use crate::canvas::{GradientStop, VectorOverlay};
use crate::color::{Palette, adjust_color, lerp_color};
use crate::noise::Fbm;

const TURBULENCE: Fbm = Fbm::new(5, 2.2, 0.45).amplified();
const STORMS: Fbm = Fbm::new(4, 2.0, 0.5).amplified();

/// Band layout derived from the seed
///
/// Different planets get different band counts and turbulence without any
/// manual tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParameters {
    /// Number of band cycles across the latitude range (8-19)
    pub density: f64,
    /// Phase shift of the bands in radians
    pub offset: f64,
    /// Horizontal frequency of the turbulence field (6-11)
    pub turbulence_scale: f64,
    /// Frequency of the large-scale storm field (3-7)
    pub storm_frequency: f64,
}

impl BandParameters {
    pub fn from_seed(seed: u32) -> Self {
        BandParameters {
            density: 8.0 + (seed % 12) as f64,
            offset: (seed % 100) as f64 / 100.0 * PI,
            turbulence_scale: 6.0 + (seed % 6) as f64,
            storm_frequency: 3.0 + (seed % 5) as f64,
        }
    }
}

/// Placement of the great storm spot, present on two out of three seeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatSpot {
    /// Center in pixels
    pub center: Vec2,
    /// Half-axes in pixels
    pub radii: Vec2,
}

impl GreatSpot {
    pub fn from_seed(seed: u32, resolution: u32) -> Option<Self> {
        if seed % 3 == 0 {
            return None;
        }
        let res = resolution as f32;
        let latitude = 0.3 + (seed % 40) as f32 / 100.0;
        let longitude = (seed % 100) as f32 / 100.0;
        let width = res * (0.05 + (seed % 5) as f32 / 100.0);
        Some(GreatSpot {
            center: Vec2::new(res * longitude, res * latitude),
            radii: Vec2::new(width, width * 0.6),
        })
    }
}

/// Paint turbulent latitude bands with storms and darkened poles
pub fn paint(buffer: &mut PixelBuffer, palette: &Palette, seed: u32) {
    let c1 = palette.base;
    let c2 = palette.secondary;
    let dark = adjust_color(c1, -60);
    let bright = adjust_color(c2, 40);
    let bands = BandParameters::from_seed(seed);
    let s = offset(seed);

    buffer.shade_uv(|u, v| {
        let lat = v * PI;
        let turbulence = TURBULENCE.sample(u * bands.turbulence_scale + s, v * 3.0 + s);
        let band = ((lat + bands.offset) * bands.density + turbulence * 4.0).sin();

        let storm_u = u * bands.storm_frequency + 100.0 + s;
        let storm_v = v * bands.storm_frequency + 100.0 + s;
        let storm = STORMS.sample(storm_u, storm_v);

        let t = band * 0.6 + storm * 0.3 + 0.5;
        let color = if t > 0.7 {
            lerp_color(c2, bright, (t - 0.7) * 3.0)
        } else if t > 0.4 {
            lerp_color(c1, c2, (t - 0.4) / 0.3)
        } else {
            lerp_color(dark, c1, t / 0.4)
        };

        // Poles fade toward a darker shade
        let polar_fade = lat.sin().max(0.0).powf(0.3);
        lerp_color(adjust_color(color, -40), color, polar_fade)
    });
}

/// Draw the great spot, if this seed has one
///
/// Returns whether a spot was drawn.
pub fn overlay(canvas: &mut dyn VectorOverlay, palette: &Palette, seed: u32, resolution: u32) -> bool {
    let Some(spot) = GreatSpot::from_seed(seed, resolution) else {
        return false;
    };
    let stops = [
        GradientStop::opaque(0.0, adjust_color(palette.secondary, 60)),
        GradientStop::opaque(0.5, adjust_color(palette.secondary, 20)),
        GradientStop::transparent(1.0),
    ];
    canvas.set_global_alpha(1.0);
    canvas.fill_radial_ellipse(spot.center, spot.radii, spot.radii.x, &stops);
    true
}
