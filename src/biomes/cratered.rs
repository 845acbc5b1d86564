use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::biomes::offset;
use crate::buffer::PixelBuffer;
use crate::canvas::{GradientStop, VectorOverlay};
use crate::color::{Palette, adjust_color, lerp_color};
use crate::noise::Fbm;

const TERRAIN: Fbm = Fbm::new(5, 2.0, 0.5).amplified();

/// One size class of impact craters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraterTier {
    pub count: usize,
    /// Minimum radius as a fraction of the resolution
    pub min_radius: f32,
    /// Maximum radius as a fraction of the resolution
    pub max_radius: f32,
}

/// Large and few, medium and some, small and many
pub const CRATER_TIERS: [CraterTier; 3] = [
    CraterTier { count: 8, min_radius: 0.04, max_radius: 0.1 },
    CraterTier { count: 30, min_radius: 0.015, max_radius: 0.04 },
    CraterTier { count: 100, min_radius: 0.004, max_radius: 0.015 },
];

/// A single impact crater in pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crater {
    pub center: Vec2,
    pub radius: f32,
    /// Index into [`CRATER_TIERS`]
    pub tier: usize,
}

/// Scatter craters for every tier across a `resolution`-sized surface
pub fn plan_craters<R: Rng + ?Sized>(resolution: u32, rng: &mut R) -> Vec<Crater> {
    let res = resolution as f32;
    let total = CRATER_TIERS.iter().map(|tier| tier.count).sum();
    let mut craters = Vec::with_capacity(total);

    for (index, tier) in CRATER_TIERS.iter().enumerate() {
        let min = res * tier.min_radius;
        let max = res * tier.max_radius;
        for _ in 0..tier.count {
            let center = Vec2::new(rng.gen_range(0.0..res), rng.gen_range(0.0..res));
            let radius = min + rng.r#gen::<f32>() * (max - min);
            craters.push(Crater { center, radius, tier: index });
        }
    }

    craters
}

/// Paint the noise-shaded ground the craters sit on
pub fn paint(buffer: &mut PixelBuffer, palette: &Palette, seed: u32) {
    let s = offset(seed);
    buffer.shade_uv(|u, v| {
        let terrain = TERRAIN.sample(u * 8.0 + s, v * 8.0 + s);
        lerp_color(palette.secondary, palette.base, (terrain + 1.0) * 0.5)
    });
}

/// Draw one crater: bright rim, dark floor, and an offset shadow
pub fn draw_crater(canvas: &mut dyn VectorOverlay, palette: &Palette, crater: &Crater) {
    let Crater { center, radius, .. } = *crater;

    canvas.set_global_alpha(1.0);
    canvas.stroke_circle(center, radius, (radius * 0.12).max(1.0), adjust_color(palette.base, 25));

    let floor = [
        GradientStop::opaque(0.0, adjust_color(palette.secondary, -30)),
        GradientStop::opaque(0.7, adjust_color(palette.secondary, -15)),
        GradientStop::transparent(1.0),
    ];
    canvas.set_global_alpha(0.6);
    canvas.fill_radial_ellipse(center, Vec2::splat(radius * 0.85), radius * 0.85, &floor);

    canvas.set_global_alpha(0.2);
    canvas.fill_circle(center - Vec2::splat(radius * 0.15), radius * 0.7, adjust_color(palette.secondary, -50));
    canvas.set_global_alpha(1.0);
}

/// Scatter and draw all crater tiers
///
/// Returns the number of craters drawn.
pub fn overlay<R: Rng + ?Sized>(canvas: &mut dyn VectorOverlay, palette: &Palette, resolution: u32, rng: &mut R) -> usize {
    let craters = plan_craters(resolution, rng);
    for crater in &craters {
        draw_crater(canvas, palette, crater);
    }
    trace!(count = craters.len(), "drew crater overlay");
    craters.len()
}
