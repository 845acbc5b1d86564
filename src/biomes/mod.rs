//! Per-biome colorization of noise fields
//!
//! Every biome exposes a `paint` base pass that writes a full buffer from
//! pure noise and color math. Biomes with shape features (the gas giant's
//! great spot, cratered impacts) add an `overlay` pass drawn through
//! [`crate::canvas::VectorOverlay`], which callers may skip.

pub mod cratered;
pub mod gas_giant;
pub mod ice_giant;
pub mod terrestrial;
pub mod volcanic;

/// Spreads consecutive seeds across the noise lattice without repeating
const SEED_STRIDE: f64 = 1.618_033_988_749_895;

/// Seed as a floating-point noise offset
///
/// The lattice repeats every 256 cells, so an integer stride would give
/// seeds `s` and `s + 256` the same layout. An irrational stride never
/// lands two seeds on the same lattice phase.
#[inline]
pub(crate) fn offset(seed: u32) -> f64 {
    seed as f64 * SEED_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::color::{Palette, Rgb};

    #[test]
    fn test_offsets_never_share_lattice_phase() {
        for delta in 1..1000u32 {
            let shift = offset(delta).rem_euclid(256.0);
            let distance = shift.min(256.0 - shift);
            assert!(distance > 0.1, "Seeds {} apart land {} cells from the same phase", delta, distance);
        }
    }

    #[test]
    fn test_seeds_a_lattice_period_apart_differ() {
        let palette = Palette::new(Rgb::new(60, 50, 40), Rgb::new(220, 180, 120));
        let painters: [(&str, fn(&mut PixelBuffer, &Palette, u32)); 5] = [
            ("gas giant", gas_giant::paint),
            ("ice giant", ice_giant::paint),
            ("terrestrial", terrestrial::paint),
            ("cratered", cratered::paint),
            ("volcanic", volcanic::paint),
        ];

        for (name, paint) in painters {
            let mut reference = PixelBuffer::new(32);
            paint(&mut reference, &palette, 10);
            for other in [138, 266, 522, 778] {
                let mut buffer = PixelBuffer::new(32);
                paint(&mut buffer, &palette, other);
                assert_ne!(reference, buffer, "{} seeds 10 and {} should not share a layout", name, other);
            }
        }
    }
}
