//! Texture requests and the synchronous generation path
//!
//! A [`TextureRequest`] is validated once on construction. Generation itself
//! never fails: every well-formed request yields a full opaque buffer.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::biomes::{cratered, gas_giant, ice_giant, terrestrial, volcanic};
use crate::buffer::PixelBuffer;
use crate::canvas::RasterCanvas;
use crate::color::{Palette, Rgb, seed_from_colors};
use crate::error::{Result, TextureError};

/// Largest accepted texture edge length in pixels
pub const MAX_RESOLUTION: u32 = 8192;

/// Surface style of a generated texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TextureType {
    GasGiant,
    IceGiant,
    Terrestrial,
    Cratered,
    Volcanic,
    /// Flat fill of the base color, also the fallback for unknown tags
    Sun,
}

impl TextureType {
    pub const ALL: [TextureType; 6] = [
        TextureType::GasGiant,
        TextureType::IceGiant,
        TextureType::Terrestrial,
        TextureType::Cratered,
        TextureType::Volcanic,
        TextureType::Sun,
    ];

    /// Upper-snake tag as used in roster files
    pub const fn tag(self) -> &'static str {
        match self {
            TextureType::GasGiant => "GAS_GIANT",
            TextureType::IceGiant => "ICE_GIANT",
            TextureType::Terrestrial => "TERRESTRIAL",
            TextureType::Cratered => "CRATERED",
            TextureType::Volcanic => "VOLCANIC",
            TextureType::Sun => "SUN",
        }
    }
}

impl From<&str> for TextureType {
    /// Lenient parse: case, dashes and spaces are ignored, and anything
    /// unrecognized becomes [`TextureType::Sun`].
    fn from(tag: &str) -> Self {
        let normalized: String = tag
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_uppercase() })
            .collect();

        match TextureType::ALL.into_iter().find(|texture| texture.tag() == normalized) {
            Some(texture) => texture,
            None => {
                warn!(tag, "unknown texture type, falling back to flat fill");
                TextureType::Sun
            }
        }
    }
}

impl From<String> for TextureType {
    fn from(tag: String) -> Self {
        TextureType::from(tag.as_str())
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Where crater positions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CraterPlacement {
    /// Derived from the color seed, so repeated runs match exactly
    #[default]
    Seeded,
    /// Drawn from thread-local entropy, different on every call
    Entropy,
}

/// Options for a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Draw vector overlays (craters, great spot) on top of the base pass
    pub overlays: bool,
    pub craters: CraterPlacement,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            overlays: true,
            craters: CraterPlacement::Seeded,
        }
    }
}

/// A validated request for one square texture
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRequest {
    texture: TextureType,
    base: String,
    secondary: String,
    palette: Palette,
    resolution: u32,
}

impl TextureRequest {
    /// Validate colors and resolution for a texture
    ///
    /// # Arguments
    ///
    /// * `texture` - Surface style to generate
    /// * `base` - Primary color as `#RRGGBB` or `RRGGBB`
    /// * `secondary` - Secondary color, ignored for [`TextureType::Sun`]
    /// * `resolution` - Edge length in pixels, `1..=MAX_RESOLUTION`
    ///
    /// # Returns
    ///
    /// The request, or `InvalidResolution` / `InvalidColor`
    pub fn new(texture: TextureType, base: &str, secondary: &str, resolution: i64) -> Result<Self> {
        let resolution = u32::try_from(resolution)
            .ok()
            .filter(|r| (1..=MAX_RESOLUTION).contains(r))
            .ok_or(TextureError::InvalidResolution(resolution))?;

        let base_color = Rgb::from_hex(base)?;
        let secondary_color = match texture {
            // The flat fill never reads the secondary color
            TextureType::Sun => Rgb::from_hex(secondary).unwrap_or(base_color),
            _ => Rgb::from_hex(secondary)?,
        };

        Ok(TextureRequest {
            texture,
            base: base.to_string(),
            secondary: secondary.to_string(),
            palette: Palette::new(base_color, secondary_color),
            resolution,
        })
    }

    pub fn texture(&self) -> TextureType {
        self.texture
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Seed derived from the color strings exactly as the caller wrote them
    pub fn seed(&self) -> u32 {
        seed_from_colors(&self.base, &self.secondary)
    }
}

/// Generate the texture described by `request`
pub fn generate_with(request: &TextureRequest, options: &GenerateOptions) -> PixelBuffer {
    let resolution = request.resolution;
    let palette = &request.palette;
    let seed = request.seed();
    debug!(
        texture = %request.texture,
        resolution,
        base = %request.base,
        seed,
        overlays = options.overlays,
        "generating texture"
    );

    let mut buffer = PixelBuffer::new(resolution);
    match request.texture {
        TextureType::GasGiant => {
            gas_giant::paint(&mut buffer, palette, seed);
            if options.overlays {
                let drawn = gas_giant::overlay(&mut RasterCanvas::new(&mut buffer), palette, seed, resolution);
                trace!(drawn, "great spot overlay");
            }
        }
        TextureType::IceGiant => ice_giant::paint(&mut buffer, palette, seed),
        TextureType::Terrestrial => terrestrial::paint(&mut buffer, palette, seed),
        TextureType::Cratered => {
            cratered::paint(&mut buffer, palette, seed);
            if options.overlays {
                let mut canvas = RasterCanvas::new(&mut buffer);
                match options.craters {
                    CraterPlacement::Seeded => {
                        let mut rng = StdRng::seed_from_u64(u64::from(seed));
                        cratered::overlay(&mut canvas, palette, resolution, &mut rng)
                    }
                    CraterPlacement::Entropy => {
                        cratered::overlay(&mut canvas, palette, resolution, &mut rand::thread_rng())
                    }
                };
            }
        }
        TextureType::Volcanic => volcanic::paint(&mut buffer, palette, seed),
        TextureType::Sun => buffer.fill(palette.base),
    }

    if let Some([r, g, b, a]) = buffer.pixel(resolution / 2, resolution / 2) {
        trace!(texture = %request.texture, r, g, b, a, "center pixel");
    }
    buffer
}

/// Validate and generate in one step with default options
pub fn generate(texture: TextureType, base: &str, secondary: &str, resolution: i64) -> Result<PixelBuffer> {
    let request = TextureRequest::new(texture, base, secondary, resolution)?;
    Ok(generate_with(&request, &GenerateOptions::default()))
}
