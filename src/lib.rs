//! Procedural planet surface textures
//!
//! Deterministic fractal noise turned into square RGBA8 textures for gas
//! giants, ice giants, terrestrial worlds, cratered moons, volcanic bodies and
//! flat-filled stars. The same two colors always give the same planet.
//!
//! ```no_run
//! use planet_forge::{TextureType, generate};
//!
//! let earth = generate(TextureType::Terrestrial, "#2233FF", "#228833", 512)?;
//! earth.save_png("earth.png")?;
//! # Ok::<(), planet_forge::TextureError>(())
//! ```

pub mod biomes;
pub mod buffer;
pub mod canvas;
pub mod color;
pub mod error;
pub mod noise;
pub mod roster;
pub mod texture;
pub mod worker;

pub use buffer::PixelBuffer;
pub use color::{Palette, Rgb, seed_from_colors};
pub use error::{Result, TextureError};
pub use noise::Fbm;
pub use roster::{Body, Roster};
pub use texture::{CraterPlacement, GenerateOptions, MAX_RESOLUTION, TextureRequest, TextureType, generate, generate_with};
pub use worker::{RequestId, TextureResponse, TextureWorker};
