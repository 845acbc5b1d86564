//! TOML roster of bodies to texture
//!
//! ```toml
//! default_resolution = 512
//!
//! [[body]]
//! name = "Earth"
//! texture = "TERRESTRIAL"
//! base = "#2233FF"
//! secondary = "#228833"
//! resolution = 1024
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::texture::{TextureRequest, TextureType};

fn default_resolution() -> i64 {
    512
}

/// A list of bodies sharing a default resolution
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Roster {
    #[serde(default = "default_resolution")]
    pub default_resolution: i64,
    #[serde(default, rename = "body")]
    pub bodies: Vec<Body>,
}

/// One named planet, moon or star
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Body {
    pub name: String,
    pub texture: TextureType,
    pub base: String,
    pub secondary: String,
    /// Overrides the roster's default resolution
    #[serde(default)]
    pub resolution: Option<i64>,
}

impl Roster {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a roster file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let roster = Self::from_toml_str(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), bodies = roster.bodies.len(), "loaded roster");
        Ok(roster)
    }

    /// Validate every body up front
    ///
    /// Fails on the first malformed body, naming it in a warning, so callers
    /// can reject a roster before any generation work starts.
    pub fn requests(&self) -> Result<Vec<(&Body, TextureRequest)>> {
        self.bodies
            .iter()
            .map(|body| match body.request(self.default_resolution) {
                Ok(request) => Ok((body, request)),
                Err(err) => {
                    warn!(body = %body.name, error = %err, "invalid texture settings");
                    Err(err)
                }
            })
            .collect()
    }

    /// Look a body up by name, ignoring case
    pub fn body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|body| body.name.eq_ignore_ascii_case(name))
    }
}

impl Body {
    /// Build the texture request for this body
    pub fn request(&self, default_resolution: i64) -> Result<TextureRequest> {
        let resolution = self.resolution.unwrap_or(default_resolution);
        TextureRequest::new(self.texture, &self.base, &self.secondary, resolution)
    }

    /// Lowercase file name stem, with anything but ASCII alphanumerics turned into `_`
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }
}
