use thiserror::Error;

/// Errors raised by texture generation and its surrounding plumbing
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("invalid color {input:?}: {reason}")]
    InvalidColor { input: String, reason: &'static str },

    #[error("invalid resolution {0}: must be between 1 and {max}", max = crate::texture::MAX_RESOLUTION)]
    InvalidResolution(i64),

    #[error("texture worker pool has shut down")]
    WorkerDisconnected,

    #[error("no texture requests are in flight")]
    NoPendingRequests,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("roster parse error: {0}")]
    Roster(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TextureError>;
