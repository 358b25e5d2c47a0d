//! Error taxonomy for the rendering core
//!
//! Drawing never fails: out-of-range coordinates are clipped silently.
//! Errors only surface at construction time or at the raw-buffer boundary.

/// Convenience result type used across softframe.
pub type FrameResult<T> = Result<T, FrameError>;

#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Requested dimensions are unusable or the buffer could not be reserved.
    #[error("cannot allocate {width}x{height} surface: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },

    /// A raw pixel buffer handed to the core does not match its declared shape.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Tilemap grid, tile size or map data are inconsistent.
    #[error("invalid tilemap: {0}")]
    InvalidTileMap(String),

    /// Malformed JSON description.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub fn allocation(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::Allocation {
            width,
            height,
            reason: reason.into(),
        }
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_tilemap(msg: impl Into<String>) -> Self {
        Self::InvalidTileMap(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
