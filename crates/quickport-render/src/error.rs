//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur during drawing or presentation.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A canvas or surface was requested with a zero width or height.
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The canvas has not been initialized yet.
    #[error("canvas not initialized")]
    NotInitialized,

    /// Bitmap data does not match its declared dimensions.
    #[error("picture data is {actual} bytes, expected {expected} for {width}x{height}")]
    PictureData {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Text could not be shaped or rasterized.
    #[error("text rendering failed: {0}")]
    Text(String),

    /// The presentation target refused the frame.
    #[error("failed to present frame: {0}")]
    Present(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
