//! Error type shared by every operation in the crate.
//!
//! Only caller mistakes are errors. Degenerate numeric cases (flat images,
//! zero-range normalization) fall back to an unchanged result instead.

use thiserror::Error;

/// Errors reported synchronously to the caller. No partial output is ever
/// produced alongside an error.
#[derive(Debug, Error)]
pub enum ImageLabError {
    /// A numeric parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An array does not have a shape the operation can work with.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// Two inputs that must agree in shape or channel count do not.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A filter selector name did not match any known filter.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// Decoding, encoding or file access failed in the `image` crate.
    #[cfg(feature = "io")]
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImageLabError>;

impl ImageLabError {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        ImageLabError::InvalidParameter(msg.into())
    }
}
