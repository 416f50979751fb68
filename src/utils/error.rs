//! Error types for the image compressor.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Main error type for the compressor application.
///
/// All errors in the application are converted to this type before being
/// returned to the frontend.
#[derive(Error, Debug, Serialize)]
pub enum CompressorError {
    /// File IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Input bytes could not be decoded as an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Re-encoding the image failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Unsupported or unrecognised image format
    #[error("Format error: {0}")]
    Format(String),

    /// Options the engine cannot work with (zero or negative budgets)
    #[error("Invalid options: {0}")]
    Options(String),

    /// The compression job was cancelled before it finished
    #[error("Compression cancelled")]
    Cancelled,

    /// Anything else that goes wrong while driving a compression
    #[error("Processing error: {0}")]
    Processing(String),
}

/// Convenience result type for compressor operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

// Helper methods for error creation
impl CompressorError {
    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn options<T: Into<String>>(msg: T) -> Self {
        Self::Options(msg.into())
    }
}

// Convert std::io::Error to CompressorError
impl From<io::Error> for CompressorError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// Convert image crate errors into the matching variant
impl From<image::ImageError> for CompressorError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => Self::Decode(e.to_string()),
            image::ImageError::Encoding(e) => Self::Encode(e.to_string()),
            image::ImageError::Unsupported(e) => Self::Format(e.to_string()),
            image::ImageError::IoError(e) => Self::Io(e.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}
