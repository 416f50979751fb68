//! User-editable compression options.

use serde::{Deserialize, Serialize};

/// Options forwarded verbatim to the compression engine.
///
/// Nothing is validated at intake: the options editor overwrites these fields
/// with whatever the user typed, and the engine rejects values it cannot work
/// with when a compression actually runs. `max_width_or_height` is signed for
/// the same reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Target maximum output size in megabytes
    #[serde(rename = "maxSizeMB")]
    pub max_size_mb: f64,
    /// Target maximum width or height in pixels
    #[serde(rename = "maxWidthOrHeight")]
    pub max_width_or_height: i64,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_mb: 1.0,
            max_width_or_height: 1024,
        }
    }
}
