use std::path::Path;
use tokio::fs;
use crate::utils::{CompressorError, CompressorResult};

/// Divisor for all user-facing megabyte strings.
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Formats a byte count as megabytes with exactly two decimal digits.
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MB)
}

/// Reads a file's size in bytes, verifying the path points at a regular file.
pub async fn file_size(path: impl AsRef<Path>) -> CompressorResult<u64> {
    let path = path.as_ref();
    let meta = fs::metadata(path)
        .await
        .map_err(|e| CompressorError::Io(format!("Cannot read '{}': {e}", path.display())))?;

    if !meta.is_file() {
        return Err(CompressorError::Io(format!("Not a file: {}", path.display())));
    }

    Ok(meta.len())
}

/// File-name component of a path, if it has one.
pub fn file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}
