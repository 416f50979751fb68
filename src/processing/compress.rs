//! The compression pipeline: decode, fit to the dimension budget, then
//! re-encode toward the size budget.
//!
//! Runs synchronously. [`engine`](super::engine) dispatches it onto tokio's
//! blocking thread pool and wires up cancellation and the progress stream.
//! The UI treats everything in here as a black box: bytes and options in,
//! compressed bytes out, percentages on the side.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::core::CompressionOptions;
use crate::utils::{CompressorError, CompressorResult};
use super::engine::CancelHandle;
use super::formats::{
    encode_jpeg, encode_png, output_format_for, sniff_format, OutputFormat,
};

/// Quality steps walked until the JPEG output fits the size budget.
const QUALITY_LADDER: &[u8] = &[80, 70, 60, 50, 40, 30, 20];

/// Quality used once the ladder is exhausted and only shrinking remains.
const FLOOR_QUALITY: u8 = 20;

/// Scale applied to both dimensions per shrink round.
const SHRINK_FACTOR: f64 = 0.85;

/// Upper bound on shrink rounds; past this the smallest attempt wins.
const MAX_SHRINK_ROUNDS: usize = 8;

/// Compressed image bytes plus the metadata the session records.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

/// Compresses `bytes` toward the size and dimension budgets in `options`.
///
/// `on_progress` is invoked with percentages in `[0, 100]` as the pipeline
/// advances; monotonicity is not guaranteed. Cancellation is checked between
/// milestones, so a cancelled job stops at the next decode/encode boundary.
pub fn compress(
    bytes: &[u8],
    options: &CompressionOptions,
    cancel: &CancelHandle,
    on_progress: &mut dyn FnMut(f64),
) -> CompressorResult<CompressedImage> {
    let target_bytes = size_budget(options)?;
    let max_dim = dimension_budget(options)?;

    on_progress(0.0);
    ensure_live(cancel)?;

    let format = sniff_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CompressorError::decode(format!("Failed to decode image: {e}")))?;
    debug!(
        "decoded {format:?} image: {}×{}",
        decoded.width(),
        decoded.height()
    );
    on_progress(10.0);
    ensure_live(cancel)?;

    let resized = fit_to_dimension(decoded, max_dim);
    on_progress(30.0);
    ensure_live(cancel)?;

    encode_to_budget(
        resized,
        output_format_for(format),
        target_bytes,
        cancel,
        on_progress,
    )
}

fn size_budget(options: &CompressionOptions) -> CompressorResult<u64> {
    let mb = options.max_size_mb;
    if !mb.is_finite() || mb <= 0.0 {
        return Err(CompressorError::options(format!(
            "maxSizeMB must be a positive number, got {mb}"
        )));
    }
    Ok((mb * 1_048_576.0) as u64)
}

fn dimension_budget(options: &CompressionOptions) -> CompressorResult<u32> {
    let px = options.max_width_or_height;
    if px <= 0 {
        return Err(CompressorError::options(format!(
            "maxWidthOrHeight must be a positive integer, got {px}"
        )));
    }
    Ok(px.min(i64::from(u32::MAX)) as u32)
}

fn ensure_live(cancel: &CancelHandle) -> CompressorResult<()> {
    if cancel.is_cancelled() {
        Err(CompressorError::Cancelled)
    } else {
        Ok(())
    }
}

/// Scales the image down so its longest side fits `max_dim`. Never enlarges.
fn fit_to_dimension(image: DynamicImage, max_dim: u32) -> DynamicImage {
    if image.width().max(image.height()) <= max_dim {
        return image;
    }
    image.resize(max_dim, max_dim, FilterType::Lanczos3)
}

/// Walks the quality ladder, then shrinks dimensions, until an encode fits
/// `target_bytes`. When the budget is unreachable the smallest attempt wins.
fn encode_to_budget(
    image: DynamicImage,
    format: OutputFormat,
    target_bytes: u64,
    cancel: &CancelHandle,
    on_progress: &mut dyn FnMut(f64),
) -> CompressorResult<CompressedImage> {
    let ladder_len = match format {
        OutputFormat::Jpeg => QUALITY_LADDER.len(),
        OutputFormat::Png => 1,
    };
    // attempts scale the 30→95 progress band
    let total_attempts = (ladder_len + MAX_SHRINK_ROUNDS) as f64;
    let mut attempt = 0usize;

    let mut current = image;
    let mut best: Option<CompressedImage> = None;

    let mut record = |encoded: Vec<u8>, current: &DynamicImage, best: &mut Option<CompressedImage>| {
        let smaller = best
            .as_ref()
            .map_or(true, |b| encoded.len() < b.bytes.len());
        if smaller {
            *best = Some(CompressedImage {
                bytes: encoded,
                format,
                width: current.width(),
                height: current.height(),
            });
        }
    };

    // Pass 1: quality ladder at full (already dimension-fitted) resolution.
    // PNG has no quality dial, so its single attempt is the plain encode.
    match format {
        OutputFormat::Jpeg => {
            for &quality in QUALITY_LADDER {
                ensure_live(cancel)?;
                let encoded = encode_jpeg(&current, quality)?;
                attempt += 1;
                on_progress(30.0 + 65.0 * attempt as f64 / total_attempts);
                debug!(
                    "JPEG q={quality}: {} bytes (budget {target_bytes})",
                    encoded.len()
                );
                if encoded.len() as u64 <= target_bytes {
                    on_progress(100.0);
                    return Ok(CompressedImage {
                        bytes: encoded,
                        format,
                        width: current.width(),
                        height: current.height(),
                    });
                }
                record(encoded, &current, &mut best);
            }
        }
        OutputFormat::Png => {
            ensure_live(cancel)?;
            let first_pass = encode_png(&current)?;
            attempt += 1;
            on_progress(30.0 + 65.0 * attempt as f64 / total_attempts);
            debug!("PNG: {} bytes (budget {target_bytes})", first_pass.len());
            if first_pass.len() as u64 <= target_bytes {
                on_progress(100.0);
                return Ok(CompressedImage {
                    bytes: first_pass,
                    format,
                    width: current.width(),
                    height: current.height(),
                });
            }
            record(first_pass, &current, &mut best);
        }
    }

    // Pass 2: shrink rounds at the quality floor.
    for _ in 0..MAX_SHRINK_ROUNDS {
        ensure_live(cancel)?;
        let (w, h) = (current.width(), current.height());
        let nw = ((f64::from(w) * SHRINK_FACTOR) as u32).max(1);
        let nh = ((f64::from(h) * SHRINK_FACTOR) as u32).max(1);
        if (nw, nh) == (w, h) {
            break;
        }
        current = current.resize_exact(nw, nh, FilterType::Lanczos3);

        let encoded = match format {
            OutputFormat::Jpeg => encode_jpeg(&current, FLOOR_QUALITY)?,
            OutputFormat::Png => encode_png(&current)?,
        };
        attempt += 1;
        on_progress(30.0 + 65.0 * attempt as f64 / total_attempts);
        debug!(
            "shrink to {nw}×{nh}: {} bytes (budget {target_bytes})",
            encoded.len()
        );
        if encoded.len() as u64 <= target_bytes {
            on_progress(100.0);
            return Ok(CompressedImage {
                bytes: encoded,
                format,
                width: current.width(),
                height: current.height(),
            });
        }
        record(encoded, &current, &mut best);
    }

    on_progress(100.0);
    best.ok_or_else(|| CompressorError::encode("No encode attempt produced output"))
}
