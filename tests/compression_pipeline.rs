//! End-to-end engine runs on synthesized images.

use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage, Rgba, RgbaImage};

use image_compressor_lib::core::CompressionOptions;
use image_compressor_lib::processing::formats::OutputFormat;
use image_compressor_lib::processing::{
    compress, spawn_compression, CancelHandle, EngineEvent,
};
use image_compressor_lib::utils::CompressorError;

const MB: f64 = 1_048_576.0;

/// A noisy gradient JPEG large enough to exercise the quality ladder.
fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * 7 + y * 13) % 256) as u8])
    });
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 95);
    encoder.encode_image(&img).expect("fixture encode");
    buf
}

/// A PNG with an alpha channel, to check transparency survives.
fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, (255 - (y % 256)) as u8])
    });
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("fixture encode");
    buf.into_inner()
}

#[test]
fn jpeg_fits_both_budgets() {
    let bytes = jpeg_fixture(800, 600);
    let options = CompressionOptions {
        max_size_mb: 0.05,
        max_width_or_height: 200,
    };
    let cancel = CancelHandle::new();
    let mut seen = Vec::new();

    let result = compress(&bytes, &options, &cancel, &mut |p| seen.push(p))
        .expect("compression succeeds");

    assert_eq!(result.format, OutputFormat::Jpeg);
    assert!(result.width <= 200 && result.height <= 200);
    assert!((result.bytes.len() as f64) <= 0.05 * MB);

    // progress values arrive in range and end at completion
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| (0.0..=100.0).contains(p)));
    assert_eq!(seen.last().copied(), Some(100.0));

    // the output is a decodable image again
    let decoded = image::load_from_memory(&result.bytes).expect("output decodes");
    assert_eq!(decoded.width(), result.width);
    assert_eq!(decoded.height(), result.height);
}

#[test]
fn small_images_are_never_enlarged() {
    let bytes = jpeg_fixture(64, 48);
    let options = CompressionOptions {
        max_size_mb: 10.0,
        max_width_or_height: 1024,
    };
    let cancel = CancelHandle::new();

    let result = compress(&bytes, &options, &cancel, &mut |_| {}).expect("compression succeeds");
    assert_eq!((result.width, result.height), (64, 48));
}

#[test]
fn png_inputs_stay_png() {
    let bytes = png_fixture(300, 200);
    let options = CompressionOptions {
        max_size_mb: 10.0,
        max_width_or_height: 1024,
    };
    let cancel = CancelHandle::new();

    let result = compress(&bytes, &options, &cancel, &mut |_| {}).expect("compression succeeds");
    assert_eq!(result.format, OutputFormat::Png);
    assert_eq!(result.format.mime_type(), "image/png");
    image::load_from_memory(&result.bytes).expect("output decodes");
}

#[test]
fn non_image_bytes_are_rejected() {
    let options = CompressionOptions::default();
    let cancel = CancelHandle::new();

    let err = compress(b"definitely not an image", &options, &cancel, &mut |_| {}).unwrap_err();
    assert!(matches!(err, CompressorError::Format(_)));
}

#[test]
fn nonsense_options_are_rejected_by_the_engine() {
    let bytes = jpeg_fixture(64, 64);
    let cancel = CancelHandle::new();

    let err = compress(
        &bytes,
        &CompressionOptions {
            max_size_mb: 0.0,
            max_width_or_height: 1024,
        },
        &cancel,
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, CompressorError::Options(_)));

    let err = compress(
        &bytes,
        &CompressionOptions {
            max_size_mb: 1.0,
            max_width_or_height: -528,
        },
        &cancel,
        &mut |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, CompressorError::Options(_)));
}

#[test]
fn cancellation_stops_the_pipeline() {
    let bytes = jpeg_fixture(256, 256);
    let options = CompressionOptions::default();
    let cancel = CancelHandle::new();
    cancel.cancel();

    let err = compress(&bytes, &options, &cancel, &mut |_| {}).unwrap_err();
    assert!(matches!(err, CompressorError::Cancelled));
}

#[tokio::test]
async fn spawned_jobs_stream_progress_then_resolve() {
    let bytes = Arc::new(jpeg_fixture(800, 600));
    let options = CompressionOptions {
        max_size_mb: 0.05,
        max_width_or_height: 200,
    };

    let mut job = spawn_compression(bytes, options);
    let mut seen = Vec::new();

    let result = loop {
        match job.next_event().await {
            EngineEvent::Progress(value) => seen.push(value),
            EngineEvent::Done(result) => break result,
        }
    };

    let compressed = result.expect("job succeeds");
    assert!((compressed.bytes.len() as f64) <= 0.05 * MB);
    assert!(!seen.is_empty());
    assert_eq!(seen.last().copied(), Some(100.0));
}

#[tokio::test]
async fn spawned_jobs_surface_engine_failures() {
    let bytes = Arc::new(b"not an image at all".to_vec());
    let mut job = spawn_compression(bytes, CompressionOptions::default());

    let result = loop {
        match job.next_event().await {
            EngineEvent::Progress(_) => {}
            EngineEvent::Done(result) => break result,
        }
    };

    let err = result.expect_err("job fails");
    assert!(!err.to_string().is_empty());
}
