//! Download file naming.

/// Suggested file name for saving a compressed image.
///
/// Inserts `-compressed` before the last extension separator of the original
/// name (`photo.jpg` → `photo-compressed.jpg`). A name with no extension gets
/// the marker appended; with no original name at all the fallback is
/// `output.jpg`.
pub fn download_file_name(original: Option<&str>) -> String {
    match original {
        Some(name) => match name.rfind('.') {
            Some(dot) => format!("{}-compressed{}", &name[..dot], &name[dot..]),
            None => format!("{name}-compressed"),
        },
        None => "output.jpg".to_string(),
    }
}
