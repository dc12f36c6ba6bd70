/// The single-slot file selection model
///
/// At most one file is selected at a time. A `SelectedFile` is only
/// constructed through validation: MIME type is sniffed from the magic
/// bytes (never trusted from the file extension) and the size cap is
/// enforced before anything else touches the bytes.

use image::ImageFormat;
use thiserror::Error;

/// Upper bound on accepted uploads: 5 MiB, matching the analysis service.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Why a file was rejected at selection time.
///
/// The Display strings double as the user-facing error banner copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Unsupported format. Only JPG, PNG and WebP images are accepted.")]
    UnsupportedFormat,
    #[error("File is too large. The limit is 5 MB.")]
    TooLarge,
    #[error("Could not read file: {0}")]
    Io(String),
}

/// A validated, in-memory selected file ready for preview and upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name (e.g. "chest_xray.png"), shown on the pick button
    pub name: String,
    /// Sniffed MIME type, one of the allow-set
    pub mime: &'static str,
    /// Raw file bytes, used for both preview decoding and the upload body
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Validate raw bytes and build a selection.
    ///
    /// Checks the format allow-set first, then the size cap, mirroring the
    /// order the error messages are surfaced in the UI.
    pub fn from_bytes(name: String, bytes: Vec<u8>) -> Result<Self, SelectionError> {
        let mime = sniff_mime(&bytes)?;

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(SelectionError::TooLarge);
        }

        Ok(SelectedFile { name, mime, bytes })
    }
}

/// Sniff the MIME type from magic bytes.
///
/// Only JPEG, PNG and WebP pass; everything else (including perfectly
/// valid images in other formats) is rejected.
fn sniff_mime(bytes: &[u8]) -> Result<&'static str, SelectionError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok("image/jpeg"),
        Ok(ImageFormat::Png) => Ok("image/png"),
        Ok(ImageFormat::WebP) => Ok("image/webp"),
        _ => Err(SelectionError::UnsupportedFormat),
    }
}
