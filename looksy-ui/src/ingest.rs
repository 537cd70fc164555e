//! Photo ingestion
//!
//! Normalizes an uploaded image into a bounded-size, lossy-encoded data URI
//! before it is stored on the session or shipped to the AI service. Decode
//! or re-encode failures of a recognized image degrade to a lossless
//! base64 fallback of the original bytes — a codec problem never blocks the
//! upload workflow. Only input that does not sniff as an image at all is
//! rejected.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::imageops::FilterType;
use thiserror::Error;
use tracing::warn;

/// Longest-edge cap for the primary (re-encoded) path
pub const MAX_DIMENSION: u32 = 1280;

/// JPEG quality for re-encoding (0-100 scale; ~0.82 on a 0-1 scale)
const JPEG_QUALITY: u8 = 82;

/// Ingestion errors
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("uploaded data is not a recognized image format")]
    UnsupportedMedia,
}

/// A normalized, encoded photo
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedPhoto {
    /// `data:<mime>;base64,...` representation
    pub data_uri: String,
    /// Output dimensions; unknown on the fallback path
    pub dimensions: Option<(u32, u32)>,
    /// True when the lossless fallback was taken (output size unbounded)
    pub fallback: bool,
}

/// Compute bounded output dimensions for a source image.
///
/// scale = min(1, MAX_DIMENSION / max(w, h)); each output dimension is
/// rounded and floored at 1. Images already within the cap pass through
/// unscaled — there is no upscaling.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= MAX_DIMENSION {
        return (width, height);
    }
    let scale = MAX_DIMENSION as f64 / longest as f64;
    let out_w = ((width as f64 * scale).round() as u32).max(1);
    let out_h = ((height as f64 * scale).round() as u32).max(1);
    (out_w, out_h)
}

/// Normalize raw uploaded bytes into an [`EncodedPhoto`].
///
/// Fails only with [`IngestError::UnsupportedMedia`] when the input is not
/// an image format; every other problem takes the fallback path.
pub fn ingest(raw: &[u8]) -> Result<EncodedPhoto, IngestError> {
    let kind = infer::get(raw)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .ok_or(IngestError::UnsupportedMedia)?;

    match reencode_bounded(raw) {
        Ok(photo) => Ok(photo),
        Err(e) => {
            warn!(
                mime = kind.mime_type(),
                error = %e,
                "Photo re-encode failed; storing original bytes losslessly"
            );
            Ok(EncodedPhoto {
                data_uri: format!("data:{};base64,{}", kind.mime_type(), BASE64.encode(raw)),
                dimensions: None,
                fallback: true,
            })
        }
    }
}

/// Primary path: decode, resize to the cap, re-encode as JPEG
fn reencode_bounded(raw: &[u8]) -> Result<EncodedPhoto, image::ImageError> {
    let decoded = image::load_from_memory(raw)?;
    let (width, height) = (decoded.width(), decoded.height());
    let (out_w, out_h) = scaled_dimensions(width, height);

    let resized = if (out_w, out_h) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(out_w, out_h, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();
    let mut encoded = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;

    Ok(EncodedPhoto {
        data_uri: format!("data:image/jpeg;base64,{}", BASE64.encode(&encoded)),
        dimensions: Some((out_w, out_h)),
        fallback: false,
    })
}
