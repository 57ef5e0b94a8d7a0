//! Artifact naming and payload probing shared by the submission pipeline
//! and the bulk import.

use chrono::Datelike;
use herdscan_core::error::CoreError;
use herdscan_core::types::Timestamp;
use uuid::Uuid;

/// Key prefix for artifacts produced by the submission pipeline.
pub const SCAN_PREFIX: &str = "scans";

/// Key prefix for bulk-imported reference images.
pub const REFERENCE_PREFIX: &str = "reference";

/// Sniffed payload type, used for the artifact key and the upload
/// content type.
#[derive(Debug, Clone, Copy)]
pub struct ImageContent {
    pub extension: &'static str,
    pub mime: &'static str,
}

/// Probe the payload header and reject anything that is not a supported
/// image before any external call happens.
pub fn probe_image(payload: &[u8]) -> Result<ImageContent, CoreError> {
    match image::guess_format(payload) {
        Ok(image::ImageFormat::Png) => Ok(ImageContent {
            extension: "png",
            mime: "image/png",
        }),
        Ok(image::ImageFormat::Jpeg) => Ok(ImageContent {
            extension: "jpg",
            mime: "image/jpeg",
        }),
        Ok(image::ImageFormat::WebP) => Ok(ImageContent {
            extension: "webp",
            mime: "image/webp",
        }),
        Ok(other) => Err(CoreError::Validation(format!(
            "Unsupported image format {other:?}"
        ))),
        Err(_) => Err(CoreError::Validation(
            "Payload is not a recognizable image".into(),
        )),
    }
}

/// Build an object key from the submission time and an opaque suffix:
/// `{prefix}/{YYYY}/{MM}/{unix_millis}-{suffix}.{ext}`.
///
/// The suffix keeps concurrent submissions within the same millisecond
/// from colliding.
pub fn artifact_key(prefix: &str, now: Timestamp, extension: &str) -> String {
    let suffix = Uuid::new_v4().simple();
    format!(
        "{prefix}/{}/{:02}/{}-{suffix}.{extension}",
        now.year(),
        now.month(),
        now.timestamp_millis(),
    )
}
