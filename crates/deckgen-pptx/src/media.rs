//! Embedded media decoding.
//!
//! Slide images arrive as `data:image/...;base64,...` URLs attached to
//! image-text records. They are decoded once and written into `ppt/media/`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{PptxError, Result};

/// One decoded media part destined for `ppt/media/`.
pub struct MediaItem {
    /// File name inside the package, e.g. `image1.png`
    pub embedded_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Decode a base64 data URL into a media item numbered `index`.
///
/// Only raster content types make sense in a slide; anything without an
/// `image/` media type is rejected.
pub fn decode_data_url(url: &str, index: usize) -> Result<MediaItem> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| PptxError::InvalidDataUrl {
            reason: "missing data: prefix".to_string(),
        })?;

    let (meta, payload) = rest.split_once(',').ok_or_else(|| PptxError::InvalidDataUrl {
        reason: "missing payload separator".to_string(),
    })?;

    let content_type = meta.split(';').next().unwrap_or("").to_string();
    if !content_type.starts_with("image/") {
        return Err(PptxError::InvalidDataUrl {
            reason: format!("unsupported content type {:?}", content_type),
        });
    }
    if !meta.ends_with(";base64") {
        return Err(PptxError::InvalidDataUrl {
            reason: "payload is not base64".to_string(),
        });
    }

    let data = BASE64
        .decode(payload.trim())
        .map_err(|e| PptxError::InvalidDataUrl {
            reason: e.to_string(),
        })?;

    let extension = match content_type.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpeg",
        "image/gif" => "gif",
        other => {
            return Err(PptxError::InvalidDataUrl {
                reason: format!("unsupported image type {:?}", other),
            })
        }
    };

    Ok(MediaItem {
        embedded_name: format!("image{}.{}", index, extension),
        content_type,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // A 1x1 transparent PNG.
    const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_decode_png_data_url() {
        let item = decode_data_url(TINY_PNG, 1).unwrap();
        assert_eq!(item.embedded_name, "image1.png");
        assert_eq!(item.content_type, "image/png");
        assert_eq!(&item.data[..4], b"\x89PNG");
    }

    #[test]
    fn test_rejects_non_image() {
        let err = decode_data_url("data:text/plain;base64,aGk=", 1);
        assert!(matches!(err, Err(PptxError::InvalidDataUrl { .. })));
    }

    #[test]
    fn test_rejects_plain_url() {
        assert!(decode_data_url("https://example.com/a.png", 1).is_err());
    }

    #[test]
    fn test_rejects_non_base64_payload() {
        assert!(decode_data_url("data:image/png,rawbytes", 1).is_err());
    }
}
