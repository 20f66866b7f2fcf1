//! Upload inspection and JPEG re-encoding.
//!
//! Every upload is re-encoded to baseline JPEG before base64 so the request always
//! carries `image/jpeg`. Transparent pixels are composited onto white first.

use crate::domain::{DomainError, EncodedImage, ImageKind, RoofImage};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Validate raw upload bytes: PNG or JPEG by content, readable header.
///
/// The declared content type and file extension are ignored; only the bytes count.
pub fn inspect_upload(file_name: &str, bytes: Vec<u8>) -> Result<RoofImage, DomainError> {
    if bytes.is_empty() {
        return Err(DomainError::MissingInput("image"));
    }

    let kind = match image::guess_format(&bytes) {
        Ok(ImageFormat::Png) => ImageKind::Png,
        Ok(ImageFormat::Jpeg) => ImageKind::Jpeg,
        Ok(other) => {
            return Err(DomainError::UnsupportedImage(format!(
                "{:?} files are not accepted",
                other
            )));
        }
        Err(_) => {
            return Err(DomainError::UnsupportedImage(format!(
                "{} is not a recognised image",
                display_name(file_name)
            )));
        }
    };

    let (width, height) = ImageReader::with_format(Cursor::new(&bytes), image_format(kind))
        .into_dimensions()
        .map_err(|e| DomainError::Image(format!("unreadable {} header: {}", kind, e)))?;

    debug!(file = file_name, %kind, width, height, bytes = bytes.len(), "upload inspected");

    Ok(RoofImage {
        file_name: display_name(file_name).to_string(),
        bytes,
        kind,
        width,
        height,
    })
}

/// Decode, flatten alpha onto white, re-encode as JPEG and base64 the result.
pub fn encode_for_upload(image: &RoofImage) -> Result<EncodedImage, DomainError> {
    let decoded = image::load_from_memory_with_format(&image.bytes, image_format(image.kind))
        .map_err(|e| DomainError::Image(format!("failed to decode {}: {}", image.kind, e)))?;
    let flattened = flatten(decoded);

    let mut jpeg = Vec::new();
    flattened
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| DomainError::Image(format!("failed to encode JPEG: {}", e)))?;

    debug!(
        source_bytes = image.bytes.len(),
        jpeg_bytes = jpeg.len(),
        "image re-encoded for upload"
    );

    Ok(EncodedImage {
        media_type: ImageKind::Jpeg.media_type(),
        base64: STANDARD.encode(&jpeg),
        width: flattened.width(),
        height: flattened.height(),
        byte_len: jpeg.len(),
    })
}

fn image_format(kind: ImageKind) -> ImageFormat {
    match kind {
        ImageKind::Png => ImageFormat::Png,
        ImageKind::Jpeg => ImageFormat::Jpeg,
    }
}

fn display_name(file_name: &str) -> &str {
    if file_name.trim().is_empty() {
        "upload"
    } else {
        file_name
    }
}

/// JPEG has no alpha channel. Grayscale and RGB pass through.
fn flatten(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other if other.color().has_alpha() => {
            let rgba = other.to_rgba8();
            let mut rgb = RgbImage::new(rgba.width(), rgba.height());
            for (x, y, px) in rgba.enumerate_pixels() {
                let [r, g, b, a] = px.0;
                let alpha = u32::from(a);
                let over_white =
                    |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
                rgb.put_pixel(x, y, Rgb([over_white(r), over_white(g), over_white(b)]));
            }
            DynamicImage::ImageRgb8(rgb)
        }
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}
