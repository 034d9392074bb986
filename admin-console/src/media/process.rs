//! Upload image pipeline: validate, watermark, re-encode, name

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};

use super::watermark::{Watermark, WatermarkError};

/// JPEG quality for re-encoded uploads
pub const JPEG_QUALITY: u8 = 85;

/// Accepted upload extensions
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Bytes ready for storage
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub extension: String,
    pub watermarked: bool,
}

impl ProcessedImage {
    /// Content-addressed object name, `sha256.ext`
    pub fn object_name(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{}.{}", hex::encode(hasher.finalize()), self.extension)
    }
}

/// Lowercased extension of `filename`, if it is one we accept
pub fn supported_extension(filename: &str) -> Result<String, AppError> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if SUPPORTED_FORMATS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ))
    }
}

/// Decode upload bytes, rejecting anything that is not an image
pub fn decode(data: &[u8]) -> Result<DynamicImage, AppError> {
    image::load_from_memory(data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })
}

/// PNG stays PNG (keeps transparency), everything else becomes JPEG
fn encode(img: &RgbaImage, source_ext: &str) -> Result<(Vec<u8>, &'static str), image::ImageError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    if source_ext == "png" {
        img.write_with_encoder(PngEncoder::new(&mut cursor))?;
        Ok((buffer, "png"))
    } else {
        let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY))?;
        Ok((buffer, "jpg"))
    }
}

fn original(data: &[u8], ext: &str) -> ProcessedImage {
    ProcessedImage {
        bytes: data.to_vec(),
        content_type: mime_guess::from_ext(ext)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
        extension: if ext == "jpeg" { "jpg".into() } else { ext.to_string() },
        watermarked: false,
    }
}

/// Watermark and re-encode, or hand back the untouched upload.
///
/// Without a configured watermark the original bytes are stored as-is.
/// Any failure while compositing or encoding is logged and also falls
/// back to the original.
pub fn watermark_or_original(
    data: &[u8],
    decoded: &DynamicImage,
    ext: &str,
    watermark: Option<&Watermark>,
) -> ProcessedImage {
    let Some(watermark) = watermark else {
        return original(data, ext);
    };

    let result = watermark
        .apply(decoded)
        .and_then(|img| encode(&img, ext).map_err(WatermarkError::Encode));
    match result {
        Ok((bytes, out_ext)) => ProcessedImage {
            bytes,
            content_type: mime_guess::from_ext(out_ext)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            extension: out_ext.to_string(),
            watermarked: true,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Watermark failed, uploading original image");
            original(data, ext)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{WatermarkOptions, WatermarkPosition};
    use image::Rgba;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([0, 128, 255, 255]));
        let mut buf = Vec::new();
        img.write_with_encoder(PngEncoder::new(&mut Cursor::new(&mut buf)))
            .unwrap();
        buf
    }

    fn logo() -> Watermark {
        let img = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));
        Watermark::new(
            DynamicImage::ImageRgba8(img),
            WatermarkOptions {
                position: WatermarkPosition::Center,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_supported_extension() {
        assert_eq!(supported_extension("Photo.JPG").unwrap(), "jpg");
        assert_eq!(supported_extension("a.webp").unwrap(), "webp");
        let err = supported_extension("clip.mp4").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
        assert!(supported_extension("no_extension").is_err());
    }

    #[test]
    fn test_png_stays_png_when_watermarked() {
        let data = png_bytes(200, 100);
        let decoded = decode(&data).unwrap();
        let out = watermark_or_original(&data, &decoded, "png", Some(&logo()));
        assert!(out.watermarked);
        assert_eq!(out.extension, "png");
        assert_eq!(out.content_type, "image/png");
        assert_ne!(out.bytes, data);
    }

    #[test]
    fn test_jpeg_output_for_other_formats() {
        let data = png_bytes(200, 100);
        let decoded = decode(&data).unwrap();
        let out = watermark_or_original(&data, &decoded, "webp", Some(&logo()));
        assert!(out.watermarked);
        assert_eq!(out.extension, "jpg");
        assert_eq!(out.content_type, "image/jpeg");
        assert_eq!(image::guess_format(&out.bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_falls_back_to_original() {
        // Too small for the default 16px margin
        let data = png_bytes(20, 20);
        let decoded = decode(&data).unwrap();
        let out = watermark_or_original(&data, &decoded, "png", Some(&logo()));
        assert!(!out.watermarked);
        assert_eq!(out.bytes, data);

        let out = watermark_or_original(&data, &decoded, "png", None);
        assert!(!out.watermarked);
        assert_eq!(out.bytes, data);
    }

    #[test]
    fn test_object_name_is_content_hash() {
        let data = png_bytes(4, 4);
        let a = original(&data, "png");
        let b = original(&data, "png");
        assert_eq!(a.object_name(), b.object_name());
        assert!(a.object_name().ends_with(".png"));
        assert_eq!(a.object_name().len(), 64 + 4);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
