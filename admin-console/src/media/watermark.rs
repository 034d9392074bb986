//! Logo watermark compositing
//!
//! The logo is scaled relative to the base image width, faded to the
//! configured opacity and laid over one of five anchors.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the logo is anchored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl WatermarkPosition {
    pub const ALL: [WatermarkPosition; 5] = [
        WatermarkPosition::TopLeft,
        WatermarkPosition::TopRight,
        WatermarkPosition::BottomLeft,
        WatermarkPosition::BottomRight,
        WatermarkPosition::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for WatermarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatermarkPosition {
    type Err = String;

    /// Accepts `bottom-right`, `bottom_right` and `bottomRight` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "topleft" => Ok(Self::TopLeft),
            "topright" => Ok(Self::TopRight),
            "bottomleft" => Ok(Self::BottomLeft),
            "bottomright" => Ok(Self::BottomRight),
            "center" | "centre" => Ok(Self::Center),
            _ => Err(format!("unknown watermark position: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkOptions {
    pub position: WatermarkPosition,
    /// 0.0 (invisible) ..= 1.0 (logo alpha unchanged)
    pub opacity: f32,
    /// Gap between the logo and the nearest edges, in pixels; unused for `Center`
    pub margin: u32,
    /// Logo width as a fraction of the base image width
    pub scale: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::BottomRight,
            opacity: 0.5,
            margin: 16,
            scale: 0.2,
        }
    }
}

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("watermark logo unreadable: {0}")]
    Logo(#[from] image::ImageError),

    #[error("watermarked image could not be encoded: {0}")]
    Encode(image::ImageError),

    #[error("image {width}x{height} is too small for a watermark")]
    ImageTooSmall { width: u32, height: u32 },
}

/// Top-left corner of a `mark`-sized overlay on an `image`-sized canvas.
///
/// Clamped at zero so an oversized mark starts at the canvas origin.
pub fn overlay_origin(
    image: (u32, u32),
    mark: (u32, u32),
    position: WatermarkPosition,
    margin: u32,
) -> (u32, u32) {
    let (iw, ih) = image;
    let (mw, mh) = mark;
    let right = iw.saturating_sub(mw).saturating_sub(margin);
    let bottom = ih.saturating_sub(mh).saturating_sub(margin);
    match position {
        WatermarkPosition::TopLeft => (margin.min(iw), margin.min(ih)),
        WatermarkPosition::TopRight => (right, margin.min(ih)),
        WatermarkPosition::BottomLeft => (margin.min(iw), bottom),
        WatermarkPosition::BottomRight => (right, bottom),
        WatermarkPosition::Center => (iw.saturating_sub(mw) / 2, ih.saturating_sub(mh) / 2),
    }
}

/// Logo size on an `image`-sized canvas: `scale` of the width, aspect kept,
/// never larger than the area inside the margins.
pub fn mark_size(
    image: (u32, u32),
    logo: (u32, u32),
    options: &WatermarkOptions,
) -> Result<(u32, u32), WatermarkError> {
    let (iw, ih) = image;
    let (lw, lh) = (logo.0.max(1) as f64, logo.1.max(1) as f64);
    let max_w = iw.saturating_sub(options.margin.saturating_mul(2));
    let max_h = ih.saturating_sub(options.margin.saturating_mul(2));
    if max_w == 0 || max_h == 0 {
        return Err(WatermarkError::ImageTooSmall {
            width: iw,
            height: ih,
        });
    }

    let mut w = ((iw as f64) * options.scale as f64).round().clamp(1.0, max_w as f64);
    let mut h = (w * lh / lw).round().max(1.0);
    if h > max_h as f64 {
        h = max_h as f64;
        w = (h * lw / lh).round().clamp(1.0, max_w as f64);
    }
    Ok((w as u32, h as u32))
}

/// A loaded logo plus placement options
#[derive(Debug, Clone)]
pub struct Watermark {
    logo: RgbaImage,
    options: WatermarkOptions,
}

impl Watermark {
    pub fn new(logo: DynamicImage, options: WatermarkOptions) -> Self {
        Self {
            logo: logo.to_rgba8(),
            options,
        }
    }

    pub fn load(path: &Path, options: WatermarkOptions) -> Result<Self, WatermarkError> {
        let logo = image::open(path)?;
        Ok(Self::new(logo, options))
    }

    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }

    /// Composite the logo onto a copy of `base`
    pub fn apply(&self, base: &DynamicImage) -> Result<RgbaImage, WatermarkError> {
        let (iw, ih) = base.dimensions();
        let (mw, mh) = mark_size((iw, ih), self.logo.dimensions(), &self.options)?;

        let mut mark = imageops::resize(&self.logo, mw, mh, FilterType::Triangle);
        let opacity = self.options.opacity.clamp(0.0, 1.0);
        for pixel in mark.pixels_mut() {
            pixel.0[3] = (pixel.0[3] as f32 * opacity).round() as u8;
        }

        let (x, y) = overlay_origin((iw, ih), (mw, mh), self.options.position, self.options.margin);
        let mut canvas = base.to_rgba8();
        imageops::overlay(&mut canvas, &mark, i64::from(x), i64::from(y));
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn solid(w: u32, h: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, color))
    }

    fn opaque(position: WatermarkPosition) -> WatermarkOptions {
        WatermarkOptions {
            position,
            opacity: 1.0,
            margin: 10,
            scale: 0.25,
        }
    }

    #[test]
    fn test_overlay_origin_anchors() {
        let cases = [
            (WatermarkPosition::TopLeft, (10, 10)),
            (WatermarkPosition::TopRight, (290, 10)),
            (WatermarkPosition::BottomLeft, (10, 240)),
            (WatermarkPosition::BottomRight, (290, 240)),
            (WatermarkPosition::Center, (150, 125)),
        ];
        for (position, expected) in cases {
            assert_eq!(
                overlay_origin((400, 300), (100, 50), position, 10),
                expected,
                "{position}"
            );
        }
    }

    #[test]
    fn test_oversized_mark_clamps_to_origin() {
        assert_eq!(
            overlay_origin((50, 50), (80, 80), WatermarkPosition::BottomRight, 10),
            (0, 0)
        );
    }

    #[test]
    fn test_mark_size_keeps_aspect() {
        let size = mark_size((400, 300), (200, 100), &opaque(WatermarkPosition::Center)).unwrap();
        assert_eq!(size, (100, 50));

        // Tall logo capped by the height inside the margins
        let size = mark_size((400, 100), (10, 100), &opaque(WatermarkPosition::Center)).unwrap();
        assert_eq!(size, (8, 80));

        assert!(matches!(
            mark_size((15, 15), (10, 10), &opaque(WatermarkPosition::Center)),
            Err(WatermarkError::ImageTooSmall { .. })
        ));
    }

    #[test]
    fn test_apply_lands_at_each_anchor() {
        let base = solid(400, 300, WHITE);
        for position in WatermarkPosition::ALL {
            let mark = Watermark::new(solid(200, 100, RED), opaque(position));
            let out = mark.apply(&base).unwrap();
            let (x, y) = overlay_origin((400, 300), (100, 50), position, 10);

            // Inside the mark: both corners red
            assert_eq!(*out.get_pixel(x, y), RED, "{position} top-left");
            assert_eq!(*out.get_pixel(x + 99, y + 49), RED, "{position} bottom-right");
            // Just outside the mark: untouched
            if x > 0 {
                assert_eq!(*out.get_pixel(x - 1, y), WHITE, "{position} left edge");
            }
            if x + 100 < 400 {
                assert_eq!(*out.get_pixel(x + 100, y), WHITE, "{position} right edge");
            }
        }
    }

    #[test]
    fn test_opacity_blends() {
        let base = solid(400, 300, WHITE);
        let options = WatermarkOptions {
            opacity: 0.5,
            ..opaque(WatermarkPosition::TopLeft)
        };
        let out = Watermark::new(solid(200, 100, RED), options).apply(&base).unwrap();
        let px = out.get_pixel(20, 20);
        assert_eq!(px.0[0], 255);
        // Green channel sits between white and red
        assert!(px.0[1] > 100 && px.0[1] < 160, "green = {}", px.0[1]);
    }

    #[test]
    fn test_position_parsing() {
        let parse = |s: &str| s.parse::<WatermarkPosition>();
        assert_eq!(parse("bottom-right"), Ok(WatermarkPosition::BottomRight));
        assert_eq!(parse("TOP_LEFT"), Ok(WatermarkPosition::TopLeft));
        assert_eq!(parse("topRight"), Ok(WatermarkPosition::TopRight));
        assert!("middle".parse::<WatermarkPosition>().is_err());
    }
}
