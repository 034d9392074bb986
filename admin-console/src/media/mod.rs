//! Image handling for uploads

pub mod process;
pub mod watermark;

pub use process::{ProcessedImage, SUPPORTED_FORMATS, watermark_or_original};
pub use watermark::{
    Watermark, WatermarkError, WatermarkOptions, WatermarkPosition, mark_size, overlay_origin,
};
