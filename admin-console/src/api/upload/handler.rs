//! Image upload handler
//!
//! Size, format and decodability are all checked before anything is sent
//! to storage. Objects are named by content hash so re-uploads overwrite
//! themselves.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::api::ApiResult;
use crate::media::process::{self, ProcessedImage};
use crate::state::AppState;

/// Buckets the console may write to
pub const ALLOWED_BUCKETS: &[&str] = &["service-images", "service-listing-media"];

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Optional sub-folder, e.g. a vendor or listing id
    pub folder: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub bucket: String,
    pub path: String,
    pub url: String,
    pub watermarked: bool,
    pub size: usize,
    pub content_type: String,
}

fn too_large(max: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            max,
            max / 1024 / 1024
        ),
    )
}

fn multipart_error(e: MultipartError, max: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(max)
    } else {
        AppError::invalid_request(format!("Invalid multipart request: {e}"))
    }
}

/// Folder names: path segments of `[A-Za-z0-9_-]`
fn clean_folder(folder: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(folder) = folder.map(|f| f.trim_matches('/')).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    let valid = folder.split('/').all(|seg| {
        !seg.is_empty()
            && seg
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    if !valid || folder.len() > 200 {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid upload folder {folder:?}"),
        ));
    }
    Ok(Some(folder.to_string()))
}

/// Read the `file` field, giving up as soon as it exceeds `max` bytes
async fn read_file_field(
    multipart: &mut Multipart,
    max: usize,
) -> Result<(String, Vec<u8>), AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max))? {
            if data.len() + chunk.len() > max {
                return Err(too_large(max));
            }
            data.extend_from_slice(&chunk);
        }
        return Ok((filename, data));
    }
    Err(AppError::new(ErrorCode::NoFileProvided))
}

/// POST /admin/api/uploads/{bucket}?folder=
pub async fn upload(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    if !ALLOWED_BUCKETS.contains(&bucket.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::InvalidBucket,
            format!("Unknown bucket {bucket:?}"),
        ));
    }
    let folder = clean_folder(params.folder.as_deref())?;
    let max = state.config.max_upload_bytes;

    let (filename, data) = read_file_field(&mut multipart, max).await?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }
    let ext = process::supported_extension(&filename)?;

    let watermark = state.watermark.clone();
    let processed: ProcessedImage = tokio::task::spawn_blocking(move || {
        let decoded = process::decode(&data)?;
        Ok::<_, AppError>(process::watermark_or_original(
            &data,
            &decoded,
            &ext,
            watermark.as_deref(),
        ))
    })
    .await
    .map_err(|e| AppError::internal(format!("Image task failed: {e}")))??;

    let name = processed.object_name();
    let path = match folder {
        Some(folder) => format!("{folder}/{name}"),
        None => name,
    };
    let size = processed.bytes.len();
    let stored = state
        .storage
        .upload(&bucket, &path, processed.bytes, &processed.content_type, true)
        .await?;
    let url = state.storage.public_url(&bucket, &stored);

    tracing::info!(
        bucket = %bucket,
        path = %stored,
        original_name = %filename,
        size,
        watermarked = processed.watermarked,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        bucket,
        path: stored,
        url,
        watermarked: processed.watermarked,
        size,
        content_type: processed.content_type,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_folder() {
        assert_eq!(clean_folder(None).unwrap(), None);
        assert_eq!(clean_folder(Some("/")).unwrap(), None);
        assert_eq!(
            clean_folder(Some("/vendor-1/listing_2/")).unwrap().as_deref(),
            Some("vendor-1/listing_2")
        );
        for bad in ["../etc", "a//b", "has space", "dot.dot"] {
            assert!(clean_folder(Some(bad)).is_err(), "{bad}");
        }
    }
}
