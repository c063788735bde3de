//! Image upload endpoint

use std::{
    path::Path,
    sync::OnceLock,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use regex::Regex;
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

const NO_FILE: &str = "No file uploaded.";
const WRONG_TYPE: &str = "Only images (jpg, jpeg, png, gif) are allowed!";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
}

fn image_types() -> &'static Regex {
    static IMAGE_TYPES: OnceLock<Regex> = OnceLock::new();
    IMAGE_TYPES.get_or_init(|| Regex::new(r"jpe?g|png|gif").expect("Failed to compile image regex"))
}

/// Lowercased extension of an accepted image file name, including the dot
fn accepted_extension(file_name: &str, content_type: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_lowercase();

    if image_types().is_match(&extension) && image_types().is_match(content_type) {
        Some(format!(".{}", extension))
    } else {
        None
    }
}

fn stored_name(extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple().to_string();

    format!("image-{}-{}{}", millis, &suffix[..8], extension)
}

async fn store(dir: &Path, name: &str, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(name), data).await
}

fn read_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::BadRequest("File too large (max 5MB)".to_string())
    } else {
        warn!("Malformed multipart body: {}", err);
        ApiError::BadRequest(NO_FILE.to_string())
    }
}

/// Store one image from the `image` field and return its public path
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|_| ApiError::BadRequest(NO_FILE.to_string()))?;

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().unwrap_or_default().to_string();

        let extension = accepted_extension(&file_name, &content_type)
            .ok_or_else(|| ApiError::BadRequest(WRONG_TYPE.to_string()))?;

        let data = field.bytes().await.map_err(read_error)?;
        if data.len() > state.uploads.max_bytes {
            return Err(ApiError::BadRequest("File too large (max 5MB)".to_string()));
        }

        let name = stored_name(&extension);
        store(&state.uploads.dir, &name, &data).await.map_err(|e| {
            error!("Failed to store upload {}: {}", name, e);
            ApiError::InternalServerError
        })?;

        info!("Stored upload {} ({} bytes)", name, data.len());
        return Ok(Json(UploadResponse {
            file_path: format!("/uploads/{}", name),
        }));
    }

    Err(ApiError::BadRequest(NO_FILE.to_string()))
}
