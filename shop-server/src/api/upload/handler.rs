//! Image Upload Handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::error::multipart_error;
use crate::utils::{AppError, AppResult};
use shared::client::UploadResponse;

/// POST /api/upload - 上传图片 (字段名 `file`)
pub async fn upload(
    State(state): State<ServerState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("No filename provided in file field"))?;
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((original_name, data.to_vec()));
        break;
    }

    let (original_name, data) = upload
        .ok_or_else(|| AppError::validation("No 'file' field found. Field name must be 'file'"))?;

    let stored = state.images.save(&original_name, &data).await?;

    tracing::info!(
        admin = %user.username,
        original_name = %original_name,
        filename = %stored.filename,
        deduplicated = stored.existed,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        url: state.image_url(&stored.filename),
        filename: stored.filename,
        size: stored.size,
    }))
}

/// GET /api/image/:filename - 公开读取图片
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (bytes, mime) = state.images.read(&filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        bytes,
    ))
}
