//! Upload Routes
//!
//! 菜单图片上传 (管理员) 与公开访问

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;
use crate::services::image_store::MAX_FILE_SIZE;

/// Multipart framing overhead on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router() -> Router<ServerState> {
    let upload = post(handler::upload)
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + MULTIPART_OVERHEAD))
        .layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/api/upload", upload)
        .route("/api/image/{filename}", get(handler::serve))
}
