//! 统一错误处理
//!
//! 错误类型统一来自 `shared::error`，本模块负责把服务端内部错误
//! (存储、上传) 转换为 [`AppError`]。
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Customer 42"))
//!
//! // 存储错误直接 `?`
//! let customer = state.storage.get_customer(id)?;
//! ```

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

use axum::extract::multipart::MultipartError;

use crate::db::StorageError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::PhoneTaken { phone, existing } => AppError::already_exists(format!(
                "Phone {} (customer {})",
                phone, existing
            )),
            other => AppError::database(other.to_string()),
        }
    }
}

/// Convert a multipart parsing failure into a validation error
pub fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(format!("Multipart error: {}", e))
}

/// A blocking task that panicked or was cancelled
pub fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError::internal(format!("Background task failed: {}", e))
}
