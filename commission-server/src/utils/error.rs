//! 统一错误处理
//!
//! Re-exports the shared error types and adds response helpers for handlers.
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::commission_not_found(id))
//!
//! // 返回成功响应
//! Ok(ok(commission))
//! ```

use axum::Json;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Wrap data in a success envelope
pub fn ok<T>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Wrap data in a success envelope with a custom message
pub fn ok_with_message<T>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
