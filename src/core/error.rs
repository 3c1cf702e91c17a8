//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use super::response::Notification;

/// 核心错误类型
///
/// 后端请求的所有失败都归为 `RequestFailed`，用户只能看到后端返回的
/// message（若有），否则看到调用方给出的兜底文案。
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("request failed: {}", .message.as_deref().unwrap_or("no message"))]
    RequestFailed {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("session storage error: {0}")]
    Session(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl CoreError {
    pub fn request_failed(status: Option<u16>, message: Option<String>) -> Self {
        CoreError::RequestFailed {
            status,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::RequestFailed { .. } => StatusCode::BAD_GATEWAY,
            CoreError::Session(_) | CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::NotFound(_) => "NOT_FOUND",
            CoreError::RequestFailed { .. } => "REQUEST_FAILED",
            CoreError::Session(_) => "SESSION_ERROR",
            CoreError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// 面向用户的提示文案
    ///
    /// 校验错误直接展示；后端失败优先展示后端 message，否则用 `fallback`。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CoreError::Validation(msg) => msg.clone(),
            CoreError::RequestFailed {
                message: Some(msg), ..
            } => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// 转换为错误提示
    pub fn notification(&self, fallback: &str) -> Notification {
        Notification::error(self.user_message(fallback))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid"))
                })
            })
            .collect();
        // field_errors 来自 HashMap，排序保证提示稳定
        messages.sort();

        CoreError::Validation(messages.join(", "))
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = ErrorResponse {
            error: self.code().to_string(),
            message: self.user_message(&self.to_string()),
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}
