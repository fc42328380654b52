use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::EssayError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    /// 业务错误到 HTTP 状态码与错误码的映射
    pub fn status_for(err: &EssayError) -> (StatusCode, ErrorCode) {
        match err {
            EssayError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            EssayError::Forbidden(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
            EssayError::WrongOwner(_) => (StatusCode::FORBIDDEN, ErrorCode::WrongOwner),
            EssayError::InvalidState(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidEssayState),
            // 检查次数用尽沿用 404
            EssayError::NoChecksLeft(_) => (StatusCode::NOT_FOUND, ErrorCode::NoChecksLeft),
            EssayError::DuplicateEmail(_) => (StatusCode::CONFLICT, ErrorCode::DuplicateEmail),
            EssayError::AlreadyLiked(_) => (StatusCode::CONFLICT, ErrorCode::AlreadyLiked),
            EssayError::InvalidInput(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
            EssayError::UpstreamFailure(_) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::GradingUnavailable)
            }
            EssayError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::AuthFailed),
            EssayError::StorageFailure(_)
            | EssayError::DatabaseConfig(_)
            | EssayError::DatabaseConnection(_)
            | EssayError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            ),
        }
    }

    /// 将业务错误渲染为 HTTP 响应，内部错误不向客户端暴露细节
    pub fn from_error(err: &EssayError) -> HttpResponse {
        let (status, code) = Self::status_for(err);
        if err.is_internal() {
            tracing::error!("Request failed: {}", err);
            return HttpResponse::build(status)
                .json(Self::error_empty(code, "Internal server error"));
        }
        HttpResponse::build(status).json(Self::error_empty(code, err.message()))
    }
}
