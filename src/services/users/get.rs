use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::SessionContext;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_me(
    service: &UserService,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_info(session.user_id).await {
        Ok(Some(info)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            info,
            "User information retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
