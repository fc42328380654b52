use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::responses::NicknameResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_nickname(
    service: &UserService,
    mail: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_mail(mail.trim()).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            NicknameResponse {
                nickname: user.nickname,
            },
            "Nickname retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
