use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::SessionContext;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_email, validate_nickname};

pub async fn update_me(
    service: &UserService,
    session: SessionContext,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(mail) = update_data.mail.as_mut() {
        *mail = mail.trim().to_string();
        if let Err(msg) = validate_email(mail) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserValidationFailed,
                msg,
            )));
        }
    }

    if let Some(nickname) = update_data.nickname.as_mut() {
        *nickname = nickname.trim().to_string();
        if let Err(msg) = validate_nickname(nickname) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserValidationFailed,
                msg,
            )));
        }
    }

    let storage = service.get_storage(request);

    match storage.update_user(session.user_id, update_data).await {
        Ok(Some(user)) => {
            tracing::info!("User {} updated their profile", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "User updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
