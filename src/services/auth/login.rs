use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, SessionResponse},
    users::entities::User,
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_user_by_mail(login_request.mail.trim()).await {
        Ok(Some(user)) if verify_password(&login_request.password, &user.password_hash) => {
            tracing::info!("User {} logged in successfully", user.id);
            Ok(issue_session(user, HttpResponse::Ok(), "Login successful"))
        }
        Ok(_) => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Mail or password is incorrect",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

/// 签发会话令牌并写入 Cookie
pub(crate) fn issue_session(
    user: User,
    mut builder: actix_web::HttpResponseBuilder,
    message: &str,
) -> HttpResponse {
    match JwtUtils::generate_session_token(user.id, user.is_moderator) {
        Ok(token) => {
            let response = SessionResponse {
                user,
                expires_at: chrono::Utc::now() + JwtUtils::session_expiry(),
            };
            builder
                .cookie(JwtUtils::create_session_cookie(&token))
                .json(ApiResponse::success(response, message))
        }
        Err(e) => {
            tracing::error!("Failed to generate session token: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Unable to create session",
            ))
        }
    }
}
