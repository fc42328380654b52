use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::{CreateUserRequest, RegisterRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_nickname, validate_password_simple};

use super::AuthService;
use super::login::issue_session;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mail = register_request.mail.trim().to_string();
    let nickname = register_request.nickname.trim().to_string();

    // 验证邮箱
    if let Err(msg) = validate_email(&mail) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserValidationFailed,
            msg,
        )));
    }

    // 验证昵称
    if let Err(msg) = validate_nickname(&nickname) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserValidationFailed,
            msg,
        )));
    }

    // 验证密码强度
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserValidationFailed,
            msg,
        )));
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let storage = service.get_storage(request);
    let create_request = CreateUserRequest {
        mail,
        nickname,
        password: password_hash,
        is_moderator: false,
        count_checks: service.get_config().quota.default_checks,
    };

    // 邮箱唯一性由存储层的唯一约束保证
    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered", user.id);
            Ok(issue_session(user, HttpResponse::Created(), "Registration successful"))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
