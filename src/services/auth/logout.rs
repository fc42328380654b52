use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_session::forget_session;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
/// 清除缓存的会话并下发过期的会话 cookie
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    forget_session(request).await;

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_session_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::success_empty("登出成功")))
}
