/*!
 * 会话认证中间件
 *
 * 校验 Cookie（或 `Authorization: Bearer`）中的会话令牌，
 * 确认用户仍然存在后把 [`SessionContext`] 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/essays")
 *     .wrap(RequireSession)
 *     .route("", web::post().to(create_essay))
 * ```
 *
 * 处理程序直接提取 `SessionContext`；公开路由可以提取
 * `Option<SessionContext>`，此时会话在提取时解析。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::EssayError;
use crate::models::ErrorCode;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::{Deserialize, Serialize};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

/// 当前请求的会话信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user_id: i64,
    pub is_moderator: bool,
}

impl SessionContext {
    /// 用于可见性判断的 (user_id, is_moderator)
    pub fn viewer(&self) -> (i64, bool) {
        (self.user_id, self.is_moderator)
    }

    pub fn ensure_moderator(&self) -> Result<(), EssayError> {
        if !self.is_moderator {
            return Err(EssayError::forbidden("Moderator role required"));
        }
        Ok(())
    }
}

fn cache_key(token: &str) -> String {
    format!("session:{token}")
}

/// 移除已缓存的会话（注销时调用）
pub async fn forget_session(req: &HttpRequest) {
    if let Some(token) = JwtUtils::extract_session_token(req)
        && let Some(cache) = req.app_data::<web::Data<Arc<dyn ObjectCache>>>()
    {
        cache.remove(&cache_key(&token)).await;
    }
}

// 辅助函数：提取并验证会话令牌
async fn resolve_session(req: &HttpRequest) -> Result<SessionContext, String> {
    let token = JwtUtils::extract_session_token(req)
        .ok_or_else(|| "Missing session".to_string())?;

    let claims = JwtUtils::verify_token(&token).map_err(|err| {
        info!("Session token validation failed: {}", err);
        "Invalid session".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let key = cache_key(&token);
    if let CacheResult::Found(session) = cache.get::<SessionContext>(&key).await {
        return Ok(session);
    }
    debug!("Session not cached, loading user from storage");

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in session".to_string())?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    // 角色以数据库为准
    let session = SessionContext {
        user_id: user.id,
        is_moderator: user.is_moderator,
    };
    cache.insert(key, &session).await;

    Ok(session)
}

fn forbidden(message: String) -> Error {
    let response = create_error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, &message);
    InternalError::from_response(message, response).into()
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(session) = req.extensions().get::<SessionContext>().copied() {
            return Box::pin(ready(Ok(session)));
        }

        let req = req.clone();
        Box::pin(async move {
            let session = resolve_session(&req).await.map_err(forbidden)?;
            req.extensions_mut().insert(session);
            Ok(session)
        })
    }
}

#[derive(Clone)]
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_session(req.request()).await {
                Ok(session) => {
                    debug!("Session authentication successful for ID: {}", session.user_id);
                    req.extensions_mut().insert(session);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "Session authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            &format!("Forbidden: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
