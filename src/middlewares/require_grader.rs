/*!
 * 评分回调认证中间件
 *
 * 外部评分服务通过 `X-Grader-Token` 头携带共享密钥回写结果。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::warn;

use super::create_error_response;
use crate::config::AppConfig;
use crate::models::ErrorCode;

pub const GRADER_TOKEN_HEADER: &str = "X-Grader-Token";

#[derive(Clone)]
pub struct RequireGrader;

/// 逐字节比较，耗时与内容无关
fn token_matches(given: &[u8], expected: &[u8]) -> bool {
    if given.len() != expected.len() || expected.is_empty() {
        return false;
    }
    given
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

impl<S, B> Transform<S, ServiceRequest> for RequireGrader
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireGraderMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireGraderMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireGraderMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireGraderMiddleware<S>
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
            let expected = AppConfig::get().grading.callback_token.as_bytes();
            let authorized = req
                .headers()
                .get(GRADER_TOKEN_HEADER)
                .is_some_and(|v| token_matches(v.as_bytes(), expected));

            if authorized {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            warn!("Rejected grader callback to {}: bad token", req.path());
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Invalid grader token",
                )
                .map_into_right_body(),
            ))
        })
    }
}
