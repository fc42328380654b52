use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::results::entities::ResultKind;
use crate::models::results::requests::ResultSubmission;
use crate::services::ResultService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ResultService 实例
static RESULT_SERVICE: Lazy<ResultService> = Lazy::new(ResultService::new_lazy);

pub async fn record_result(
    req: HttpRequest,
    essay_id: SafeIDI64,
    submission: web::Json<ResultSubmission>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .record_result(essay_id.0, submission.into_inner(), ResultKind::Initial, &req)
        .await
}

pub async fn record_appeal_result(
    req: HttpRequest,
    essay_id: SafeIDI64,
    submission: web::Json<ResultSubmission>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE
        .record_result(essay_id.0, submission.into_inner(), ResultKind::Appeal, &req)
        .await
}

pub async fn get_latest(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: Option<SessionContext>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.get_latest(essay_id.0, session, &req).await
}

pub async fn get_history(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: Option<SessionContext>,
) -> ActixResult<HttpResponse> {
    RESULT_SERVICE.get_history(essay_id.0, session, &req).await
}

// 配置路由
pub fn configure_result_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/result")
            .route(
                "/appeal/{id}",
                web::post()
                    .to(record_appeal_result)
                    .wrap(middlewares::RequireGrader),
            )
            .route(
                "/{id}",
                web::post().to(record_result).wrap(middlewares::RequireGrader),
            )
            .route("/{id}", web::get().to(get_latest))
            .route("/{id}/history", web::get().to(get_history)),
    );
}
