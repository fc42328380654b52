use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::essays::requests::{AppealRequest, CreateEssayRequest, UpdateEssayRequest};
use crate::services::EssayService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EssayService 实例
static ESSAY_SERVICE: Lazy<EssayService> = Lazy::new(EssayService::new_lazy);

pub async fn list_published(req: HttpRequest) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.list_published(&req).await
}

pub async fn list_appeals(req: HttpRequest) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.list_appeals(&req).await
}

pub async fn create_essay(
    req: HttpRequest,
    session: SessionContext,
    essay: web::Json<CreateEssayRequest>,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE
        .create_essay(session, essay.into_inner(), &req)
        .await
}

pub async fn get_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: Option<SessionContext>,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.get_essay(essay_id.0, session, &req).await
}

pub async fn update_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
    update: web::Json<UpdateEssayRequest>,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE
        .update_essay(essay_id.0, session, update.into_inner(), &req)
        .await
}

pub async fn save_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.save_essay(essay_id.0, session, &req).await
}

pub async fn appeal_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
    appeal: web::Json<AppealRequest>,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE
        .appeal_essay(essay_id.0, session, appeal.into_inner(), &req)
        .await
}

pub async fn publish_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE
        .set_published(essay_id.0, session, true, &req)
        .await
}

pub async fn unpublish_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE
        .set_published(essay_id.0, session, false, &req)
        .await
}

pub async fn list_my_essays(
    req: HttpRequest,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.list_mine(session, &req).await
}

pub async fn get_my_essay(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    ESSAY_SERVICE.get_my_essay(essay_id.0, session, &req).await
}

// 配置路由
pub fn configure_essay_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/published/essays", web::get().to(list_published))
        .service(
            web::scope("/essays")
                .route("", web::get().to(list_published))
                .route(
                    "",
                    web::post()
                        .to(create_essay)
                        .wrap(middlewares::RequireSession),
                )
                // 需在 /{id} 之前注册
                .route(
                    "/appeal",
                    web::get()
                        .to(list_appeals)
                        .wrap(middlewares::RequireModerator)
                        .wrap(middlewares::RequireSession),
                )
                .route("/{id}", web::get().to(get_essay))
                .service(
                    web::scope("/{id}")
                        .wrap(middlewares::RequireSession)
                        .route("", web::put().to(update_essay))
                        .route("/save", web::put().to(save_essay))
                        .route("/appeal", web::put().to(appeal_essay))
                        .route("/publish", web::put().to(publish_essay))
                        .route("/unpublish", web::put().to(unpublish_essay)),
                ),
        );
}
