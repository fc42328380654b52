use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, SessionContext};
use crate::models::social::requests::CreateCommentRequest;
use crate::services::SocialService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SocialService 实例
static SOCIAL_SERVICE: Lazy<SocialService> = Lazy::new(SocialService::new_lazy);

pub async fn toggle_like(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    SOCIAL_SERVICE.toggle_like(essay_id.0, session, &req).await
}

pub async fn get_likes(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: Option<SessionContext>,
) -> ActixResult<HttpResponse> {
    SOCIAL_SERVICE.get_likes(essay_id.0, session, &req).await
}

pub async fn is_liked(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
) -> ActixResult<HttpResponse> {
    SOCIAL_SERVICE.is_liked(essay_id.0, session, &req).await
}

pub async fn add_comment(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: SessionContext,
    comment: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    SOCIAL_SERVICE
        .add_comment(essay_id.0, session, comment.into_inner(), &req)
        .await
}

pub async fn list_comments(
    req: HttpRequest,
    essay_id: SafeIDI64,
    session: Option<SessionContext>,
) -> ActixResult<HttpResponse> {
    SOCIAL_SERVICE.list_comments(essay_id.0, session, &req).await
}

// 配置路由
pub fn configure_social_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/likes")
            .route(
                "/is_liked/{id}",
                web::get().to(is_liked).wrap(middlewares::RequireSession),
            )
            .route(
                "/{id}",
                web::put().to(toggle_like).wrap(middlewares::RequireSession),
            )
            .route("/{id}", web::get().to(get_likes)),
    )
    .service(
        web::scope("/comments")
            .route(
                "/{id}",
                web::post().to(add_comment).wrap(middlewares::RequireSession),
            )
            .route("/{id}", web::get().to(list_comments)),
    );
}
