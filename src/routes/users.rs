use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::auth::register;
use super::essays::{get_my_essay, list_my_essays};
use crate::middlewares::{self, SessionContext};
use crate::models::users::requests::{NicknameQuery, UpdateUserRequest};
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn get_me(req: HttpRequest, session: SessionContext) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_me(session, &req).await
}

pub async fn update_me(
    req: HttpRequest,
    session: SessionContext,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_me(session, update_data.into_inner(), &req)
        .await
}

pub async fn get_nickname(
    req: HttpRequest,
    query: web::Query<NicknameQuery>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_nickname(query.into_inner().mail, &req).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(register))
            .route("/nickname", web::get().to(get_nickname))
            .service(
                web::scope("/me")
                    .wrap(middlewares::RequireSession)
                    .route("", web::get().to(get_me))
                    .route("", web::put().to(update_me))
                    .route("/essays", web::get().to(list_my_essays))
                    .route("/essays/{id}", web::get().to(get_my_essay)),
            ),
    );
}
