use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn get_counts(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.get_counts(&request).await
}

pub async fn list_criteria(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.list_criteria(&request).await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/counts", web::get().to(get_counts))
        .route("/criteria", web::get().to(list_criteria));
}
