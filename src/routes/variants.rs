use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::variants::requests::CreateVariantRequest;
use crate::services::VariantService;
use crate::utils::SafeIDI64;

// 懒加载的全局 VariantService 实例
static VARIANT_SERVICE: Lazy<VariantService> = Lazy::new(VariantService::new_lazy);

pub async fn list_variants(req: HttpRequest) -> ActixResult<HttpResponse> {
    VARIANT_SERVICE.list_variants(&req).await
}

pub async fn get_variant(req: HttpRequest, variant_id: SafeIDI64) -> ActixResult<HttpResponse> {
    VARIANT_SERVICE.get_variant(variant_id.0, &req).await
}

pub async fn create_variant(
    req: HttpRequest,
    variant: web::Json<CreateVariantRequest>,
) -> ActixResult<HttpResponse> {
    VARIANT_SERVICE
        .create_variant(variant.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_variant_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/variants")
            .route("", web::get().to(list_variants))
            .route(
                "",
                web::post()
                    .to(create_variant)
                    .wrap(middlewares::RequireModerator)
                    .wrap(middlewares::RequireSession),
            )
            .route("/{id}", web::get().to(get_variant)),
    );
}
