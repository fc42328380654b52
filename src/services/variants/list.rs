use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VariantService;
use crate::models::ApiResponse;

pub async fn list_variants(
    service: &VariantService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_variants().await {
        Ok(variants) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            variants,
            "Variants retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
