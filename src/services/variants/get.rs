use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VariantService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_variant(
    service: &VariantService,
    variant_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_variant_by_id(variant_id).await {
        Ok(Some(variant)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            variant,
            "Variant retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::VariantNotFound,
            "Variant not found",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
