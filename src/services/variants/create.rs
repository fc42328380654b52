use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::VariantService;
use crate::models::variants::requests::CreateVariantRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{MAX_ESSAY_CHARS, validate_text};

pub async fn create_variant(
    service: &VariantService,
    variant: CreateVariantRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    for field in [
        &variant.variant_title,
        &variant.variant_text,
        &variant.author_position,
    ] {
        if let Err(msg) = validate_text(field, MAX_ESSAY_CHARS) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                msg,
            )));
        }
    }

    let storage = service.get_storage(request);

    match storage.create_variant(variant).await {
        Ok(variant) => {
            tracing::info!("Variant {} created", variant.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(variant, "Variant created")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
