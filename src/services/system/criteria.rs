use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::ApiResponse;

pub async fn list_criteria(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_criteria().await {
        Ok(criteria) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            criteria,
            "Criteria retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
