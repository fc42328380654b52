use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EssayService;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;

pub async fn list_published(
    service: &EssayService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_published_essays().await {
        Ok(cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            cards,
            "Published essays retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_mine(
    service: &EssayService,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_user_essays(session.user_id).await {
        Ok(cards) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            cards,
            "Essays retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_appeals(
    service: &EssayService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_appeal_essays().await {
        Ok(essays) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            essays,
            "Appeal queue retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
