use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EssayService;
use crate::errors::EssayError;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;

pub async fn get_essay(
    service: &EssayService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let essay = match storage.get_essay_by_id(essay_id).await {
        Ok(Some(essay)) => essay,
        Ok(None) => {
            return Ok(ApiResponse::from_error(&EssayError::not_found(format!(
                "Essay {essay_id} not found"
            ))));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    if !essay.is_visible_to(session.map(|s| s.viewer())) {
        return Ok(ApiResponse::from_error(&EssayError::forbidden(
            "You are not allowed to view this essay",
        )));
    }

    respond_detailed(service, essay_id, request).await
}

pub async fn get_my_essay(
    service: &EssayService,
    essay_id: i64,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_essay_by_id(essay_id).await {
        Ok(Some(essay)) => {
            if let Err(e) = essay.ensure_author(session.user_id) {
                return Ok(ApiResponse::from_error(&e));
            }
        }
        Ok(None) => {
            return Ok(ApiResponse::from_error(&EssayError::not_found(format!(
                "Essay {essay_id} not found"
            ))));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    }

    respond_detailed(service, essay_id, request).await
}

async fn respond_detailed(
    service: &EssayService,
    essay_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_detailed_essay(essay_id).await {
        Ok(Some(detailed)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detailed,
            "Essay retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::from_error(&EssayError::not_found(format!(
            "Essay {essay_id} not found"
        )))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
