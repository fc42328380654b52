use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResultService;
use crate::errors::{EssayError, Result};
use crate::middlewares::SessionContext;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::essays::find_essay;

// 结果的可见性与作文一致
async fn ensure_visible(
    service: &ResultService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> Result<()> {
    let essay = find_essay(&service.get_storage(request), essay_id).await?;
    if !essay.is_visible_to(session.map(|s| s.viewer())) {
        return Err(EssayError::forbidden(
            "You are not allowed to view results of this essay",
        ));
    }
    Ok(())
}

pub async fn get_latest(
    service: &ResultService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = ensure_visible(service, essay_id, session, request).await {
        return Ok(ApiResponse::from_error(&e));
    }

    let storage = service.get_storage(request);

    match storage.get_latest_result(essay_id).await {
        Ok(Some(result)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Result retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ResultNotFound,
            "Essay has no result yet",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_history(
    service: &ResultService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = ensure_visible(service, essay_id, session, request).await {
        return Ok(ApiResponse::from_error(&e));
    }

    let storage = service.get_storage(request);

    match storage.list_results(essay_id).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            results,
            "Result history retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
