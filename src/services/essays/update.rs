use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EssayService;
use crate::middlewares::SessionContext;
use crate::models::essays::requests::UpdateEssayRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{MAX_ESSAY_CHARS, validate_text};

pub async fn update_essay(
    service: &EssayService,
    essay_id: i64,
    session: SessionContext,
    update: UpdateEssayRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_text(&update.essay_text, MAX_ESSAY_CHARS) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage
        .update_essay_text(essay_id, session.user_id, update.essay_text)
        .await
    {
        Ok(essay) => {
            info!("Essay {} updated by its author", essay.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "Essay updated")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
