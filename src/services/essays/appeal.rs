use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EssayService;
use crate::middlewares::SessionContext;
use crate::models::essays::requests::AppealRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{MAX_COMMENT_CHARS, validate_text};

pub async fn appeal_essay(
    service: &EssayService,
    essay_id: i64,
    session: SessionContext,
    appeal: AppealRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_text(&appeal.appeal_text, MAX_COMMENT_CHARS) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage
        .appeal_essay(essay_id, session.user_id, appeal.appeal_text)
        .await
    {
        Ok(essay) => {
            info!("Essay {} moved to the appeal queue", essay.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "Appeal submitted")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
