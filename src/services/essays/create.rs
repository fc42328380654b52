use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EssayService;
use crate::middlewares::SessionContext;
use crate::models::essays::requests::CreateEssayRequest;
use crate::models::essays::responses::CreateEssayResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{MAX_ESSAY_CHARS, validate_text};

pub async fn create_essay(
    service: &EssayService,
    session: SessionContext,
    essay: CreateEssayRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_text(&essay.essay_text, MAX_ESSAY_CHARS) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    match storage.create_essay(session.user_id, essay).await {
        Ok(essay) => {
            info!("User {} created essay {}", session.user_id, essay.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CreateEssayResponse { essay_id: essay.id },
                "Essay created",
            )))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
