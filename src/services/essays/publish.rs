use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EssayService;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;

pub async fn set_published(
    service: &EssayService,
    essay_id: i64,
    session: SessionContext,
    publish: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .set_essay_published(essay_id, session.user_id, publish)
        .await
    {
        Ok(essay) => {
            info!("Essay {} is_published={}", essay.id, essay.is_published);
            let message = if essay.is_published {
                "Essay published"
            } else {
                "Essay unpublished"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(essay, message)))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
