use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ResultService;
use crate::models::ApiResponse;
use crate::models::results::entities::ResultKind;
use crate::models::results::requests::ResultSubmission;

pub async fn record_result(
    service: &ResultService,
    essay_id: i64,
    submission: ResultSubmission,
    kind: ResultKind,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .record_result(essay_id, submission.into_entries(), kind)
        .await
    {
        Ok(result) => {
            info!(
                "Recorded {:?} result {} for essay {} (sum {})",
                kind, result.id, essay_id, result.sum_score
            );
            let mut builder = match kind {
                ResultKind::Initial => HttpResponse::Created(),
                ResultKind::Appeal => HttpResponse::Ok(),
            };
            Ok(builder.json(ApiResponse::success(result, "Result recorded")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
