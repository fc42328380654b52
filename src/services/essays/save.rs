use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::EssayService;
use crate::errors::EssayError;
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;
use crate::models::essays::requests::GradingRequest;

/// 扣减一次检查次数并将草稿交给评分服务
///
/// 状态与次数在存储层同一事务内提交，之后才发送评分请求。
/// 发送失败时返回 502，但已提交的状态不会回滚。
pub async fn save_essay(
    service: &EssayService,
    essay_id: i64,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let essay = match storage.save_essay(essay_id, session.user_id).await {
        Ok(essay) => essay,
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };
    info!(
        "Essay {} saved by user {}, dispatching to grader",
        essay.id, session.user_id
    );

    let variant = match storage.get_variant_by_id(essay.variant_id).await {
        Ok(Some(variant)) => variant,
        Ok(None) => {
            return Ok(ApiResponse::from_error(&EssayError::not_found(format!(
                "Variant {} not found",
                essay.variant_id
            ))));
        }
        Err(e) => return Ok(ApiResponse::from_error(&e)),
    };

    let grading_request = GradingRequest {
        essay_id: essay.id,
        essay_text: essay.essay_text.clone(),
        variant_text: variant.variant_text,
        author_position: variant.author_position,
    };

    if let Err(e) = service.get_dispatcher(request).dispatch(&grading_request).await {
        warn!("Failed to dispatch essay {} for grading: {}", essay.id, e);
        return Ok(ApiResponse::from_error(&e));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(essay, "Essay submitted for grading")))
}
