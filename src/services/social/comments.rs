use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SocialService;
use crate::errors::EssayError;
use crate::middlewares::SessionContext;
use crate::models::social::requests::CreateCommentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::essays::find_essay;
use crate::utils::validate::{MAX_COMMENT_CHARS, validate_text};

pub async fn add_comment(
    service: &SocialService,
    essay_id: i64,
    session: SessionContext,
    comment: CreateCommentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_text(&comment.comment_text, MAX_COMMENT_CHARS) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    let storage = service.get_storage(request);

    let created = async {
        find_essay(&storage, essay_id).await?.ensure_published()?;
        storage
            .add_comment(session.user_id, essay_id, comment.comment_text)
            .await
    };

    match created.await {
        Ok(comment) => {
            info!("User {} commented on essay {}", session.user_id, essay_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(comment, "Comment added")))
        }
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn list_comments(
    service: &SocialService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let comments = async {
        let essay = find_essay(&storage, essay_id).await?;
        if !essay.engagement_visible_to(session.map(|s| s.viewer())) {
            return Err(EssayError::forbidden("Essay is not published"));
        }
        storage.list_comments(essay_id).await
    };

    match comments.await {
        Ok(comments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            comments,
            "Comments retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
