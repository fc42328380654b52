use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::debug;

use super::SocialService;
use crate::errors::{EssayError, Result};
use crate::middlewares::SessionContext;
use crate::models::ApiResponse;
use crate::models::social::entities::LikeState;
use crate::services::essays::find_essay;
use crate::storage::Storage;

/// 有则取消，无则点赞，返回操作后的状态
///
/// 并发下另一请求可能先完成同一操作，此时以存储中的结果为准。
async fn toggle(storage: &Arc<dyn Storage>, user_id: i64, essay_id: i64) -> Result<LikeState> {
    let essay = find_essay(storage, essay_id).await?;
    essay.ensure_published()?;

    let is_liked = if storage.is_liked(user_id, essay_id).await? {
        match storage.remove_like(user_id, essay_id).await {
            Ok(()) | Err(EssayError::NotFound(_)) => false,
            Err(e) => return Err(e),
        }
    } else {
        match storage.add_like(user_id, essay_id).await {
            Ok(()) | Err(EssayError::AlreadyLiked(_)) => true,
            Err(e) => return Err(e),
        }
    };
    debug!("User {} like on essay {}: {}", user_id, essay_id, is_liked);

    Ok(LikeState {
        essay_id,
        is_liked,
        likes: storage.count_likes(essay_id).await?,
    })
}

pub async fn toggle_like(
    service: &SocialService,
    essay_id: i64,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match toggle(&storage, session.user_id, essay_id).await {
        Ok(state) => Ok(HttpResponse::Ok().json(ApiResponse::success(state, "Like updated"))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn get_likes(
    service: &SocialService,
    essay_id: i64,
    session: Option<SessionContext>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let likes = async {
        let essay = find_essay(&storage, essay_id).await?;
        if !essay.engagement_visible_to(session.map(|s| s.viewer())) {
            return Err(EssayError::forbidden("Essay is not published"));
        }
        storage.count_likes(essay_id).await
    };

    match likes.await {
        Ok(likes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            likes,
            "Likes retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}

pub async fn is_liked(
    service: &SocialService,
    essay_id: i64,
    session: SessionContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let liked = async {
        let essay = find_essay(&storage, essay_id).await?;
        if !essay.engagement_visible_to(Some(session.viewer())) {
            return Err(EssayError::forbidden("Essay is not published"));
        }
        storage.is_liked(session.user_id, essay_id).await
    };

    match liked.await {
        Ok(liked) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            liked,
            "Like state retrieved successfully",
        ))),
        Err(e) => Ok(ApiResponse::from_error(&e)),
    }
}
