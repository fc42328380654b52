pub mod comments;
pub mod likes;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::social::requests::CreateCommentRequest;
use crate::storage::Storage;

pub struct SocialService {
    storage: Option<Arc<dyn Storage>>,
}

impl SocialService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 点赞/取消点赞
    pub async fn toggle_like(
        &self,
        essay_id: i64,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        likes::toggle_like(self, essay_id, session, request).await
    }

    // 点赞数
    pub async fn get_likes(
        &self,
        essay_id: i64,
        session: Option<SessionContext>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        likes::get_likes(self, essay_id, session, request).await
    }

    // 当前用户是否点赞
    pub async fn is_liked(
        &self,
        essay_id: i64,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        likes::is_liked(self, essay_id, session, request).await
    }

    // 发表评论
    pub async fn add_comment(
        &self,
        essay_id: i64,
        session: SessionContext,
        comment: CreateCommentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        comments::add_comment(self, essay_id, session, comment, request).await
    }

    // 评论列表
    pub async fn list_comments(
        &self,
        essay_id: i64,
        session: Option<SessionContext>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        comments::list_comments(self, essay_id, session, request).await
    }
}
