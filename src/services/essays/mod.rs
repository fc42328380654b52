pub mod appeal;
pub mod create;
pub mod detail;
pub mod list;
pub mod publish;
pub mod save;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::essays::requests::{AppealRequest, CreateEssayRequest, UpdateEssayRequest};
use crate::services::grading::GradingDispatcher;
use crate::storage::Storage;

pub struct EssayService {
    storage: Option<Arc<dyn Storage>>,
}

impl EssayService {
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

    pub(crate) fn get_dispatcher(&self, request: &HttpRequest) -> Arc<dyn GradingDispatcher> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn GradingDispatcher>>>()
            .expect("Grading dispatcher not found in app data")
            .get_ref()
            .clone()
    }

    // 创建草稿
    pub async fn create_essay(
        &self,
        session: SessionContext,
        essay: CreateEssayRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_essay(self, session, essay, request).await
    }

    // 公开作文列表
    pub async fn list_published(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_published(self, request).await
    }

    // 当前用户的作文
    pub async fn list_mine(
        &self,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_mine(self, session, request).await
    }

    // 申诉队列
    pub async fn list_appeals(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_appeals(self, request).await
    }

    // 作文详情
    pub async fn get_essay(
        &self,
        essay_id: i64,
        session: Option<SessionContext>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_essay(self, essay_id, session, request).await
    }

    // 当前用户的作文详情
    pub async fn get_my_essay(
        &self,
        essay_id: i64,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_my_essay(self, essay_id, session, request).await
    }

    // 修改草稿
    pub async fn update_essay(
        &self,
        essay_id: i64,
        session: SessionContext,
        update: UpdateEssayRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_essay(self, essay_id, session, update, request).await
    }

    // 提交评分
    pub async fn save_essay(
        &self,
        essay_id: i64,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        save::save_essay(self, essay_id, session, request).await
    }

    // 申诉
    pub async fn appeal_essay(
        &self,
        essay_id: i64,
        session: SessionContext,
        appeal: AppealRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        appeal::appeal_essay(self, essay_id, session, appeal, request).await
    }

    // 发布/取消发布
    pub async fn set_published(
        &self,
        essay_id: i64,
        session: SessionContext,
        publish: bool,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        publish::set_published(self, essay_id, session, publish, request).await
    }
}

/// 读取作文，不存在时返回 NotFound
pub(crate) async fn find_essay(
    storage: &Arc<dyn Storage>,
    essay_id: i64,
) -> crate::errors::Result<crate::models::essays::entities::Essay> {
    storage.get_essay_by_id(essay_id).await?.ok_or_else(|| {
        crate::errors::EssayError::not_found(format!("Essay {essay_id} not found"))
    })
}
