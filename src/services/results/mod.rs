pub mod get;
pub mod record;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::results::entities::ResultKind;
use crate::models::results::requests::ResultSubmission;
use crate::storage::Storage;

pub struct ResultService {
    storage: Option<Arc<dyn Storage>>,
}

impl ResultService {
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

    // 评分服务回调：写入结果
    pub async fn record_result(
        &self,
        essay_id: i64,
        submission: ResultSubmission,
        kind: ResultKind,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_result(self, essay_id, submission, kind, request).await
    }

    // 最新评分
    pub async fn get_latest(
        &self,
        essay_id: i64,
        session: Option<SessionContext>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_latest(self, essay_id, session, request).await
    }

    // 评分历史
    pub async fn get_history(
        &self,
        essay_id: i64,
        session: Option<SessionContext>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_history(self, essay_id, session, request).await
    }
}
