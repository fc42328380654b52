pub mod counts;
pub mod criteria;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
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

    // 站点统计
    pub async fn get_counts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        counts::get_counts(self, request).await
    }

    // 评分标准
    pub async fn list_criteria(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        criteria::list_criteria(self, request).await
    }
}
