pub mod create;
pub mod get;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::variants::requests::CreateVariantRequest;
use crate::storage::Storage;

pub struct VariantService {
    storage: Option<Arc<dyn Storage>>,
}

impl VariantService {
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

    // 题目列表
    pub async fn list_variants(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_variants(self, request).await
    }

    // 题目详情
    pub async fn get_variant(
        &self,
        variant_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_variant(self, variant_id, request).await
    }

    // 创建题目（版主）
    pub async fn create_variant(
        &self,
        variant: CreateVariantRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_variant(self, variant, request).await
    }
}
