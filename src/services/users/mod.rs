pub mod get;
pub mod nickname;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::middlewares::SessionContext;
use crate::models::users::requests::UpdateUserRequest;
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
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

    // 当前用户信息
    pub async fn get_me(
        &self,
        session: SessionContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_me(self, session, request).await
    }

    // 更新当前用户信息
    pub async fn update_me(
        &self,
        session: SessionContext,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_me(self, session, update_data, request).await
    }

    // 按邮箱查询昵称
    pub async fn get_nickname(
        &self,
        mail: String,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        nickname::get_nickname(self, mail, request).await
    }
}
