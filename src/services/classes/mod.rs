pub mod list;
pub mod roster;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
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

    // 获取班级列表（按升级顺序）
    pub async fn list_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_classes(self, request).await
    }

    // 获取班级学生名单
    pub async fn get_class_roster(
        &self,
        request: &HttpRequest,
        class_id: String,
    ) -> ActixResult<HttpResponse> {
        roster::get_class_roster(self, request, class_id).await
    }
}
