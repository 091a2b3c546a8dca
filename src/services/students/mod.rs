pub mod get;
pub mod scores;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::RecordScoresRequest;
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_no: String,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_no).await
    }

    // 录入或覆盖成绩
    pub async fn record_scores(
        &self,
        request: &HttpRequest,
        student_no: String,
        scores: RecordScoresRequest,
    ) -> ActixResult<HttpResponse> {
        scores::record_scores(self, request, student_no, scores).await
    }
}
