pub mod criteria;
pub mod grading;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grading::requests::{UpdateGradingSchemeRequest, UpdatePromotionCriteriaRequest};
use crate::storage::Storage;

pub struct SettingsService {
    storage: Option<Arc<dyn Storage>>,
}

impl SettingsService {
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

    pub async fn get_promotion_criteria(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        criteria::get_promotion_criteria(self, request).await
    }

    pub async fn update_promotion_criteria(
        &self,
        request: &HttpRequest,
        update: UpdatePromotionCriteriaRequest,
    ) -> ActixResult<HttpResponse> {
        criteria::update_promotion_criteria(self, request, update).await
    }

    pub async fn get_grading_scheme(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        grading::get_grading_scheme(self, request).await
    }

    pub async fn update_grading_scheme(
        &self,
        request: &HttpRequest,
        update: UpdateGradingSchemeRequest,
    ) -> ActixResult<HttpResponse> {
        grading::update_grading_scheme(self, request, update).await
    }
}
