pub mod evaluate;
pub mod plan;
pub mod roster;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

pub use evaluate::{ClassLadder, PromotionRejection};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::promotions::requests::{
    PromotionForm, PromotionMode, PromotionRosterQuery, PromotionSubmission,
};
use crate::storage::Storage;

pub struct PromotionService {
    storage: Option<Arc<dyn Storage>>,
    // 未设置时读取 promotion.enforce_criteria
    enforce_criteria: Option<bool>,
}

impl PromotionService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            enforce_criteria: None,
        }
    }

    /// 覆盖配置中的升级标准开关
    pub fn with_criteria_enforcement(mut self, enforce: bool) -> Self {
        self.enforce_criteria = Some(enforce);
        self
    }

    pub(crate) fn enforces_criteria(&self) -> bool {
        self.enforce_criteria
            .unwrap_or_else(|| AppConfig::get().promotion.enforce_criteria)
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

    // 可升级名单及其升级标准评估
    pub async fn get_roster(
        &self,
        request: &HttpRequest,
        query: PromotionRosterQuery,
    ) -> ActixResult<HttpResponse> {
        roster::get_roster(self, request, query).await
    }

    // 只做校验，返回提交计划
    pub async fn plan_promotion(
        &self,
        request: &HttpRequest,
        form: PromotionForm,
    ) -> ActixResult<HttpResponse> {
        plan::plan_promotion(self, request, form).await
    }

    // 执行升级或毕业
    pub async fn submit(
        &self,
        request: &HttpRequest,
        mode: PromotionMode,
        submission: PromotionSubmission,
    ) -> ActixResult<HttpResponse> {
        submit::submit_promotion(self, request, mode, submission).await
    }
}

pub(crate) async fn load_ladder(storage: &Arc<dyn Storage>) -> Result<ClassLadder> {
    let classes = storage.list_classes().await?;
    Ok(ClassLadder::new(
        classes,
        AppConfig::get().promotion.terminal_class_id.clone(),
    ))
}
