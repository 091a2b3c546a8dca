use serde::Deserialize;
use ts_rs::TS;

use super::entities::{GradeSetting, PromotionCriteria};

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdateGradingSchemeRequest {
    pub grade_settings: Vec<GradeSetting>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct UpdatePromotionCriteriaRequest {
    #[serde(flatten)]
    #[ts(flatten)]
    pub criteria: PromotionCriteria,
}
