use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::requests::{PromotionMode, PromotionPayload};
use crate::models::classes::entities::Class;
use crate::models::students::entities::StudentProfile;

/// 升级/毕业执行结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct PromotionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduated_count: Option<usize>,
}

impl PromotionResult {
    pub fn promoted(count: usize) -> Self {
        Self {
            promoted_count: Some(count),
            graduated_count: None,
        }
    }

    pub fn graduated(count: usize) -> Self {
        Self {
            promoted_count: None,
            graduated_count: Some(count),
        }
    }
}

/// 通过校验后的提交计划
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct PromotionPlan {
    pub mode: PromotionMode,
    pub endpoint: String,
    pub from_class: String,
    pub to_class: Option<String>,
    pub payload: PromotionPayload,
    pub remarks: Option<String>,
}

/// 按升级标准评估的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct Eligibility {
    pub eligible: bool,
    pub average_score: f64,
    pub core_passed: u32,
    pub core_required: u32,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct RosterCandidate {
    pub student: StudentProfile,
    pub eligibility: Eligibility,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct PromotionRosterResponse {
    pub from_class: Class,
    pub next_class: Option<Class>,
    // 毕业班只能走毕业流程
    pub graduation_only: bool,
    pub candidates: Vec<RosterCandidate>,
}
