use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub enum AuditAction {
    PromoteStudents,
    SpecialPromotion,
    GraduateStudents,
    RecordScores,
    UpdatePromotionCriteria,
    UpdateGradingScheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditLogEntry {
    pub id: String,
    pub actor: String,
    pub action: AuditAction,
    pub details: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AuditLogEntry {
    pub fn new(actor: impl Into<String>, action: AuditAction, details: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            actor: actor.into(),
            action,
            details: details.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct AuditLogQuery {
    pub limit: Option<usize>,
    pub action: Option<AuditAction>,
}
