use serde::Serialize;
use ts_rs::TS;

use super::entities::Class;
use crate::models::students::entities::StudentProfile;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub items: Vec<Class>,
    pub terminal_class_id: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassRosterResponse {
    pub class: Class,
    pub students: Vec<StudentProfile>,
}
