use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 班级
///
/// 班级列表中的位置决定“下一个班级”，列表顺序即升级顺序。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID，如 "jhs2"
    pub id: String,
    // 班级名称
    pub name: String,
}
