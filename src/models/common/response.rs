use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 响应消息：单条文本或逐项错误列表
///
/// 失败响应可能携带逐项原因，调用方必须通过 `joined()` 统一格式化，
/// 不能假设一定是数组。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub enum ResponseMessage {
    Text(String),
    Items(Vec<String>),
}

impl ResponseMessage {
    /// 合并为一段可展示的文本
    pub fn joined(&self) -> String {
        match self {
            ResponseMessage::Text(text) => text.clone(),
            ResponseMessage::Items(items) => items.join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ResponseMessage::Text(text) => text.is_empty(),
            ResponseMessage::Items(items) => items.iter().all(|i| i.is_empty()),
        }
    }
}

impl From<String> for ResponseMessage {
    fn from(value: String) -> Self {
        ResponseMessage::Text(value)
    }
}

impl From<&str> for ResponseMessage {
    fn from(value: &str) -> Self {
        ResponseMessage::Text(value.to_string())
    }
}

impl From<Vec<String>> for ResponseMessage {
    fn from(value: Vec<String>) -> Self {
        ResponseMessage::Items(value)
    }
}

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub success: bool,
    pub code: i32,
    pub message: ResponseMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<ResponseMessage>) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<ResponseMessage>) -> Self {
        Self {
            success: false,
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<ResponseMessage>) -> Self {
        Self {
            success: true,
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<ResponseMessage>) -> Self {
        Self {
            success: false,
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_accepts_string_or_array() {
        let text: ResponseMessage = serde_json::from_str(r#""Promotion failed""#).unwrap();
        assert_eq!(text.joined(), "Promotion failed");

        let items: ResponseMessage =
            serde_json::from_str(r#"["S001 is not in jhs2", "S009 not found"]"#).unwrap();
        assert_eq!(items.joined(), "S001 is not in jhs2\nS009 not found");
    }

    #[test]
    fn test_error_envelope_shape() {
        let resp = ApiResponse::error_empty(
            ErrorCode::PromotionItemsFailed,
            vec!["S001 not found".to_string()],
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], 4001);
        assert_eq!(json["message"][0], "S001 not found");
        assert!(json.get("data").is_none());
    }
}
