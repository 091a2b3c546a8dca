//! 路径参数安全提取器
//!
//! 在进入业务逻辑之前校验路径中的标识符，格式不合法时直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use super::validate::validate_identifier;
use crate::models::{ApiResponse, ErrorCode};

fn extract_identifier(req: &HttpRequest, name: &str) -> Result<String, actix_web::Error> {
    let value = req.match_info().get(name).unwrap_or_default();
    match validate_identifier(value) {
        Ok(()) => Ok(value.to_string()),
        Err(msg) => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': {msg}"),
            ));
            Err(InternalError::from_response(msg, response).into())
        }
    }
}

macro_rules! define_safe_path_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(extract_identifier(req, $param).map($name))
            }
        }
    };
}

define_safe_path_extractor!(SafeClassId, "class_id");
define_safe_path_extractor!(SafeStudentNo, "student_no");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_student_no() {
        let req = TestRequest::default()
            .param("student_no", "S001")
            .to_http_request();
        let extracted = SafeStudentNo::extract(&req).await.unwrap();
        assert_eq!(extracted.0, "S001");
    }

    #[actix_web::test]
    async fn test_invalid_class_id() {
        let req = TestRequest::default()
            .param("class_id", "jhs 2;drop")
            .to_http_request();
        assert!(SafeClassId::extract(&req).await.is_err());
    }
}
