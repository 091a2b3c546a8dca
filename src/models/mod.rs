pub mod audit;
pub mod classes;
pub mod common;
pub mod grading;
pub mod promotions;
pub mod reports;
pub mod students;
pub mod subjects;
pub mod terms;

pub use common::response::{ApiResponse, ResponseMessage};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1002,
    InternalServerError = 1005,

    ClassNotFound = 2000,
    StudentNotFound = 2001,
    StudentNotAssigned = 2002,

    ScoreInvalid = 3000,
    GradingSchemeInvalid = 3001,

    PromotionRejected = 4000,
    PromotionItemsFailed = 4001,
    CriteriaInvalid = 4002,
}
