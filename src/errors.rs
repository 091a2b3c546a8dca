//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_admin_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolAdminError {
            $($variant(String),)*
        }

        impl SchoolAdminError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolAdminError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolAdminError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolAdminError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolAdminError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolAdminError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_admin_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    StorageOperation("E003", "Storage Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    Serialization("E006", "Serialization Error"),
}

impl SchoolAdminError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolAdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolAdminError {}

impl From<std::io::Error> for SchoolAdminError {
    fn from(err: std::io::Error) -> Self {
        SchoolAdminError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolAdminError {
    fn from(err: serde_json::Error) -> Self {
        SchoolAdminError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolAdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolAdminError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolAdminError::storage_operation("test").code(), "E003");
        assert_eq!(SchoolAdminError::validation("test").code(), "E005");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolAdminError::cache_plugin_not_found("test").error_type(),
            "Cache Plugin Not Found"
        );
        assert_eq!(
            SchoolAdminError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_serde_error_conversion() {
        let err: SchoolAdminError = serde_json::from_str::<u32>("not a number")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolAdminError::storage_operation("Failed to write student S001");
        let formatted = err.format_simple();
        assert!(formatted.contains("Storage Operation Error"));
        assert!(formatted.contains("S001"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: SchoolAdminError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "seed.json").into();
        assert_eq!(err.code(), "E004");
    }
}
