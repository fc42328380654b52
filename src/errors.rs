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
macro_rules! define_essay_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EssayError {
            $($variant(String),)*
        }

        impl EssayError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EssayError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EssayError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EssayError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EssayError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EssayError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_essay_errors! {
    // 业务错误
    NotFound("E001", "Resource Not Found"),
    Forbidden("E002", "Forbidden"),
    WrongOwner("E003", "Wrong Owner"),
    InvalidState("E004", "Invalid State"),
    NoChecksLeft("E005", "No Checks Left"),
    DuplicateEmail("E006", "Duplicate Email"),
    AlreadyLiked("E007", "Already Liked"),
    InvalidInput("E008", "Invalid Input"),
    UpstreamFailure("E009", "Upstream Failure"),
    StorageFailure("E010", "Storage Failure"),
    // 基础设施错误
    DatabaseConfig("E101", "Database Configuration Error"),
    DatabaseConnection("E102", "Database Connection Error"),
    Serialization("E103", "Serialization Error"),
    Authentication("E104", "Authentication Error"),
}

impl EssayError {
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

    /// 是否属于服务端内部错误（需要记录 error 日志）
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EssayError::StorageFailure(_)
                | EssayError::DatabaseConfig(_)
                | EssayError::DatabaseConnection(_)
                | EssayError::Serialization(_)
        )
    }
}

impl fmt::Display for EssayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EssayError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EssayError {
    fn from(err: sea_orm::DbErr) -> Self {
        EssayError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for EssayError {
    fn from(err: serde_json::Error) -> Self {
        EssayError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for EssayError {
    fn from(err: reqwest::Error) -> Self {
        EssayError::UpstreamFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EssayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EssayError::not_found("test").code(), "E001");
        assert_eq!(EssayError::no_checks_left("test").code(), "E005");
        assert_eq!(EssayError::already_liked("test").code(), "E007");
        assert_eq!(EssayError::database_config("test").code(), "E101");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EssayError::invalid_state("test").error_type(),
            "Invalid State"
        );
        assert_eq!(
            EssayError::wrong_owner("test").error_type(),
            "Wrong Owner"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EssayError::invalid_input("essay text is empty");
        assert_eq!(err.message(), "essay text is empty");
    }

    #[test]
    fn test_format_simple() {
        let err = EssayError::upstream_failure("grader returned 503");
        let formatted = err.format_simple();
        assert!(formatted.contains("Upstream Failure"));
        assert!(formatted.contains("grader returned 503"));
    }

    #[test]
    fn test_internal_classification() {
        assert!(EssayError::storage_failure("boom").is_internal());
        assert!(!EssayError::no_checks_left("none").is_internal());
        assert!(!EssayError::upstream_failure("timeout").is_internal());
    }

    #[test]
    fn test_db_err_maps_to_storage_failure() {
        let err: EssayError = sea_orm::DbErr::Custom("disk full".into()).into();
        assert_eq!(err.code(), "E010");
    }
}
