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
macro_rules! define_staar_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum StaarError {
            $($variant(String),)*
        }

        impl StaarError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(StaarError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(StaarError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(StaarError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl StaarError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        StaarError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_staar_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Configuration("E010", "Configuration Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    LlmRequest("E014", "LLM Request Error"),
    LlmResponse("E015", "LLM Response Error"),
    QuestionValidation("E016", "Question Validation Error"),
}

/// 可重试的 HTTP 状态码前缀（写在 LlmRequest 消息开头）
const TRANSIENT_STATUS_PREFIXES: &[&str] = &["HTTP 408", "HTTP 429", "HTTP 5"];

impl StaarError {
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

    /// 根据 HTTP 状态构造 LLM 请求错误
    pub fn llm_status(status: u16, body: &str) -> Self {
        StaarError::LlmRequest(format!("HTTP {status}: {body}"))
    }

    /// 是否为可重试的 LLM 请求错误（网络、超时、429、5xx）
    pub fn is_transient_llm(&self) -> bool {
        match self {
            StaarError::LlmRequest(msg) => {
                !msg.starts_with("HTTP ")
                    || TRANSIENT_STATUS_PREFIXES
                        .iter()
                        .any(|prefix| msg.starts_with(prefix))
            }
            _ => false,
        }
    }
}

impl fmt::Display for StaarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for StaarError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for StaarError {
    fn from(err: sea_orm::DbErr) -> Self {
        StaarError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for StaarError {
    fn from(err: std::io::Error) -> Self {
        StaarError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for StaarError {
    fn from(err: serde_json::Error) -> Self {
        StaarError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for StaarError {
    fn from(err: chrono::ParseError) -> Self {
        StaarError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for StaarError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            StaarError::llm_status(status.as_u16(), &err.to_string())
        } else if err.is_decode() {
            StaarError::LlmResponse(err.to_string())
        } else {
            StaarError::LlmRequest(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, StaarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StaarError::cache_connection("test").code(), "E001");
        assert_eq!(StaarError::database_config("test").code(), "E003");
        assert_eq!(StaarError::validation("test").code(), "E007");
        assert_eq!(StaarError::authentication("test").code(), "E012");
        assert_eq!(StaarError::llm_request("test").code(), "E014");
        assert_eq!(StaarError::question_validation("test").code(), "E016");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            StaarError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            StaarError::llm_response("test").error_type(),
            "LLM Response Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = StaarError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = StaarError::validation("Invalid grade");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid grade"));
    }

    #[test]
    fn test_transient_llm_errors() {
        assert!(StaarError::llm_status(429, "slow down").is_transient_llm());
        assert!(StaarError::llm_status(503, "unavailable").is_transient_llm());
        assert!(StaarError::llm_status(408, "timeout").is_transient_llm());
        assert!(StaarError::llm_request("connection reset").is_transient_llm());

        assert!(!StaarError::llm_status(401, "bad key").is_transient_llm());
        assert!(!StaarError::llm_status(400, "bad body").is_transient_llm());
        assert!(!StaarError::llm_response("not json").is_transient_llm());
        assert!(!StaarError::validation("x").is_transient_llm());
    }
}
