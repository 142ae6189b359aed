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
macro_rules! define_assignhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AssignHubError {
            $($variant(String),)*
        }

        impl AssignHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AssignHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AssignHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AssignHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AssignHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AssignHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_assignhub_errors! {
    StorageInit("E001", "Storage Initialization Error"),
    FileOperation("E002", "File Operation Error"),
    Serialization("E003", "Serialization Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Authorization("E006", "Authorization Error"),
    IdCollision("E007", "Identifier Collision Error"),
}

impl AssignHubError {
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

impl fmt::Display for AssignHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AssignHubError {}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for AssignHubError {
    fn from(err: std::io::Error) -> Self {
        AssignHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AssignHubError {
    fn from(err: serde_json::Error) -> Self {
        AssignHubError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AssignHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AssignHubError::storage_init("test").code(), "E001");
        assert_eq!(AssignHubError::validation("test").code(), "E004");
        assert_eq!(AssignHubError::not_found("test").code(), "E005");
        assert_eq!(AssignHubError::authorization("test").code(), "E006");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AssignHubError::authorization("test").error_type(),
            "Authorization Error"
        );
        assert_eq!(
            AssignHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AssignHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = AssignHubError::not_found("group not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("group not found"));
    }
}
