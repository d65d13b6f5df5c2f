//! 错误类型
//!
//! 客户端边界策略：API 模块内部用 `ApiResult` 传递带分类的错误，
//! 资源客户端对 Store 只暴露哨兵值 (`Option` / `bool` / 空集合)，
//! 认证客户端例外：它的错误携带面向用户的文案，由登录/注册页展示。

use std::fmt;

/// HTTP / 规范化失败的分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 请求内容被后端拒绝 (400 / 422)
    Validation(String),
    /// 凭据无效或缺失 (401 / 403)
    Auth(String),
    /// 资源不存在 (404)
    NotFound(String),
    /// 后端错误 (5xx 及其他状态)
    Server(String),
    /// 请求未得到响应（断网、CORS、超时中止）
    Network(String),
    /// 响应有了，但形状无法识别
    Shape(String),
}

impl ApiError {
    /// 按 HTTP 状态码分类
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 | 422 => ApiError::Validation(detail),
            401 | 403 => ApiError::Auth(detail),
            404 => ApiError::NotFound(detail),
            _ => ApiError::Server(detail),
        }
    }

    /// 错误携带的原始文本
    pub fn detail(&self) -> &str {
        match self {
            ApiError::Validation(s)
            | ApiError::Auth(s)
            | ApiError::NotFound(s)
            | ApiError::Server(s)
            | ApiError::Network(s)
            | ApiError::Shape(s) => s,
        }
    }

    /// 通用的用户可见文案（Store 的兜底提示）
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Unable to reach the server. Please try again later.",
            ApiError::Shape(_) => "Unexpected response from the server.",
            _ => "Something went wrong. Please try again.",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "validation rejected: {}", msg),
            ApiError::Auth(msg) => write!(f, "unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Server(msg) => write!(f, "server error: {}", msg),
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Shape(msg) => write!(f, "unrecognized response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
