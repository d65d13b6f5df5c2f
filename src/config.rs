//! 运行配置
//!
//! 后端地址在编译期通过 `IDEAHUB_API_URL` 注入，
//! 未设置时回退到本地开发后端。

const DEFAULT_API_URL: &str = "http://localhost:8000";

/// 后端 API 基地址（无末尾斜杠）
pub fn backend_url() -> &'static str {
    option_env!("IDEAHUB_API_URL").unwrap_or(DEFAULT_API_URL)
}
