//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由及其属性。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Register,
    /// 仪表盘 (需要认证)
    Dashboard,
    /// Idea 列表 (需要认证)
    Ideas,
    /// 单个 idea 的编辑与讨论页 (需要认证)
    IdeaDetail(String),
    /// 反馈表单 (需要认证)
    Feedback,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举。query 部分由调用方先剥掉。
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" | "/dashboard" => Self::Dashboard,
            "/auth/login" => Self::Login,
            "/auth/register" => Self::Register,
            "/ideas" => Self::Ideas,
            "/feedback" => Self::Feedback,
            _ => match path.strip_prefix("/ideas/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::IdeaDetail(id.to_string())
                }
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/auth/login".to_string(),
            Self::Register => "/auth/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Ideas => "/ideas".to_string(),
            Self::IdeaDetail(id) => format!("/ideas/{}", id),
            Self::Feedback => "/feedback".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 定义已认证用户是否应该离开此路由（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 需要认证的路由。与会话闸门的 "非豁免且非 /auth*" 判定一致。
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
