//! 会话门控 - 导航边界的唯一裁决点
//!
//! 纯函数层，不依赖 DOM。路由服务在首次加载、编程式导航和
//! popstate 时都调用 [`decide`]，据此放行或重定向到登录页。
//!
//! 裁决只看 token 是否存在。token 是否仍然有效由受保护页面
//! 挂载后异步校验（见 `store::auth`），校验失败走
//! `reason=token_expired` 重定向，与这里的裁决互不阻塞。

/// 门控完全放行的路径前缀（静态资源、后端直通）
pub const EXEMPT_PREFIXES: [&str; 8] = [
    "/_app",
    "/static",
    "/assets",
    "/public",
    "/api",
    "/favicon.ico",
    "/robots.txt",
    "/manifest.json",
];

/// 登录页携带的重定向原因
pub const REASON_AUTH_REQUIRED: &str = "auth_required";
pub const REASON_TOKEN_EXPIRED: &str = "token_expired";

/// 路径分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// 豁免：无条件放行
    Exempt,
    /// 认证页（/auth/*）：无条件放行
    AuthPage,
    /// 其余页面：需要会话
    Protected,
}

pub fn classify(path: &str) -> PathClass {
    if EXEMPT_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
    {
        return PathClass::Exempt;
    }
    if path.starts_with("/auth") {
        return PathClass::AuthPage;
    }
    PathClass::Protected
}

/// 一次导航请求的特征
#[derive(Debug, Clone, Copy)]
pub struct NavRequest<'a> {
    pub path: &'a str,
    pub method: &'a str,
    /// 是否为 HTML 导航（GET + Accept: text/html）
    pub accepts_html: bool,
}

impl<'a> NavRequest<'a> {
    /// SPA 内部导航：总是 GET + HTML
    pub fn navigation(path: &'a str) -> Self {
        Self {
            path,
            method: "GET",
            accepts_html: true,
        }
    }

    fn is_html_navigation(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET") && self.accepts_html
    }
}

/// 门控裁决
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    RedirectToLogin { reason: &'static str },
}

/// 核心裁决函数
///
/// 非 HTML 导航（数据请求、静态抓取）一律放行；
/// 受保护路径在无 token 时重定向，原因固定为 `auth_required`。
pub fn decide(req: &NavRequest<'_>, has_token: bool) -> GateDecision {
    if !req.is_html_navigation() {
        return GateDecision::Proceed;
    }
    match classify(req.path) {
        PathClass::Exempt | PathClass::AuthPage => GateDecision::Proceed,
        PathClass::Protected => {
            if has_token {
                GateDecision::Proceed
            } else {
                GateDecision::RedirectToLogin {
                    reason: REASON_AUTH_REQUIRED,
                }
            }
        }
    }
}

/// 重定向目标路径
pub fn login_redirect_path(reason: &str) -> String {
    format!("/auth/login?reason={}", reason)
}

// =========================================================
// 单元测试
// =========================================================
