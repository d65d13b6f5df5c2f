//! 认证状态与会话生命周期
//!
//! 管理用户身份信号，与路由系统解耦：路由服务通过注入的认证信号
//! 判断有没有会话，本模块负责 token cookie 和持久化身份的读写。
//!
//! token 的有效性校验放在受保护页面挂载之后异步进行，网络不通
//! 不会把用户登出（fail open），只有服务端明确拒绝才算失效。

use crate::api::auth::{AuthApi, LoginPayload};
use crate::api::http::{FetchClient, HttpClient};
use crate::config::backend_url;
use crate::error::ApiError;
use crate::session::{login_redirect_path, REASON_AUTH_REQUIRED, REASON_TOKEN_EXPIRED};
use crate::web::cookie::CookieJar;
use crate::web::log::{log_error, log_info};
use crate::web::router::RouterService;
use crate::web::storage::LocalStorage;
use ideahub_shared::{UserIdentity, COOKIE_MAX_AGE_SECS, COOKIE_TOKEN, STORAGE_AUTH};
use leptos::prelude::*;

// =========================================================
// 会话存储
// =========================================================

/// token 与身份的持久层。生产实现落在 cookie + LocalStorage，
/// 测试替换为内存版。
pub trait SessionStore {
    fn token(&self) -> Option<String>;
    fn remember(&self, token: &str, identity: &UserIdentity);
    fn forget(&self);
    fn identity(&self) -> Option<UserIdentity>;
}

/// 生产实现：token 放 cookie（到期自动失效），身份放 LocalStorage
/// （刷新后免请求恢复显示名）。
#[derive(Clone, Copy, Default)]
pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn token(&self) -> Option<String> {
        CookieJar::get(COOKIE_TOKEN)
    }

    fn remember(&self, token: &str, identity: &UserIdentity) {
        CookieJar::set(COOKIE_TOKEN, token, COOKIE_MAX_AGE_SECS);
        match serde_json::to_string(identity) {
            Ok(json) => {
                LocalStorage::set(STORAGE_AUTH, &json);
            }
            Err(e) => log_error!("identity not persisted: {}", e),
        }
    }

    fn forget(&self) {
        CookieJar::clear(COOKIE_TOKEN);
        LocalStorage::delete(STORAGE_AUTH);
    }

    fn identity(&self) -> Option<UserIdentity> {
        let json = LocalStorage::get(STORAGE_AUTH)?;
        serde_json::from_str(&json).ok()
    }
}

// =========================================================
// 信号层
// =========================================================

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前用户身份（未登录时各字段为空）
    pub identity: UserIdentity,
    /// 是否已认证
    pub is_authenticated: bool,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 认证信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// cookie 里有 token 即视为有会话（有效性之后异步校验），
/// 身份从 LocalStorage 恢复。
pub fn init_auth(ctx: &AuthContext) {
    let session = BrowserSession;
    let has_token = session.token().is_some();
    let identity = session.identity().unwrap_or_default();
    ctx.set_state.update(|state| {
        state.is_authenticated = has_token;
        state.identity = identity;
    });
}

// =========================================================
// 业务层
// =========================================================

/// token 校验结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCheck {
    Valid,
    /// 服务端明确拒绝
    Invalid,
    /// 本地没有 token
    Missing,
    /// 联系不上服务端，不能下结论
    Unreachable,
}

pub struct AuthService<C: HttpClient, S: SessionStore> {
    api: AuthApi<C>,
    session: S,
}

impl<C: HttpClient, S: SessionStore> AuthService<C, S> {
    pub fn new(client: C, session: S, base_url: &str) -> Self {
        Self {
            api: AuthApi::new(client, base_url),
            session,
        }
    }

    /// 登录成功即落会话：cookie 里写 token，LocalStorage 里写身份。
    /// 失败时会话保持原样。
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginPayload, ApiError> {
        let payload = self.api.login(email, password).await?;
        let identity = UserIdentity {
            name: payload.name.clone(),
            email: payload.email.clone(),
        };
        self.session.remember(&payload.access_token, &identity);
        Ok(payload)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.api.register(name, email, password).await
    }

    pub async fn check_token(&self) -> TokenCheck {
        let Some(token) = self.session.token() else {
            return TokenCheck::Missing;
        };
        match self.api.validate(&token).await {
            Ok(true) => TokenCheck::Valid,
            Ok(false) => TokenCheck::Invalid,
            Err(e) => {
                log_info!("token check inconclusive: {}", e);
                TokenCheck::Unreachable
            }
        }
    }

    pub fn sign_out(&self) {
        self.session.forget();
    }
}

/// 表单校验失败或请求失败时展示给用户的文案。
/// 认证接口的 Validation/Auth 错误本身就是面向用户的。
pub fn failure_text(err: &ApiError) -> String {
    match err {
        ApiError::Validation(msg) | ApiError::Auth(msg) => msg.clone(),
        other => other.user_message().to_string(),
    }
}

// =========================================================
// 表单校验（不过网络）
// =========================================================

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !email.contains('@') || email.chars().count() < 12 {
        return Err("Please enter a valid email address (at least 12 characters).");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let long_enough = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());
    if long_enough && has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err("Password must be at least 8 characters and include uppercase, lowercase, a digit and a special character.")
    }
}

// =========================================================
// 组件胶水
// =========================================================

fn browser_service() -> AuthService<FetchClient, BrowserSession> {
    AuthService::new(FetchClient, BrowserSession, backend_url())
}

/// 登录并更新信号。返回 `first_login`，失败返回用户可见文案。
pub async fn login(ctx: &AuthContext, email: String, password: String) -> Result<bool, String> {
    let payload = browser_service()
        .login(&email, &password)
        .await
        .map_err(|e| failure_text(&e))?;
    ctx.set_state.update(|state| {
        state.identity = UserIdentity {
            name: payload.name.clone(),
            email: payload.email.clone(),
        };
        state.is_authenticated = true;
    });
    Ok(payload.first_login)
}

pub async fn register(name: String, email: String, password: String) -> Result<(), String> {
    browser_service()
        .register(&name, &email, &password)
        .await
        .map_err(|e| failure_text(&e))
}

/// 注销并清除状态
///
/// 导航由路由服务的认证状态监听自动处理。
pub fn logout(ctx: &AuthContext) {
    browser_service().sign_out();
    ctx.set_state.update(|state| {
        state.identity = UserIdentity::default();
        state.is_authenticated = false;
    });
}

/// 受保护页面挂载后的 token 复核。
///
/// 失效时先带原因跳登录页、再翻认证信号，避免路由监听抢先
/// 发起一次不带原因的跳转。
pub fn enforce_session(ctx: &AuthContext, router: RouterService) {
    let ctx = *ctx;
    leptos::task::spawn_local(async move {
        let service = browser_service();
        let reason = match service.check_token().await {
            TokenCheck::Valid | TokenCheck::Unreachable => return,
            TokenCheck::Invalid => REASON_TOKEN_EXPIRED,
            TokenCheck::Missing => REASON_AUTH_REQUIRED,
        };
        service.sign_out();
        router.replace(&login_redirect_path(reason));
        ctx.set_state.update(|state| {
            state.identity = UserIdentity::default();
            state.is_authenticated = false;
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::MockHttpClient;
    use serde_json::json;
    use std::cell::RefCell;

    const BASE: &str = "http://localhost:8000";

    #[derive(Default)]
    struct MockSession {
        token: RefCell<Option<String>>,
        identity: RefCell<Option<UserIdentity>>,
    }

    impl MockSession {
        fn with_token(self, token: &str) -> Self {
            *self.token.borrow_mut() = Some(token.to_string());
            self
        }
    }

    impl SessionStore for MockSession {
        fn token(&self) -> Option<String> {
            self.token.borrow().clone()
        }

        fn remember(&self, token: &str, identity: &UserIdentity) {
            *self.token.borrow_mut() = Some(token.to_string());
            *self.identity.borrow_mut() = Some(identity.clone());
        }

        fn forget(&self) {
            *self.token.borrow_mut() = None;
            *self.identity.borrow_mut() = None;
        }

        fn identity(&self) -> Option<UserIdentity> {
            self.identity.borrow().clone()
        }
    }

    #[tokio::test]
    async fn test_login_persists_token_and_identity() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/auth/login", BASE),
            200,
            json!({
                "access_token": "tok123",
                "name": "Ana Silva",
                "email": "a@example.com"
            }),
        );
        let service = AuthService::new(client, MockSession::default(), BASE);

        let payload = service.login("a@example.com", "Secret1!").await.unwrap();
        assert_eq!(payload.access_token, "tok123");
        assert_eq!(service.session.token().as_deref(), Some("tok123"));
        let identity = service.session.identity().unwrap();
        assert_eq!(identity.name, "Ana Silva");
        assert_eq!(identity.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_untouched() {
        let client = MockHttpClient::new();
        client.mock_response(&format!("{}/auth/login", BASE), 401, json!({}));
        let service = AuthService::new(client, MockSession::default(), BASE);

        assert!(service.login("a@example.com", "bad").await.is_err());
        assert_eq!(service.session.token(), None);
        assert_eq!(service.session.identity(), None);
    }

    #[tokio::test]
    async fn test_check_token_outcomes() {
        // 没有 token
        let service = AuthService::new(MockHttpClient::new(), MockSession::default(), BASE);
        assert_eq!(service.check_token().await, TokenCheck::Missing);

        // 有效
        let client = MockHttpClient::new();
        client.mock_response(&format!("{}/auth/validate", BASE), 200, json!({"valid": true}));
        let service = AuthService::new(client, MockSession::default().with_token("t"), BASE);
        assert_eq!(service.check_token().await, TokenCheck::Valid);

        // 明确拒绝
        let client = MockHttpClient::new();
        client.mock_response(&format!("{}/auth/validate", BASE), 401, json!({}));
        let service = AuthService::new(client, MockSession::default().with_token("t"), BASE);
        assert_eq!(service.check_token().await, TokenCheck::Invalid);

        // 网络失败不下结论
        let client = MockHttpClient::new();
        client.mock_network_failure(&format!("{}/auth/validate", BASE));
        let service = AuthService::new(client, MockSession::default().with_token("t"), BASE);
        assert_eq!(service.check_token().await, TokenCheck::Unreachable);
    }

    #[test]
    fn test_failure_text_prefers_auth_messages() {
        assert_eq!(
            failure_text(&ApiError::Validation("User not found".into())),
            "User not found"
        );
        assert_eq!(
            failure_text(&ApiError::Auth("Invalid email or password".into())),
            "Invalid email or password"
        );
        assert_eq!(
            failure_text(&ApiError::Network("timeout".into())),
            "Unable to reach the server. Please try again later."
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("a@b.c").is_err()); // 太短
        assert!(validate_email("no-at-sign-here").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("Str0ng!pass").is_ok());
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial11").is_err());
    }
}
