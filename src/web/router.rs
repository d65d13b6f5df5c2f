//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程是"请求 -> 闸门裁决 -> 处理 -> 加载"，裁决逻辑全部
//! 委托给 [`crate::session`]，首次加载、程序内导航和浏览器
//! 前进/后退走同一个闸门。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::query::split_query;
use super::route::AppRoute;
use crate::session::{decide, login_redirect_path, GateDecision, NavRequest};
use crate::web::log::log_info;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前 query（不含 `?`）
fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|s| s.trim_start_matches('?').to_string())
        .unwrap_or_default()
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 认证信号由外部注入，路由系统不直接认识认证模块。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 当前 query（不含 `?`），登录页从这里读重定向原因
    search: ReadSignal<String>,
    set_search: WriteSignal<String>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);
        let (search, set_search) = signal(current_search());

        Self {
            current_route,
            set_route,
            search,
            set_search,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    pub fn current_search(&self) -> ReadSignal<String> {
        self.search
    }

    /// 程序内导航（pushState）
    pub fn navigate(&self, path: &str) {
        self.navigate_to(path, true);
    }

    /// 重定向式导航（replaceState），不留历史记录
    pub fn replace(&self, path: &str) {
        self.navigate_to(path, false);
    }

    /// **核心方法：导航与闸门**
    ///
    /// `path` 可以带 query（如 `/auth/login?reason=auth_required`）。
    fn navigate_to(&self, path: &str, use_push: bool) {
        let (pure_path, _) = split_query(path);
        let is_auth = self.is_authenticated.get_untracked();

        // --- Step 1: 闸门裁决 ---
        match decide(&NavRequest::navigation(pure_path), is_auth) {
            GateDecision::RedirectToLogin { reason } => {
                log_info!("[Router] access denied, redirecting to login");
                self.commit(&login_redirect_path(reason), AppRoute::auth_failure_redirect(), use_push);
                return;
            }
            GateDecision::Proceed => {}
        }

        // 已认证用户访问登录/注册页时弹回仪表盘
        let target_route = AppRoute::from_path(pure_path);
        if target_route.should_redirect_when_authenticated() && is_auth {
            log_info!("[Router] already authenticated, redirecting to dashboard");
            let redirect = AppRoute::auth_success_redirect();
            self.commit(&redirect.to_path(), redirect, use_push);
            return;
        }

        // --- Step 2: 加载页面 (更新状态) ---
        self.commit(path, target_route, use_push);
    }

    /// 写 History 并同步信号
    fn commit(&self, full_path: &str, route: AppRoute, use_push: bool) {
        if use_push {
            push_history_state(full_path);
        } else {
            replace_history_state(full_path);
        }
        let (_, query) = split_query(full_path);
        self.set_search.set(query.to_string());
        self.set_route.set(route);
    }

    /// 首次加载时的闸门。重定向用 replace，不往历史里塞一条
    /// 用户从未见过的地址。
    fn gate_initial(&self) {
        let path = current_path();
        let is_auth = self.is_authenticated.get_untracked();

        match decide(&NavRequest::navigation(&path), is_auth) {
            GateDecision::RedirectToLogin { reason } => {
                log_info!("[Router] initial load denied, redirecting to login");
                self.commit(&login_redirect_path(reason), AppRoute::auth_failure_redirect(), false);
            }
            GateDecision::Proceed => {
                let route = AppRoute::from_path(&path);
                if route.should_redirect_when_authenticated() && is_auth {
                    let redirect = AppRoute::auth_success_redirect();
                    self.commit(&redirect.to_path(), redirect, false);
                }
            }
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let set_search = self.set_search;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let path = current_path();
            let is_auth = is_authenticated.get_untracked();

            // popstate 也过闸门
            match decide(&NavRequest::navigation(&path), is_auth) {
                GateDecision::RedirectToLogin { reason } => {
                    let redirect = login_redirect_path(reason);
                    replace_history_state(&redirect);
                    let (_, query) = split_query(&redirect);
                    set_search.set(query.to_string());
                    set_route.set(AppRoute::auth_failure_redirect());
                }
                GateDecision::Proceed => {
                    let route = AppRoute::from_path(&path);
                    if route.should_redirect_when_authenticated() && is_auth {
                        let redirect = AppRoute::auth_success_redirect();
                        replace_history_state(&redirect.to_path());
                        set_search.set(String::new());
                        set_route.set(redirect);
                    } else {
                        set_search.set(current_search());
                        set_route.set(route);
                    }
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向（登出方向）
    ///
    /// 登录方向不在这里处理：登录页成功后先展示提示、延时再跳转，
    /// 由登录页自己导航。已认证用户直接输入登录页地址的弹回在
    /// 导航闸门和 popstate 监听里。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let set_search = self.set_search;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            // 用户登出，如果在受保护页面则回登录页。
            // 主动登出不带 reason，闸门裁决的重定向才带。
            if !is_auth && route.requires_auth() {
                let redirect = AppRoute::auth_failure_redirect();
                push_history_state(&redirect.to_path());
                set_search.set(String::new());
                set_route.set(redirect);
                log_info!("[Router] auth state changed: logged out, going to login");
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.gate_initial();
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
