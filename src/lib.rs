//! IdeaHub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 导航闸门（纯裁决逻辑）
//! - `web::route` / `web::router`: 路由定义与路由服务
//! - `api`: 后端 HTTP 客户端层（容错的响应解析）
//! - `store`: 资源状态管理（取数、投影、写穿缓存）
//! - `editor`: 自动保存控制器与文档守卫
//! - `components`: UI 组件层

mod api {
    pub mod auth;
    pub mod chat;
    pub mod feedback;
    pub mod http;
    pub mod idea;
    pub mod roadmap;
}
mod components {
    mod add_idea_dialog;
    mod chat_panel;
    pub mod dashboard;
    pub mod feedback;
    mod icons;
    pub mod idea_detail;
    pub mod ideas;
    pub mod login;
    mod navbar;
    pub mod register;
    mod roadmap_panel;
    pub mod toast;
}
mod config;
mod editor {
    pub mod autosave;
    pub mod document;
}
mod error;
mod session;
mod store {
    pub mod auth;
    pub mod chat;
    pub mod idea;
    pub mod notify;
    pub mod roadmap;
}

use crate::components::dashboard::DashboardPage;
use crate::components::feedback::FeedbackPage;
use crate::components::idea_detail::IdeaDetailPage;
use crate::components::ideas::IdeasPage;
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::toast::ToastHost;
use crate::store::auth::{AuthContext, init_auth};
use crate::store::chat::ChatContext;
use crate::store::idea::IdeaContext;
use crate::store::notify::provide_notifier;
use crate::store::roadmap::RoadmapContext;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 对浏览器原生能力（History、Storage、Cookie、console）的轻量封装，
// 让上层的路由与状态代码不直接散落 web_sys 调用。
pub(crate) mod web {
    pub mod cookie;
    pub mod log;
    pub mod query;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Ideas => view! { <IdeasPage /> }.into_any(),
        AppRoute::IdeaDetail(id) => view! { <IdeaDetailPage id=id /> }.into_any(),
        AppRoute::Feedback => view! { <FeedbackPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建并注入各状态上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    provide_context(IdeaContext::new());
    provide_context(ChatContext::new());
    provide_context(RoadmapContext::new());
    provide_notifier();

    // 2. 初始化认证状态（cookie 里的 token + 缓存的身份）
    init_auth(&auth_ctx);

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <ToastHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
