use crate::components::icons::{Bug, LayoutDashboard, Lightbulb, LogOut};
use crate::store::auth::{logout, use_auth};
use crate::store::notify::use_notifier;
use crate::store::roadmap::{self, use_roadmaps};
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

/// 受保护页面共用的顶栏：导航链接、当前用户、注销
#[component]
pub fn AppNavbar() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let roadmap_ctx = use_roadmaps();

    let current = router.current_route();
    let display_name = move || {
        let identity = auth_ctx.state.get().identity;
        if identity.name.is_empty() {
            identity.email
        } else {
            identity.name
        }
    };

    let link_class = move |route: AppRoute| {
        if current.get() == route {
            "btn btn-ghost btn-sm gap-2 btn-active"
        } else {
            "btn btn-ghost btn-sm gap-2"
        }
    };

    // 注销清掉会话和本机的 roadmap 缓存，跳转交给路由的
    // 认证状态监听。
    let on_logout = move |_| {
        logout(&auth_ctx);
        roadmap::clear(&roadmap_ctx);
        notifier.success("Signed out. See you soon!");
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Lightbulb attr:class="text-primary h-6 w-6" />
                <button class="btn btn-ghost text-xl" on:click=move |_| router.navigate("/dashboard")>
                    "IdeaHub"
                </button>
                <div class="hidden md:flex gap-1">
                    <button
                        class=move || link_class(AppRoute::Dashboard)
                        on:click=move |_| router.navigate("/dashboard")
                    >
                        <LayoutDashboard attr:class="h-4 w-4" /> "Dashboard"
                    </button>
                    <button
                        class=move || link_class(AppRoute::Ideas)
                        on:click=move |_| router.navigate("/ideas")
                    >
                        <Lightbulb attr:class="h-4 w-4" /> "Ideas"
                    </button>
                    <button
                        class=move || link_class(AppRoute::Feedback)
                        on:click=move |_| router.navigate("/feedback")
                    >
                        <Bug attr:class="h-4 w-4" /> "Feedback"
                    </button>
                </div>
            </div>
            <div class="flex-none gap-2">
                <span class="badge badge-neutral hidden md:inline-flex">{display_name}</span>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                    <LogOut attr:class="h-4 w-4" /> "Sign out"
                </button>
            </div>
        </div>
    }
}
