use crate::components::icons::{CircleCheck, Clock, Lightbulb, Map, RefreshCw};
use crate::components::navbar::AppNavbar;
use crate::store::auth::{enforce_session, use_auth};
use crate::store::idea::{self, use_ideas};
use crate::store::roadmap::{self, use_roadmaps};
use crate::web::router::use_router;
use ideahub_shared::IdeaStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) fn status_badge_class(status: IdeaStatus) -> &'static str {
    match status {
        IdeaStatus::Draft => "badge badge-ghost",
        IdeaStatus::Active => "badge badge-info",
        IdeaStatus::Finished => "badge badge-success",
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let idea_ctx = use_ideas();
    let roadmap_ctx = use_roadmaps();

    // 受保护页面挂载后复核一次 token
    enforce_session(&auth_ctx, router);

    // 先摆缓存，再后台重取
    idea::hydrate(&idea_ctx);
    roadmap::hydrate(&roadmap_ctx);
    spawn_local(async move {
        idea::load_ideas(&idea_ctx).await;
        roadmap::load_roadmaps(&roadmap_ctx).await;
    });

    let reload = move |_| {
        spawn_local(async move {
            idea::load_ideas(&idea_ctx).await;
            roadmap::load_roadmaps(&roadmap_ctx).await;
        });
    };

    let stats = move || idea_ctx.state.get().stats;
    let roadmap_count = move || roadmap_ctx.state.get().created_roadmap;

    // 有 AI 分类结果的创意数，做卡片副标题
    let ideas_with_ai = move || {
        idea_ctx
            .state
            .with(|s| s.ideas.iter().filter(|i| !i.ai_classification.is_empty()).count())
    };

    let completion_rate = move || {
        let s = stats();
        let total = s.idea_created + s.idea_progress + s.idea_finished;
        if total == 0 {
            0
        } else {
            s.idea_finished * 100 / total
        }
    };

    let monthly_bars = move || {
        let s = stats();
        let max = s.monthly.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        s.monthly
            .iter()
            .map(|bucket| {
                let pct = (bucket.count * 100 / max).max(4);
                view! {
                    <div class="flex flex-col items-center justify-end gap-1 flex-1 h-full">
                        <span class="text-xs font-bold">{bucket.count}</span>
                        <div class="bg-primary rounded-t w-full" style:height=format!("{}%", pct)></div>
                        <span class="text-xs text-base-content/60">{bucket.label.clone()}</span>
                    </div>
                }
            })
            .collect_view()
    };

    let recent_rows = move || {
        let recent = idea_ctx.state.with(|s| s.stats.recent.clone());
        recent
            .into_iter()
            .map(|idea| {
                let target = idea.id.clone().map(|id| format!("/ideas/{}", id));
                let date = idea
                    .created_at
                    .as_deref()
                    .map(|s| s.split('T').next().unwrap_or(s).to_string())
                    .unwrap_or_default();
                let status = idea.status;
                view! {
                    <li class="flex items-center justify-between py-2 border-b border-base-200 last:border-none">
                        <button
                            class="link link-hover font-medium text-left"
                            on:click=move |_| {
                                if let Some(path) = target.clone() {
                                    router.navigate(&path);
                                }
                            }
                        >
                            {idea.title.clone()}
                        </button>
                        <div class="flex items-center gap-2">
                            <span class=status_badge_class(status)>{status.label()}</span>
                            <span class="text-xs text-base-content/60">{date}</span>
                        </div>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <AppNavbar />

                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="text-2xl font-bold">"Dashboard"</h2>
                        <p class="text-base-content/70 text-sm">"How your ideas are doing."</p>
                    </div>
                    <button
                        on:click=reload
                        disabled=move || idea_ctx.is_loading.get()
                        class="btn btn-ghost btn-circle"
                    >
                        <RefreshCw attr:class=move || {
                            if idea_ctx.is_loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" }
                        } />
                    </button>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <div class="stat">
                        <div class="stat-figure text-primary">
                            <Lightbulb attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"Captured ideas"</div>
                        <div class="stat-value text-primary">{move || stats().idea_created}</div>
                        <div class="stat-desc">
                            {move || {
                                let n = stats().created_this_month;
                                if n > 0 { format!("+{} this month", n) } else { "None this month".to_string() }
                            }}
                        </div>
                    </div>

                    <div class="stat">
                        <div class="stat-figure text-info">
                            <Clock attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"In development"</div>
                        <div class="stat-value text-info">{move || stats().idea_progress}</div>
                        <div class="stat-desc">
                            {move || {
                                let n = ideas_with_ai();
                                if n > 0 { format!("{} with AI support", n) } else { "Start developing one".to_string() }
                            }}
                        </div>
                    </div>

                    <div class="stat">
                        <div class="stat-figure text-success">
                            <CircleCheck attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"Finished"</div>
                        <div class="stat-value text-success">{move || stats().idea_finished}</div>
                        <div class="stat-desc">{move || format!("{}% completion rate", completion_rate())}</div>
                    </div>

                    <div class="stat">
                        <div class="stat-figure text-secondary">
                            <Map attr:class="inline-block w-8 h-8" />
                        </div>
                        <div class="stat-title">"Roadmaps generated"</div>
                        <div class="stat-value text-secondary">{roadmap_count}</div>
                        <div class="stat-desc">
                            {move || {
                                if roadmap_count() > 0 { "Structured planning" } else { "Generate your first" }
                            }}
                        </div>
                    </div>
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-8">
                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">"Ideas per month"</h3>
                            <Show
                                when=move || !stats().monthly.is_empty()
                                fallback=|| view! {
                                    <p class="text-base-content/50 py-8 text-center">
                                        "No dated ideas yet. Capture one to see it here."
                                    </p>
                                }
                            >
                                <div class="flex items-end gap-3 h-40 pt-4">{monthly_bars}</div>
                            </Show>
                        </div>
                    </div>

                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <h3 class="card-title">"Recent ideas"</h3>
                            <Show
                                when=move || !stats().recent.is_empty()
                                fallback=|| view! {
                                    <p class="text-base-content/50 py-8 text-center">
                                        "Nothing here yet."
                                    </p>
                                }
                            >
                                <ul>{recent_rows}</ul>
                            </Show>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
