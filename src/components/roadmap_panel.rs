use crate::components::icons::{Map, Sparkles};
use crate::store::notify::use_notifier;
use crate::store::roadmap::{self, roadmaps_for_idea, use_roadmaps};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 详情页侧栏的 roadmap 列表与生成入口
#[component]
pub fn RoadmapPanel(idea_id: String) -> impl IntoView {
    let roadmap_ctx = use_roadmaps();
    let notifier = use_notifier();

    let idea_id = StoredValue::new(idea_id);
    let (exported_to, set_exported_to) = signal("markdown".to_string());

    roadmap::hydrate(&roadmap_ctx);
    spawn_local(async move {
        roadmap::load_roadmaps(&roadmap_ctx).await;
    });

    let mine = move || {
        roadmap_ctx.state.with(|s| {
            roadmaps_for_idea(&s.roadmaps, &idea_id.get_value())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let generate = move |_| {
        if roadmap_ctx.is_generating.get() {
            return;
        }
        let format = exported_to.get();
        spawn_local(async move {
            if roadmap::create_roadmap(&roadmap_ctx, idea_id.get_value(), format).await {
                notifier.success("Roadmap generated.");
            } else {
                notifier.error("Could not generate a roadmap. Please try again.");
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title gap-2">
                    <Map attr:class="h-5 w-5 text-secondary" /> "Roadmaps"
                </h3>

                <div class="join w-full">
                    <select
                        class="select select-bordered select-sm join-item"
                        on:change=move |ev| set_exported_to.set(event_target_value(&ev))
                    >
                        <option value="markdown" selected=move || exported_to.get() == "markdown">
                            "Markdown"
                        </option>
                        <option value="notion" selected=move || exported_to.get() == "notion">
                            "Notion"
                        </option>
                        <option value="github" selected=move || exported_to.get() == "github">
                            "GitHub"
                        </option>
                    </select>
                    <button
                        class="btn btn-secondary btn-sm join-item grow gap-2"
                        disabled=move || roadmap_ctx.is_generating.get()
                        on:click=generate
                    >
                        {move || if roadmap_ctx.is_generating.get() {
                            view! { <span class="loading loading-spinner loading-xs"></span> "Generating..." }.into_any()
                        } else {
                            view! { <Sparkles attr:class="h-4 w-4" /> "Generate" }.into_any()
                        }}
                    </button>
                </div>

                <Show
                    when=move || !mine().is_empty()
                    fallback=|| view! {
                        <p class="text-base-content/50 text-sm py-2">
                            "No roadmap yet. Let the AI draft one from your notes."
                        </p>
                    }
                >
                    <div class="space-y-4 max-h-96 overflow-y-auto">
                        <For
                            each=mine
                            key=|r| r.id.clone().unwrap_or_else(|| r.generated_at.clone())
                            children=move |roadmap| {
                                let mut steps = roadmap.steps.clone();
                                steps.sort_by_key(|s| s.step_order);
                                view! {
                                    <div class="border border-base-200 rounded-lg p-3">
                                        <div class="flex items-center justify-between text-xs text-base-content/60 mb-2">
                                            <span class="badge badge-outline badge-sm">{roadmap.exported_to.clone()}</span>
                                            <span>{roadmap.generated_at.split('T').next().unwrap_or_default().to_string()}</span>
                                        </div>
                                        <ul class="space-y-2">
                                            {steps
                                                .into_iter()
                                                .map(|step| view! {
                                                    <li>
                                                        <p class="font-medium text-sm">
                                                            {format!("{}. {}", step.step_order, step.title)}
                                                        </p>
                                                        <p class="text-xs text-base-content/70">
                                                            {step.description.clone()}
                                                        </p>
                                                        <ul class="mt-1 space-y-1">
                                                            {step
                                                                .tasks
                                                                .iter()
                                                                .map(|task| view! {
                                                                    <li class="text-xs pl-3 border-l-2 border-base-200">
                                                                        {task.description.clone()}
                                                                        <span class="opacity-60">
                                                                            {if task.suggested_tools.is_empty() {
                                                                                String::new()
                                                                            } else {
                                                                                format!(" ({})", task.suggested_tools.join(", "))
                                                                            }}
                                                                        </span>
                                                                    </li>
                                                                })
                                                                .collect_view()}
                                                        </ul>
                                                    </li>
                                                })
                                                .collect_view()}
                                        </ul>
                                    </div>
                                }
                            }
                        />
                    </div>
                </Show>
            </div>
        </div>
    }
}
