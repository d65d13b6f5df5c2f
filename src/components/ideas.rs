use crate::api::idea::UpdateIdea;
use crate::components::add_idea_dialog::AddIdeaDialog;
use crate::components::icons::{Lightbulb, RefreshCw, Trash2};
use crate::components::navbar::AppNavbar;
use crate::store::auth::{enforce_session, use_auth};
use crate::store::idea::{self, use_ideas};
use crate::store::notify::use_notifier;
use crate::web::router::use_router;
use ideahub_shared::{CreateIdeaRequest, IdeaStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn IdeasPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let notifier = use_notifier();
    let idea_ctx = use_ideas();

    enforce_session(&auth_ctx, router);

    idea::hydrate(&idea_ctx);
    spawn_local(async move {
        idea::load_ideas(&idea_ctx).await;
    });

    let reload = move |_| {
        spawn_local(async move {
            idea::load_ideas(&idea_ctx).await;
        });
    };

    let handle_add = move |req: CreateIdeaRequest| {
        spawn_local(async move {
            if idea::create_idea(&idea_ctx, req).await {
                notifier.success("Idea captured.");
            } else {
                notifier.error("Could not save the idea. Please try again.");
            }
        });
    };

    let handle_status_change = move |id: String, code: String| {
        let Some(status) = IdeaStatus::from_code(&code) else {
            return;
        };
        spawn_local(async move {
            let changes = UpdateIdea {
                status: Some(status),
                ..Default::default()
            };
            if idea::update_idea(&idea_ctx, id, changes).await {
                notifier.success("Idea updated.");
            } else {
                notifier.error("Could not update the idea. Please try again.");
            }
        });
    };

    let handle_delete = move |id: String| {
        spawn_local(async move {
            if idea::delete_idea(&idea_ctx, id).await {
                notifier.success("Idea deleted.");
            } else {
                notifier.error("Could not delete the idea. Please try again.");
            }
        });
    };

    let total = move || idea_ctx.state.with(|s| s.ideas.len());

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <AppNavbar />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex items-center justify-between p-6 pb-2">
                            <div>
                                <h3 class="card-title">"Your ideas"</h3>
                                <p class="text-base-content/70 text-sm">
                                    "Capture, develop and finish them."
                                </p>
                            </div>
                            <div class="flex items-center gap-2">
                                <AddIdeaDialog on_add=handle_add />
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
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Title"</th>
                                        <th>"Status"</th>
                                        <th class="hidden md:table-cell">"AI classification"</th>
                                        <th class="hidden md:table-cell">"Tags"</th>
                                        <th class="hidden md:table-cell">"Created"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || total() == 0 && !idea_ctx.is_loading.get()>
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                <Lightbulb attr:class="h-5 w-5 inline-block mr-1" />
                                                "No ideas yet. Capture your first one."
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || idea_ctx.is_loading.get() && total() == 0>
                                        <tr>
                                            <td colspan="6" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span> " Loading..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || idea_ctx.state.get().ideas
                                        // 状态也进 key：服务端对账改了状态时整行重建
                                        key=|i| format!("{}:{}", i.id.clone().unwrap_or_default(), i.status.as_code())
                                        children=move |idea| {
                                            let id = idea.id.clone().unwrap_or_default();
                                            let id_for_nav = id.clone();
                                            let id_for_status = id.clone();
                                            let id_for_delete = id.clone();
                                            let status = idea.status;
                                            let date = idea
                                                .created_at
                                                .as_deref()
                                                .map(|s| s.split('T').next().unwrap_or(s).to_string())
                                                .unwrap_or_default();
                                            view! {
                                                <tr>
                                                    <td>
                                                        <button
                                                            class="link link-hover font-medium text-left"
                                                            on:click=move |_| {
                                                                if !id_for_nav.is_empty() {
                                                                    router.navigate(&format!("/ideas/{}", id_for_nav));
                                                                }
                                                            }
                                                        >
                                                            {idea.title.clone()}
                                                        </button>
                                                    </td>
                                                    <td>
                                                        <select
                                                            class="select select-bordered select-sm"
                                                            on:change=move |ev| {
                                                                handle_status_change(
                                                                    id_for_status.clone(),
                                                                    event_target_value(&ev),
                                                                )
                                                            }
                                                        >
                                                            <option value="DRAFT" selected=status == IdeaStatus::Draft>
                                                                "Draft"
                                                            </option>
                                                            <option value="ACTIVE" selected=status == IdeaStatus::Active>
                                                                "In progress"
                                                            </option>
                                                            <option value="FINISHED" selected=status == IdeaStatus::Finished>
                                                                "Finished"
                                                            </option>
                                                        </select>
                                                    </td>
                                                    <td class="hidden md:table-cell">
                                                        {if idea.ai_classification.is_empty() {
                                                            view! { <span class="text-base-content/40">"—"</span> }.into_any()
                                                        } else {
                                                            view! {
                                                                <span class="badge badge-accent badge-outline">
                                                                    {idea.ai_classification.clone()}
                                                                </span>
                                                            }.into_any()
                                                        }}
                                                    </td>
                                                    <td class="hidden md:table-cell">
                                                        <div class="flex flex-wrap gap-1">
                                                            {idea
                                                                .tags
                                                                .iter()
                                                                .map(|tag| view! {
                                                                    <span class="badge badge-outline badge-sm">{tag.clone()}</span>
                                                                })
                                                                .collect_view()}
                                                        </div>
                                                    </td>
                                                    <td class="hidden md:table-cell text-xs opacity-60">{date}</td>
                                                    <td>
                                                        <button
                                                            class="btn btn-ghost btn-sm btn-square text-error"
                                                            on:click=move |_| handle_delete(id_for_delete.clone())
                                                        >
                                                            <Trash2 attr:class="h-4 w-4" />
                                                        </button>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
