use crate::components::chat_panel::ChatPanel;
use crate::components::dashboard::status_badge_class;
use crate::components::icons::ArrowLeft;
use crate::components::navbar::AppNavbar;
use crate::components::roadmap_panel::RoadmapPanel;
use crate::editor::autosave::{AUTOSAVE_QUIET_MS, AutosaveController};
use crate::editor::document;
use crate::store::auth::{enforce_session, use_auth};
use crate::store::idea::{autosave_idea, fetch_idea, use_ideas};
use crate::web::router::use_router;
use ideahub_shared::{Idea, date};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 编辑器上方的保存状态角标
#[derive(Clone, Copy, PartialEq)]
enum SaveState {
    Idle,
    Dirty,
    Saving,
    Saved,
    Failed,
}

impl SaveState {
    fn label(self) -> &'static str {
        match self {
            SaveState::Idle => "",
            SaveState::Dirty => "Unsaved changes",
            SaveState::Saving => "Saving...",
            SaveState::Saved => "Saved",
            SaveState::Failed => "Autosave failed",
        }
    }
}

#[component]
pub fn IdeaDetailPage(id: String) -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let idea_ctx = use_ideas();

    enforce_session(&auth_ctx, router);

    let idea_id = StoredValue::new(id);
    let (idea, set_idea) = signal(Option::<Idea>::None);
    let (content, set_content) = signal(String::new());
    let (load_failed, set_load_failed) = signal(false);
    let (save_state, set_save_state) = signal(SaveState::Idle);

    let controller = StoredValue::new(AutosaveController::new(AUTOSAVE_QUIET_MS));

    // 初始加载：详情直接按 id 取，不依赖列表已经取过。
    // 服务端内容只在不会盖掉未保存输入时放进编辑器。
    spawn_local(async move {
        match fetch_idea(idea_id.get_value()).await {
            Some(found) => {
                let incoming = found.raw_content.clone().unwrap_or_default();
                let saving = controller.with_value(|c| c.in_flight());
                if document::should_apply(&content.get_untracked(), &incoming, saving) {
                    set_content.set(incoming);
                }
                set_idea.set(Some(found));
            }
            None => set_load_failed.set(true),
        }
    });

    // 到期检查：真正的"该不该存"判断全在控制器里，这里只负责
    // 在静默期刚过时来问一次。保存完成后再补问，接走在途期间
    // 到期却被单飞挡下的内容。
    let flush = move || {
        let now = date::now().as_millis();
        let mut due = None;
        controller.update_value(|c| due = c.take_due(now));
        let Some(text) = due else {
            return;
        };
        set_save_state.set(SaveState::Saving);
        spawn_local(async move {
            let mut next = Some(text);
            while let Some(body) = next.take() {
                let saved = autosave_idea(&idea_ctx, idea_id.get_value(), body).await;
                let now = date::now().as_millis();
                controller.update_value(|c| {
                    c.finish();
                    next = c.take_due(now);
                });
                set_save_state.set(if saved { SaveState::Saved } else { SaveState::Failed });
            }
        });
    };

    let on_edit = move |value: String| {
        set_content.set(value.clone());
        controller.update_value(|c| c.record_edit(date::now().as_millis(), value));
        set_save_state.set(SaveState::Dirty);
        set_timeout(
            flush,
            std::time::Duration::from_millis((AUTOSAVE_QUIET_MS + 80) as u64),
        );
    };

    let header = move || match idea.get() {
        Some(found) => view! {
            <div>
                <h2 class="text-2xl font-bold">{found.title.clone()}</h2>
                <div class="flex items-center gap-2 mt-1">
                    <span class=status_badge_class(found.status)>{found.status.label()}</span>
                    {found
                        .tags
                        .iter()
                        .map(|tag| view! {
                            <span class="badge badge-outline badge-sm">{tag.clone()}</span>
                        })
                        .collect_view()}
                </div>
            </div>
        }
        .into_any(),
        None => view! {
            <div class="flex items-center gap-2">
                <span class="loading loading-spinner loading-sm"></span>
                <span class="text-base-content/50">"Loading idea..."</span>
            </div>
        }
        .into_any(),
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <AppNavbar />

                <Show when=move || load_failed.get()>
                    <div role="alert" class="alert alert-error">
                        <span>"This idea could not be loaded. It may have been deleted."</span>
                    </div>
                </Show>

                <div class="flex items-center gap-4">
                    <button class="btn btn-ghost btn-circle" on:click=move |_| router.navigate("/ideas")>
                        <ArrowLeft attr:class="h-5 w-5" />
                    </button>
                    {header}
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-8 items-start">
                    <div class="lg:col-span-2 card bg-base-100 shadow-xl">
                        <div class="card-body">
                            <div class="flex items-center justify-between">
                                <h3 class="card-title">"Notes"</h3>
                                <span class=move || {
                                    if save_state.get() == SaveState::Failed {
                                        "text-error text-sm"
                                    } else {
                                        "text-base-content/50 text-sm"
                                    }
                                }>
                                    {move || save_state.get().label()}
                                </span>
                            </div>
                            <textarea
                                class="textarea textarea-bordered w-full min-h-[60vh] leading-relaxed"
                                placeholder="Start writing. Everything is saved automatically."
                                on:input=move |ev| on_edit(event_target_value(&ev))
                                prop:value=content
                            ></textarea>
                        </div>
                    </div>

                    <div class="space-y-8">
                        <ChatPanel idea_id=idea_id.get_value() />
                        <RoadmapPanel idea_id=idea_id.get_value() />
                    </div>
                </div>
            </div>
        </div>
    }
}
