use crate::components::icons::Plus;
use ideahub_shared::CreateIdeaRequest;
use leptos::prelude::*;

/// 新建创意的模态框。提交由父组件经 `on_add` 处理。
#[component]
pub fn AddIdeaDialog(#[prop(into)] on_add: Callback<CreateIdeaRequest>) -> impl IntoView {
    let (open, set_open) = signal(false);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    // 表单字段
    let (title, set_title) = signal(String::new());
    let (tags, set_tags) = signal(Vec::<String>::new());
    let (tag_input, set_tag_input) = signal(String::new());

    let reset_form = move || {
        set_title.set(String::new());
        set_tags.set(Vec::new());
        set_tag_input.set(String::new());
    };

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let add_tag = move || {
        let tag = tag_input.get().trim().to_string();
        if tag.is_empty() {
            return;
        }
        set_tags.update(|list| {
            if !list.contains(&tag) {
                list.push(tag);
            }
        });
        set_tag_input.set(String::new());
    };

    let remove_tag = move |tag: String| {
        set_tags.update(|list| list.retain(|t| *t != tag));
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = title.get().trim().to_string();
        if name.is_empty() {
            return;
        }

        on_add.run(CreateIdeaRequest {
            title: name,
            tags: tags.get(),
        });
        set_open.set(false);
        reset_form();
    };

    view! {
        // 触发按钮
        <button class="btn btn-primary btn-sm gap-2" on:click=move |_| set_open.set(true)>
            <Plus attr:class="h-4 w-4" /> "New idea"
        </button>

        // 模态框内容
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">"Capture an idea"</h3>
                <p class="py-4 text-base-content/70">
                    "Give it a name now, develop it later."
                </p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="form-control">
                        <label for="idea_title" class="label">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input
                            id="idea_title"
                            required
                            type="text"
                            placeholder="A carpooling app for dog owners"
                            on:input=move |ev| set_title.set(event_target_value(&ev))
                            prop:value=title
                            class="input input-bordered w-full"
                        />
                    </div>

                    <div class="form-control">
                        <label for="idea_tag" class="label">
                            <span class="label-text">"Tags"</span>
                        </label>
                        <div class="join w-full">
                            <input
                                id="idea_tag"
                                type="text"
                                placeholder="mobile"
                                on:input=move |ev| set_tag_input.set(event_target_value(&ev))
                                on:keydown=move |ev| {
                                    if ev.key() == "Enter" {
                                        ev.prevent_default();
                                        add_tag();
                                    }
                                }
                                prop:value=tag_input
                                class="input input-bordered join-item w-full"
                            />
                            <button type="button" class="btn join-item" on:click=move |_| add_tag()>
                                "Add"
                            </button>
                        </div>
                        <label class="label">
                            <span class="label-text-alt text-base-content/50">
                                "Tags help you organize and filter ideas"
                            </span>
                        </label>
                    </div>

                    <Show when=move || !tags.get().is_empty()>
                        <div class="flex flex-wrap gap-2">
                            <For
                                each=move || tags.get()
                                key=|tag| tag.clone()
                                children=move |tag| {
                                    let label = tag.clone();
                                    view! {
                                        <button
                                            type="button"
                                            class="badge badge-outline gap-1 cursor-pointer"
                                            on:click=move |_| remove_tag(tag.clone())
                                        >
                                            {label} " ✕"
                                        </button>
                                    }
                                }
                            />
                        </div>
                    </Show>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| set_open.set(false)>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">"Save idea"</button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
