use crate::components::icons::{MessageSquare, Send, Trash2};
use crate::store::chat::{self, chat_for_idea, use_chats};
use crate::store::notify::use_notifier;
use ideahub_shared::Sender;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 详情页侧栏的 AI 对话
#[component]
pub fn ChatPanel(idea_id: String) -> impl IntoView {
    let chat_ctx = use_chats();
    let notifier = use_notifier();

    let idea_id = StoredValue::new(idea_id);
    let (initializing, set_initializing) = signal(true);
    let (draft, set_draft) = signal(String::new());

    // 找到或建出这条 idea 的会话，首次还会种一条开场白
    chat::hydrate(&chat_ctx);
    spawn_local(async move {
        chat::ensure_chat_for(&chat_ctx, idea_id.get_value()).await;
        set_initializing.set(false);
    });

    let chat_id = move || {
        chat_ctx
            .chats
            .with(|chats| chat_for_idea(chats, &idea_id.get_value()).map(|c| c.chat_id.clone()))
    };

    let messages = move || {
        chat_ctx.chats.with(|chats| {
            chat_for_idea(chats, &idea_id.get_value())
                .map(|c| c.messages.clone())
                .unwrap_or_default()
        })
    };

    let send = move || {
        let text = draft.get().trim().to_string();
        if text.is_empty() || chat_ctx.is_waiting.get() {
            return;
        }
        let Some(target) = chat_id() else {
            return;
        };
        set_draft.set(String::new());
        spawn_local(async move {
            if !chat::send_chat_message(&chat_ctx, target, text).await {
                notifier.error("The message could not be sent. Please try again.");
            }
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        send();
    };

    let handle_delete = move |_| {
        let Some(target) = chat_id() else {
            return;
        };
        spawn_local(async move {
            if chat::delete_chat(&chat_ctx, target).await {
                notifier.success("Conversation deleted.");
            } else {
                notifier.error("Could not delete the conversation.");
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title gap-2">
                        <MessageSquare attr:class="h-5 w-5 text-primary" /> "AI chat"
                    </h3>
                    <Show when=move || chat_id().is_some()>
                        <button
                            class="btn btn-ghost btn-sm btn-square text-error"
                            on:click=handle_delete
                        >
                            <Trash2 attr:class="h-4 w-4" />
                        </button>
                    </Show>
                </div>

                <div class="max-h-96 overflow-y-auto space-y-1 py-2">
                    <Show when=move || initializing.get() && messages().is_empty()>
                        <div class="text-center text-base-content/50 py-4">
                            <span class="loading loading-spinner loading-sm"></span>
                            " Opening the conversation..."
                        </div>
                    </Show>
                    <For
                        each=messages
                        key=|m| m.message_id.clone()
                        children=move |msg| {
                            let mine = msg.sender == Sender::User;
                            view! {
                                <div class=if mine { "chat chat-end" } else { "chat chat-start" }>
                                    <div class="chat-header text-xs opacity-50">
                                        {if mine { "You" } else { "IdeaHub AI" }}
                                    </div>
                                    <div class=if mine {
                                        "chat-bubble chat-bubble-primary"
                                    } else {
                                        "chat-bubble"
                                    }>{msg.message.clone()}</div>
                                </div>
                            }
                        }
                    />
                    <Show when=move || chat_ctx.is_waiting.get()>
                        <div class="chat chat-start">
                            <div class="chat-bubble">
                                <span class="loading loading-dots loading-sm"></span>
                            </div>
                        </div>
                    </Show>
                </div>

                <form class="flex gap-2 pt-2" on:submit=on_submit>
                    <input
                        type="text"
                        placeholder="Ask about this idea..."
                        class="input input-bordered w-full"
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        prop:value=draft
                    />
                    <button
                        type="submit"
                        class="btn btn-primary btn-square"
                        disabled=move || {
                            chat_ctx.is_waiting.get() || chat_id().is_none()
                                || draft.get().trim().is_empty()
                        }
                    >
                        <Send attr:class="h-4 w-4" />
                    </button>
                </form>
            </div>
        </div>
    }
}
