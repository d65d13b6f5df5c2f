use crate::api::feedback::FeedbackApi;
use crate::api::http::FetchClient;
use crate::components::icons::Send;
use crate::components::navbar::AppNavbar;
use crate::config::backend_url;
use crate::store::auth::{BrowserSession, SessionStore, enforce_session, use_auth};
use crate::store::notify::use_notifier;
use crate::web::router::use_router;
use ideahub_shared::{FeedbackKind, FeedbackRequest};
use leptos::prelude::*;
use leptos::task::spawn_local;

async fn submit(payload: FeedbackRequest) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    FeedbackApi::new(FetchClient, backend_url())
        .send(&token, &payload)
        .await
}

#[component]
pub fn FeedbackPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    enforce_session(&auth_ctx, router);

    // 姓名和邮箱用当前用户预填，仍然可改
    let identity = auth_ctx.state.get_untracked().identity;
    let (name, set_name) = signal(identity.name);
    let (email, set_email) = signal(identity.email);
    let (kind, set_kind) = signal(FeedbackKind::Feedback);
    let (message, set_message) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if message.get().trim().is_empty() {
            notifier.error("Please write a message first.");
            return;
        }

        set_is_submitting.set(true);
        let payload = FeedbackRequest {
            name: name.get(),
            email: email.get(),
            kind: kind.get(),
            message: message.get(),
        };
        spawn_local(async move {
            if submit(payload).await {
                notifier.success("Thank you! Your feedback was sent.");
                set_message.set(String::new());
            } else {
                notifier.error("Could not send your feedback. Please try again.");
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <AppNavbar />

                <div class="max-w-xl mx-auto card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit>
                        <h3 class="card-title">"Send us feedback"</h3>
                        <p class="text-base-content/70 text-sm">
                            "Found a bug, have a suggestion, or want to support the project?"
                        </p>

                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label" for="fb_name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="fb_name"
                                    type="text"
                                    required
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    prop:value=name
                                    class="input input-bordered w-full"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="fb_email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="fb_email"
                                    type="email"
                                    required
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered w-full"
                                />
                            </div>
                        </div>

                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"What is this about?"</span>
                            </label>
                            <select
                                class="select select-bordered w-full"
                                on:change=move |ev| {
                                    let next = match event_target_value(&ev).as_str() {
                                        "bug" => FeedbackKind::Bug,
                                        "sponsor" => FeedbackKind::Sponsor,
                                        _ => FeedbackKind::Feedback,
                                    };
                                    set_kind.set(next);
                                }
                            >
                                <option value="feedback" selected=move || kind.get() == FeedbackKind::Feedback>
                                    "General feedback"
                                </option>
                                <option value="bug" selected=move || kind.get() == FeedbackKind::Bug>
                                    "Bug report"
                                </option>
                                <option value="sponsor" selected=move || kind.get() == FeedbackKind::Sponsor>
                                    "Sponsorship"
                                </option>
                            </select>
                        </div>

                        <div class="form-control">
                            <label class="label" for="fb_message">
                                <span class="label-text">"Message"</span>
                            </label>
                            <textarea
                                id="fb_message"
                                required
                                placeholder="Tell us what happened or what you would like to see..."
                                class="textarea textarea-bordered w-full min-h-32"
                                on:input=move |ev| set_message.set(event_target_value(&ev))
                                prop:value=message
                            ></textarea>
                        </div>

                        <div class="form-control mt-4">
                            <button class="btn btn-primary gap-2" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                                } else {
                                    view! { <Send attr:class="h-4 w-4" /> "Send feedback" }.into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
