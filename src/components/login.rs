use crate::components::icons::Lightbulb;
use crate::session::{REASON_AUTH_REQUIRED, REASON_TOKEN_EXPIRED};
use crate::store::auth::{login, use_auth, validate_email, validate_password};
use crate::store::notify::use_notifier;
use crate::web::query::query_param;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth_ctx = use_auth();
    let router = use_router();
    let notifier = use_notifier();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // 被闸门弹回来的用户需要知道原因
    let search = router.current_search();
    Effect::new(move |_| {
        let query = search.get();
        match query_param(&query, "reason").as_deref() {
            Some(REASON_TOKEN_EXPIRED) => {
                notifier.error("Your session has expired. Please log in again.");
            }
            Some(REASON_AUTH_REQUIRED) => {
                notifier.error("Please log in to continue.");
            }
            _ => {}
        }
        // 跳转方还可以带一条自定义文案
        if let Some(msg) = query_param(&query, "message").filter(|m| !m.is_empty()) {
            notifier.success(msg);
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let email_value = email.get();
        let password_value = password.get();

        // 先在本地把明显无效的输入拦下来，不打网络
        if let Err(msg) = validate_email(&email_value) {
            set_error_msg.set(Some(msg.to_string()));
            return;
        }
        if let Err(msg) = validate_password(&password_value) {
            set_error_msg.set(Some(msg.to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(&auth_ctx, email_value, password_value).await {
                Ok(first_login) => {
                    if first_login {
                        notifier.success("Welcome to IdeaHub! Taking you to your dashboard...");
                    } else {
                        notifier.success("Welcome back! Taking you to your dashboard...");
                    }
                    // 提示先停留一下再跳转
                    set_timeout(
                        move || router.navigate("/dashboard"),
                        std::time::Duration::from_secs(2),
                    );
                }
                Err(msg) => {
                    set_error_msg.set(Some(msg));
                    set_is_submitting.set(false);
                }
            }
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Lightbulb attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"IdeaHub"</h1>
                        <p class="text-base-content/70">
                            "Log in to keep working on your ideas"
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Log in".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center mt-2">
                            <button
                                type="button"
                                class="link link-primary text-sm"
                                on:click=move |_| router.navigate("/auth/register")
                            >
                                "No account yet? Create one"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
