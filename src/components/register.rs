use crate::components::icons::Lightbulb;
use crate::store::auth::{register, validate_email, validate_password};
use crate::store::notify::use_notifier;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let router = use_router();
    let notifier = use_notifier();

    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let name_value = name.get();
        let email_value = email.get();
        let password_value = password.get();

        if name_value.trim().is_empty() {
            set_error_msg.set(Some("Please enter your name.".to_string()));
            return;
        }
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
            match register(name_value, email_value, password_value).await {
                Ok(()) => {
                    notifier.success("Account created! You can log in now.");
                    set_timeout(
                        move || router.navigate("/auth/login"),
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
                        <h1 class="text-3xl font-bold">"Join IdeaHub"</h1>
                        <p class="text-base-content/70">
                            "A place to capture, refine and plan your ideas"
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
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                placeholder="Ana Silva"
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                prop:value=name
                                class="input input-bordered"
                                required
                            />
                        </div>
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
                            <label class="label">
                                <span class="label-text-alt text-base-content/50">
                                    "At least 8 characters with upper, lower, digit and symbol"
                                </span>
                            </label>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Create account".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center mt-2">
                            <button
                                type="button"
                                class="link link-primary text-sm"
                                on:click=move |_| router.navigate("/auth/login")
                            >
                                "Already have an account? Log in"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
