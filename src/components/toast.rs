use crate::store::notify::use_notifier;
use leptos::prelude::*;

/// 全局通知浮层，挂在 App 根部
#[component]
pub fn ToastHost() -> impl IntoView {
    let notifier = use_notifier();

    // 3秒后清除通知
    Effect::new(move |_| {
        if notifier.current().is_some() {
            set_timeout(
                move || notifier.clear(),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <Show when=move || notifier.current().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_err = notifier.current().map(|n| n.error).unwrap_or(false);
                    if is_err {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notifier.current().map(|n| n.text).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
