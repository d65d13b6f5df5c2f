//! 全局通知
//!
//! 一条可见通知，成功/失败两种样式，由 ToastHost 渲染并定时清除。
//! 和认证上下文一样走 Context 注入，组件侧拿到的是 Copy 句柄。

use leptos::prelude::*;

#[derive(Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub error: bool,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    notice: ReadSignal<Option<Notice>>,
    set_notice: WriteSignal<Option<Notice>>,
}

impl Notifier {
    pub fn new() -> Self {
        let (notice, set_notice) = signal(None);
        Self { notice, set_notice }
    }

    pub fn current(&self) -> Option<Notice> {
        self.notice.get()
    }

    pub fn success(&self, text: impl Into<String>) {
        self.set_notice.set(Some(Notice {
            text: text.into(),
            error: false,
        }));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.set_notice.set(Some(Notice {
            text: text.into(),
            error: true,
        }));
    }

    pub fn clear(&self) {
        self.set_notice.set(None);
    }
}

pub fn provide_notifier() -> Notifier {
    let notifier = Notifier::new();
    provide_context(notifier);
    notifier
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}
