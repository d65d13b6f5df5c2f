//! 会话与消息
//!
//! 后端不保证消息顺序，每次取数和每次乐观插入都重排一遍。
//! 新建会话后会自动发一条空消息触发 AI 开场分析，这个种子
//! 消息按 idea 只发一次，用 LocalStorage 标记位防重。

use crate::api::chat::ChatApi;
use crate::api::http::{FetchClient, HttpClient};
use crate::config::backend_url;
use crate::store::auth::{BrowserSession, SessionStore};
use crate::web::log::log_error;
use crate::web::storage::{BrowserCache, StateCache};
use ideahub_shared::date;
use ideahub_shared::{Chat, ChatMessage, Sender, SEEDED_CHAT_PREFIX, STORAGE_CHAT};
use leptos::prelude::*;

// =========================================================
// 排序与乐观插入
// =========================================================

/// 消息排序规则：有时间的消息按 created_at 升序，没有时间（或
/// 解析不出）的消息留在原位，不参与重排。
///
/// 不能直接 `sort_by` 一个"缺时间判相等"的比较器：它不满足
/// 全序（有时间的 a < b，但两者都与无时间的 c 相等），标准库
/// 排序对这种比较器可能 panic。这里只对有时间的下标集合排序，
/// 再按原位置写回。
pub fn sort_chat(chat: &mut Chat) {
    let mut dated: Vec<(i64, usize)> = chat
        .messages
        .iter()
        .enumerate()
        .filter_map(|(i, m)| {
            let ts = m.created_at.as_deref().and_then(date::parse)?;
            Some((ts.as_millis(), i))
        })
        .collect();
    if dated.len() < 2 {
        return;
    }
    let slots: Vec<usize> = dated.iter().map(|&(_, i)| i).collect();
    // 时间相同的消息按原有先后（下标）定序
    dated.sort_by_key(|&(ts, i)| (ts, i));
    let reordered: Vec<ChatMessage> = dated
        .iter()
        .map(|&(_, i)| chat.messages[i].clone())
        .collect();
    for (slot, message) in slots.into_iter().zip(reordered) {
        chat.messages[slot] = message;
    }
}

pub fn sort_all(chats: &mut [Chat]) {
    for chat in chats.iter_mut() {
        sort_chat(chat);
    }
}

/// 本地先挂一条用户消息，等服务端回包后整体重取替换
pub fn optimistic_message(text: &str, now_millis: i64, now_iso: &str) -> ChatMessage {
    ChatMessage {
        message_id: format!("temp-{}", now_millis),
        message: text.to_string(),
        sender: Sender::User,
        created_at: Some(now_iso.to_string()),
    }
}

pub fn insert_message(chats: &mut [Chat], chat_id: &str, message: ChatMessage) {
    if let Some(chat) = chats.iter_mut().find(|c| c.chat_id == chat_id) {
        chat.messages.push(message);
        sort_chat(chat);
    }
}

pub fn chat_for_idea<'a>(chats: &'a [Chat], idea_id: &str) -> Option<&'a Chat> {
    chats.iter().find(|c| c.idea_id == idea_id)
}

// =========================================================
// 业务层
// =========================================================

pub struct ChatService<C: HttpClient, K: StateCache> {
    api: ChatApi<C>,
    cache: K,
}

impl<C: HttpClient, K: StateCache> ChatService<C, K> {
    pub fn new(client: C, cache: K, base_url: &str) -> Self {
        Self {
            api: ChatApi::new(client, base_url),
            cache,
        }
    }

    pub fn cached(&self) -> Option<Vec<Chat>> {
        let json = self.cache.read(STORAGE_CHAT)?;
        serde_json::from_str(&json).ok()
    }

    fn persist(&self, chats: &[Chat]) {
        match serde_json::to_string(chats) {
            Ok(json) => {
                self.cache.write(STORAGE_CHAT, &json);
            }
            Err(e) => log_error!("chat state not persisted: {}", e),
        }
    }

    pub async fn refresh(&self, token: &str) -> Option<Vec<Chat>> {
        let mut chats = self.api.list(token).await?;
        sort_all(&mut chats);
        self.persist(&chats);
        Some(chats)
    }

    /// 找到 idea 的会话；没有就新建，并在新建后做一次性种子消息。
    /// 种子就是一次普通的空消息发送，发成功才落防重标记。
    pub async fn ensure_chat(&self, token: &str, idea_id: &str) -> Option<Vec<Chat>> {
        let chats = self.refresh(token).await?;
        if chat_for_idea(&chats, idea_id).is_some() {
            return Some(chats);
        }

        let chat_id = self.api.create_for_idea(token, idea_id).await?;
        let mut chats = self.refresh(token).await?;

        let flag = format!("{}{}", SEEDED_CHAT_PREFIX, idea_id);
        if self.cache.read(&flag).is_none() && self.api.send(token, &chat_id, "").await {
            self.cache.write(&flag, "1");
            if let Some(seeded) = self.refresh(token).await {
                chats = seeded;
            }
        }
        Some(chats)
    }

    pub async fn send_message(&self, token: &str, chat_id: &str, text: &str) -> Option<Vec<Chat>> {
        if !self.api.send(token, chat_id, text).await {
            return None;
        }
        self.refresh(token).await
    }

    pub async fn delete_chat(&self, token: &str, chat_id: &str) -> Option<Vec<Chat>> {
        if !self.api.delete(token, chat_id).await {
            return None;
        }
        self.refresh(token).await
    }
}

// =========================================================
// 信号层与组件胶水
// =========================================================

#[derive(Clone, Copy)]
pub struct ChatContext {
    pub chats: ReadSignal<Vec<Chat>>,
    pub set_chats: WriteSignal<Vec<Chat>>,
    /// AI 回复在途
    pub is_waiting: RwSignal<bool>,
}

impl ChatContext {
    pub fn new() -> Self {
        let (chats, set_chats) = signal(Vec::new());
        Self {
            chats,
            set_chats,
            is_waiting: RwSignal::new(false),
        }
    }
}

impl Default for ChatContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_chats() -> ChatContext {
    use_context::<ChatContext>().expect("ChatContext should be provided")
}

fn browser_service() -> ChatService<FetchClient, BrowserCache> {
    ChatService::new(FetchClient, BrowserCache, backend_url())
}

pub fn hydrate(ctx: &ChatContext) {
    if let Some(chats) = browser_service().cached() {
        ctx.set_chats.set(chats);
    }
}

pub async fn ensure_chat_for(ctx: &ChatContext, idea_id: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    match browser_service().ensure_chat(&token, &idea_id).await {
        Some(chats) => {
            ctx.set_chats.set(chats);
            true
        }
        None => false,
    }
}

/// 乐观插入 + 发送 + 重取。失败时本地那条保留，下次重取对账。
pub async fn send_chat_message(ctx: &ChatContext, chat_id: String, text: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    let message = optimistic_message(&text, date::now().as_millis(), &date::now_iso());
    ctx.set_chats
        .update(|chats| insert_message(chats, &chat_id, message));

    ctx.is_waiting.set(true);
    let sent = browser_service().send_message(&token, &chat_id, &text).await;
    ctx.is_waiting.set(false);
    match sent {
        Some(chats) => {
            ctx.set_chats.set(chats);
            true
        }
        None => false,
    }
}

pub async fn delete_chat(ctx: &ChatContext, chat_id: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    match browser_service().delete_chat(&token, &chat_id).await {
        Some(chats) => {
            ctx.set_chats.set(chats);
            true
        }
        None => false,
    }
}
