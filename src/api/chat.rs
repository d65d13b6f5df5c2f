//! Chat (AI agent) 接口客户端
//!
//! 历史原因：发消息的接口把正文放在 query 参数里而不是请求体，
//! 这里负责编码。

use crate::api::http::{HttpClient, HttpMethod, HttpRequest};
use crate::web::log::log_error;
use crate::web::query::encode_component;
use ideahub_shared::Chat;
use serde_json::Value;

pub struct ChatApi<C: HttpClient> {
    pub(crate) client: C,
    base_url: String,
}

impl<C: HttpClient> ChatApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self, token: &str) -> Option<Vec<Chat>> {
        let req = HttpRequest::new(&self.url("/api/agent"), HttpMethod::Get).with_bearer(token);
        let res = match self.client.send(req).await {
            Ok(res) => res,
            Err(e) => {
                log_error!("chat list failed: {}", e);
                return None;
            }
        };
        if !res.ok() {
            log_error!("chat list returned {}", res.status);
            return None;
        }
        let body: Value = res.json().ok()?;
        let rows = match &body {
            Value::Array(_) => body.clone(),
            _ => body.get("data").cloned().unwrap_or(Value::Array(vec![])),
        };
        match serde_json::from_value(rows) {
            Ok(chats) => Some(chats),
            Err(e) => {
                log_error!("chat list unreadable: {}", e);
                None
            }
        }
    }

    /// 给 idea 开新会话，返回新会话的 chat_id
    pub async fn create_for_idea(&self, token: &str, idea_id: &str) -> Option<String> {
        let req = HttpRequest::new(
            &self.url(&format!("/api/agent/idea/{}", idea_id)),
            HttpMethod::Post,
        )
        .with_bearer(token);
        let res = match self.client.send(req).await {
            Ok(res) => res,
            Err(e) => {
                log_error!("chat create failed: {}", e);
                return None;
            }
        };
        if !res.ok() {
            log_error!("chat create returned {}", res.status);
            return None;
        }
        let body: Value = res.json().ok()?;
        body.get("chat_id")
            .or_else(|| body.pointer("/data/chat_id"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// 消息放 query 参数。AI 回复不在响应里，发完重取会话列表。
    pub async fn send(&self, token: &str, chat_id: &str, message: &str) -> bool {
        let req = HttpRequest::new(
            &self.url(&format!(
                "/api/agent/{}?message={}",
                chat_id,
                encode_component(message)
            )),
            HttpMethod::Post,
        )
        .with_bearer(token);
        match self.client.send(req).await {
            Ok(res) => {
                if !res.ok() {
                    log_error!("chat send returned {}", res.status);
                }
                res.ok()
            }
            Err(e) => {
                log_error!("chat send failed: {}", e);
                false
            }
        }
    }

    pub async fn delete(&self, token: &str, chat_id: &str) -> bool {
        let req = HttpRequest::new(
            &self.url(&format!("/api/agent/{}", chat_id)),
            HttpMethod::Delete,
        )
        .with_bearer(token);
        match self.client.send(req).await {
            Ok(res) => res.ok(),
            Err(e) => {
                log_error!("chat {} delete failed: {}", chat_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::MockHttpClient;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    #[tokio::test]
    async fn test_send_encodes_message_into_query() {
        let url = format!("{}/api/agent/c1?message=what%20about%20pricing%3F", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 200, json!({}));

        let api = ChatApi::new(client, BASE);
        assert!(api.send("tok", "c1", "what about pricing?").await);
        assert_eq!(api.client.count_requests_to(&url), 1);
    }

    #[tokio::test]
    async fn test_list_parses_messages() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/agent", BASE),
            200,
            json!([{
                "chat_id": "c1",
                "idea_id": "7",
                "messages": [
                    { "message_id": "m1", "sender": "USER", "message": "hi",
                      "created_at": "2025-06-12T10:30:00Z" }
                ]
            }]),
        );
        let api = ChatApi::new(client, BASE);
        let chats = api.list("tok").await.unwrap();
        assert_eq!(chats[0].messages[0].message, "hi");
        assert_eq!(chats[0].messages[0].sender, ideahub_shared::Sender::User);
    }

    #[tokio::test]
    async fn test_create_targets_idea_scoped_route() {
        let url = format!("{}/api/agent/idea/7", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 200, json!({ "chat_id": "c9" }));

        let api = ChatApi::new(client, BASE);
        assert_eq!(api.create_for_idea("tok", "7").await.as_deref(), Some("c9"));
        let requests = api.client.requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert!(requests[0].body.is_none());
    }
}
