//! Idea 接口客户端
//!
//! 列表接口的行数据在不同后端版本间不完全一致：status 有数字和
//! 字符串两种编码，tags 有数组和逗号串两种写法。这里逐字段容错
//! 解析，解析不动的行退回缺省值而不是让整页数据消失。
//!
//! 对 store 只暴露哨兵值：取不到就是 `None`/`false`，错误详情
//! 只进日志。

use crate::api::http::{HttpClient, HttpMethod, HttpRequest};
use crate::web::log::log_error;
use ideahub_shared::{CreateIdeaRequest, Idea, IdeaStatus};
use serde_json::{json, Map, Value};

/// 列表请求的超时上限。到点中止，避免仪表盘空转等待。
pub const IDEA_LIST_TIMEOUT_MS: u32 = 8_000;

/// PATCH /api/idea/{id} 的可选字段集
#[derive(Debug, Clone, Default)]
pub struct UpdateIdea {
    pub title: Option<String>,
    pub status: Option<IdeaStatus>,
    pub tags: Option<Vec<String>>,
}

pub struct IdeaApi<C: HttpClient> {
    pub(crate) client: C,
    base_url: String,
}

impl<C: HttpClient> IdeaApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self, token: &str) -> Option<Vec<Idea>> {
        let req = HttpRequest::new(&self.url("/api/idea"), HttpMethod::Get)
            .with_bearer(token)
            .with_timeout(IDEA_LIST_TIMEOUT_MS);
        let res = match self.client.send(req).await {
            Ok(res) => res,
            Err(e) => {
                log_error!("idea list failed: {}", e);
                return None;
            }
        };
        if !res.ok() {
            log_error!("idea list returned {}", res.status);
            return None;
        }
        let body: Value = match res.json() {
            Ok(v) => v,
            Err(e) => {
                log_error!("idea list unreadable: {}", e);
                return None;
            }
        };
        Some(rows_of(&body).into_iter().map(idea_from_row).collect())
    }

    pub async fn get(&self, token: &str, id: &str) -> Option<Idea> {
        let req = HttpRequest::new(&self.url(&format!("/api/idea/{}", id)), HttpMethod::Get)
            .with_bearer(token);
        let res = self.client.send(req).await.ok()?;
        if !res.ok() {
            log_error!("idea {} fetch returned {}", id, res.status);
            return None;
        }
        let body: Value = res.json().ok()?;
        Some(idea_from_row(unwrap_data(&body)))
    }

    pub async fn create(&self, token: &str, payload: &CreateIdeaRequest) -> Option<Idea> {
        let body = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                log_error!("idea payload unserializable: {}", e);
                return None;
            }
        };
        let req = HttpRequest::new(&self.url("/api/idea"), HttpMethod::Post)
            .with_bearer(token)
            .with_body(body);
        let res = self.client.send(req).await.ok()?;
        if !res.ok() {
            log_error!("idea create returned {}", res.status);
            return None;
        }
        let body: Value = res.json().ok()?;
        Some(idea_from_row(unwrap_data(&body)))
    }

    pub async fn delete(&self, token: &str, id: &str) -> bool {
        let req = HttpRequest::new(&self.url(&format!("/api/idea/{}", id)), HttpMethod::Delete)
            .with_bearer(token);
        match self.client.send(req).await {
            Ok(res) => res.ok(),
            Err(e) => {
                log_error!("idea {} delete failed: {}", id, e);
                false
            }
        }
    }

    /// 编辑器自动保存。内容走 `content` 字段（后端写接口的命名）。
    pub async fn autosave(&self, token: &str, id: &str, content: &str) -> bool {
        let req = HttpRequest::new(&self.url(&format!("/api/idea/{}", id)), HttpMethod::Patch)
            .with_bearer(token)
            .with_body(json!({ "content": content }));
        match self.client.send(req).await {
            Ok(res) => res.ok(),
            Err(e) => {
                log_error!("idea {} autosave failed: {}", id, e);
                false
            }
        }
    }

    /// 元数据更新。status 先按字符串编码发送；旧后端只认数字编码、
    /// 会回 422，此时换数字编码重试一次。
    pub async fn update(&self, token: &str, id: &str, changes: &UpdateIdea) -> bool {
        let url = self.url(&format!("/api/idea/{}", id));

        let first = self.patch(&url, token, update_body(changes, false)).await;
        match first {
            Some(res) if res.ok() => true,
            Some(res) if res.status == 422 && changes.status.is_some() => {
                match self.patch(&url, token, update_body(changes, true)).await {
                    Some(retry) if retry.ok() => true,
                    Some(retry) => {
                        log_error!("idea {} update retry returned {}", id, retry.status);
                        false
                    }
                    None => false,
                }
            }
            Some(res) => {
                log_error!("idea {} update returned {}", id, res.status);
                false
            }
            None => false,
        }
    }

    async fn patch(
        &self,
        url: &str,
        token: &str,
        body: Value,
    ) -> Option<crate::api::http::HttpResponse> {
        let req = HttpRequest::new(url, HttpMethod::Patch)
            .with_bearer(token)
            .with_body(body);
        match self.client.send(req).await {
            Ok(res) => Some(res),
            Err(e) => {
                log_error!("idea update failed: {}", e);
                None
            }
        }
    }
}

fn update_body(changes: &UpdateIdea, numeric_status: bool) -> Value {
    let mut body = Map::new();
    if let Some(title) = &changes.title {
        body.insert("title".to_string(), Value::from(title.clone()));
    }
    if let Some(status) = &changes.status {
        let encoded = if numeric_status {
            Value::from(status.as_number())
        } else {
            Value::from(status.as_code())
        };
        body.insert("status".to_string(), encoded);
    }
    if let Some(tags) = &changes.tags {
        body.insert("tags".to_string(), Value::from(tags.clone()));
    }
    Value::Object(body)
}

/// 列表体要么直接是数组，要么包在 `data` 里
fn rows_of(body: &Value) -> Vec<&Value> {
    let rows = match body {
        Value::Array(rows) => rows.as_slice(),
        _ => body
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
    };
    rows.iter().collect()
}

fn unwrap_data(body: &Value) -> &Value {
    match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    }
}

fn parse_status(v: Option<&Value>) -> IdeaStatus {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(IdeaStatus::from_number)
            .unwrap_or_default(),
        Some(Value::String(s)) => IdeaStatus::from_code(s).unwrap_or_default(),
        _ => IdeaStatus::default(),
    }
}

fn parse_tags(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_id(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// 单行容错解析。任何字段缺失/类型不对都有缺省值。
fn idea_from_row(row: &Value) -> Idea {
    Idea {
        id: parse_id(row.get("id")),
        title: row
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled")
            .to_string(),
        status: parse_status(row.get("status")),
        ai_classification: row
            .get("ai_classification")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        raw_content: row
            .get("raw_content")
            .or_else(|| row.get("description"))
            .and_then(Value::as_str)
            .map(str::to_string),
        tags: parse_tags(row.get("tags")),
        created_at: row
            .get("created_at")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::MockHttpClient;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    fn api(client: MockHttpClient) -> IdeaApi<MockHttpClient> {
        IdeaApi::new(client, BASE)
    }

    #[test]
    fn test_row_tolerates_loose_fields() {
        let idea = idea_from_row(&json!({
            "id": 42,
            "status": 1,
            "tags": "rust, wasm , ,ui"
        }));
        assert_eq!(idea.id.as_deref(), Some("42"));
        assert_eq!(idea.title, "Untitled");
        assert_eq!(idea.status, IdeaStatus::Active);
        assert_eq!(idea.tags, vec!["rust", "wasm", "ui"]);
        assert_eq!(idea.created_at, None);
    }

    #[test]
    fn test_row_reads_clean_fields() {
        let idea = idea_from_row(&json!({
            "id": "a1",
            "title": "Offline mode",
            "status": "FINISHED",
            "ai_classification": "feature",
            "raw_content": "notes",
            "tags": ["mobile"],
            "created_at": "2025-06-12T10:30:00Z"
        }));
        assert_eq!(idea.id.as_deref(), Some("a1"));
        assert_eq!(idea.status, IdeaStatus::Finished);
        assert_eq!(idea.raw_content.as_deref(), Some("notes"));
        assert_eq!(idea.created_at.as_deref(), Some("2025-06-12T10:30:00Z"));
    }

    #[test]
    fn test_unknown_status_defaults_to_draft() {
        assert_eq!(parse_status(Some(&json!("archived"))), IdeaStatus::Draft);
        assert_eq!(parse_status(Some(&json!(7))), IdeaStatus::Draft);
        assert_eq!(parse_status(None), IdeaStatus::Draft);
    }

    #[tokio::test]
    async fn test_list_accepts_bare_and_wrapped_arrays() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/idea", BASE),
            200,
            json!([{ "id": "1", "title": "A" }]),
        );
        let ideas = api(client).list("tok").await.unwrap();
        assert_eq!(ideas.len(), 1);

        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/idea", BASE),
            200,
            json!({ "data": [{ "id": "1" }, { "id": "2" }] }),
        );
        let ideas = api(client).list("tok").await.unwrap();
        assert_eq!(ideas.len(), 2);
    }

    #[tokio::test]
    async fn test_list_failure_is_none_not_empty() {
        let client = MockHttpClient::new();
        client.mock_network_failure(&format!("{}/api/idea", BASE));
        assert!(api(client).list("tok").await.is_none());

        let client = MockHttpClient::new();
        client.mock_response(&format!("{}/api/idea", BASE), 500, json!({}));
        assert!(api(client).list("tok").await.is_none());
    }

    #[tokio::test]
    async fn test_list_sets_timeout_and_bearer() {
        let client = MockHttpClient::new();
        client.mock_response(&format!("{}/api/idea", BASE), 200, json!([]));
        let api = api(client);
        api.list("tok123").await.unwrap();

        let requests = api.client.requests.borrow();
        assert_eq!(requests[0].timeout_ms, Some(IDEA_LIST_TIMEOUT_MS));
        assert_eq!(
            requests[0].headers.get("Authorization").map(String::as_str),
            Some("Bearer tok123")
        );
    }

    #[tokio::test]
    async fn test_update_retries_with_numeric_status_on_422() {
        let url = format!("{}/api/idea/7", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 422, json!({"detail": "invalid status"}));
        client.mock_response(&url, 200, json!({}));

        let api = api(client);
        let changes = UpdateIdea {
            status: Some(IdeaStatus::Active),
            ..Default::default()
        };
        assert!(api.update("tok", "7", &changes).await);

        let requests = api.client.requests.borrow();
        assert_eq!(requests.len(), 2);
        let first: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        let second: Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(first["status"], "ACTIVE");
        assert_eq!(second["status"], 1);
    }

    #[tokio::test]
    async fn test_update_without_status_does_not_retry() {
        let url = format!("{}/api/idea/7", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 422, json!({"detail": "bad title"}));

        let api = api(client);
        let changes = UpdateIdea {
            title: Some("x".to_string()),
            ..Default::default()
        };
        assert!(!api.update("tok", "7", &changes).await);
        assert_eq!(api.client.count_requests_to(&url), 1);
    }

    #[tokio::test]
    async fn test_autosave_patches_content_field() {
        let url = format!("{}/api/idea/7", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 200, json!({}));

        let api = api(client);
        assert!(api.autosave("tok", "7", "draft text").await);

        let requests = api.client.requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Patch);
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["content"], "draft text");
        assert!(body.get("raw_content").is_none());
    }
}
