//! Roadmap 接口客户端

use crate::api::http::{HttpClient, HttpMethod, HttpRequest};
use crate::web::log::log_error;
use ideahub_shared::Roadmap;
use serde_json::{json, Value};

pub struct RoadmapApi<C: HttpClient> {
    pub(crate) client: C,
    base_url: String,
}

impl<C: HttpClient> RoadmapApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list(&self, token: &str) -> Option<Vec<Roadmap>> {
        let req =
            HttpRequest::new(&self.url("/api/roadmap"), HttpMethod::Get).with_bearer(token);
        let res = match self.client.send(req).await {
            Ok(res) => res,
            Err(e) => {
                log_error!("roadmap list failed: {}", e);
                return None;
            }
        };
        if !res.ok() {
            log_error!("roadmap list returned {}", res.status);
            return None;
        }
        let body: Value = res.json().ok()?;
        let rows = match &body {
            Value::Array(_) => body.clone(),
            _ => body.get("data").cloned().unwrap_or(Value::Array(vec![])),
        };
        match serde_json::from_value(rows) {
            Ok(roadmaps) => Some(roadmaps),
            Err(e) => {
                log_error!("roadmap list unreadable: {}", e);
                None
            }
        }
    }

    /// 为某个 idea 生成 roadmap。生成内容由后端异步产出，
    /// 这里只报成功与否，列表随后整体重取。
    pub async fn create(&self, token: &str, idea_id: &str, exported_to: &str) -> bool {
        let req = HttpRequest::new(
            &self.url(&format!("/api/roadmap/{}", idea_id)),
            HttpMethod::Post,
        )
        .with_bearer(token)
        .with_body(json!({ "exported_to": exported_to }));
        match self.client.send(req).await {
            Ok(res) => {
                if !res.ok() {
                    log_error!("roadmap create returned {}", res.status);
                }
                res.ok()
            }
            Err(e) => {
                log_error!("roadmap create failed: {}", e);
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
    async fn test_list_parses_wrapped_rows() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/roadmap", BASE),
            200,
            json!({ "data": [{
                "id": "r1",
                "idea_id": "7",
                "exported_to": "notion",
                "steps": [{
                    "step_order": 1,
                    "title": "Phase 1",
                    "description": "validate",
                    "tasks": [{ "task_order": 1, "description": "Sketch the flows" }]
                }]
            }] }),
        );
        let api = RoadmapApi::new(client, BASE);
        let roadmaps = api.list("tok").await.unwrap();
        assert_eq!(roadmaps.len(), 1);
        assert_eq!(roadmaps[0].steps[0].tasks[0].description, "Sketch the flows");
    }

    #[tokio::test]
    async fn test_create_posts_export_target() {
        let url = format!("{}/api/roadmap/7", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&url, 200, json!({}));

        let api = RoadmapApi::new(client, BASE);
        assert!(api.create("tok", "7", "notion").await);

        let requests = api.client.requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["exported_to"], "notion");
    }

    #[tokio::test]
    async fn test_list_failure_is_none() {
        let client = MockHttpClient::new();
        client.mock_network_failure(&format!("{}/api/roadmap", BASE));
        assert!(RoadmapApi::new(client, BASE).list("tok").await.is_none());
    }
}
