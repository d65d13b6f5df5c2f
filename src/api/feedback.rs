//! 用户反馈上报

use crate::api::http::{HttpClient, HttpMethod, HttpRequest};
use crate::web::log::log_error;
use ideahub_shared::FeedbackRequest;

pub struct FeedbackApi<C: HttpClient> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> FeedbackApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn send(&self, token: &str, payload: &FeedbackRequest) -> bool {
        let body = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                log_error!("feedback payload unserializable: {}", e);
                return false;
            }
        };
        let req = HttpRequest::new(
            &format!("{}/api/feedback", self.base_url),
            HttpMethod::Post,
        )
        .with_bearer(token)
        .with_body(body);
        match self.client.send(req).await {
            Ok(res) => {
                if !res.ok() {
                    log_error!("feedback send returned {}", res.status);
                }
                res.ok()
            }
            Err(e) => {
                log_error!("feedback send failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::MockHttpClient;
    use ideahub_shared::FeedbackKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_send_serializes_kind_as_type() {
        let url = "http://localhost:8000/api/feedback";
        let client = MockHttpClient::new();
        client.mock_response(url, 200, json!({}));

        let api = FeedbackApi::new(client, "http://localhost:8000");
        let payload = FeedbackRequest {
            name: "Ana".to_string(),
            email: "a@example.com".to_string(),
            kind: FeedbackKind::Bug,
            message: "the chart overlaps".to_string(),
        };
        assert!(api.send("tok", &payload).await);

        let requests = api.client.requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["type"], "bug");
        assert!(body.get("kind").is_none());
    }
}
