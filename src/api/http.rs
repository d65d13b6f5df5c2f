//! HTTP 抽象层
//!
//! 所有客户端通过 [`HttpClient`] 发请求：生产实现走 gloo-net
//! 的 fetch 封装，测试里替换为 [`MockHttpClient`]。
//! 超时用 `AbortController` 实现，只有在请求显式设置
//! `timeout_ms` 时才挂接。

use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// 与传输实现无关的请求描述
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: Option<u32>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
            timeout_ms: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 挂接 Bearer 凭据
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    /// 设置 JSON 请求体（同时声明 Content-Type）
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self.with_header("Content-Type", "application/json")
    }

    pub fn with_timeout(mut self, ms: u32) -> Self {
        self.timeout_ms = Some(ms);
        self
    }
}

#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Shape(e.to_string()))
    }
}

#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 实现层: FetchClient
// =========================================================

/// 生产实现：浏览器 fetch（经 gloo-net）
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = RequestBuilder::new(&req.url).method(method);
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        // 超时：到点中止 fetch，控制权交还调用方
        let controller = web_sys::AbortController::new().ok();
        if let (Some(ms), Some(ctrl)) = (req.timeout_ms, controller.as_ref()) {
            builder = builder.abort_signal(Some(&ctrl.signal()));
            let ctrl = ctrl.clone();
            leptos::prelude::set_timeout(
                move || ctrl.abort(),
                std::time::Duration::from_millis(ms as u64),
            );
        }

        let request = match &req.body {
            Some(body) => builder
                .body(body.clone())
                .map_err(|e| ApiError::Network(format!("request build failed: {}", e)))?,
            None => builder
                .build()
                .map_err(|e| ApiError::Network(format!("request build failed: {}", e)))?,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("body read failed: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // URL -> 响应队列；队列只剩一条时重复应答，多条时依次弹出，
    // 以便脚本化 "422 后重试成功" 这类序列
    responses: std::cell::RefCell<HashMap<String, std::collections::VecDeque<(u16, String)>>>,
    // 模拟断网的 URL
    unreachable: std::cell::RefCell<std::collections::HashSet<String>>,
    /// 记录发出的请求，测试断言用
    pub requests: std::cell::RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: std::cell::RefCell::new(HashMap::new()),
            unreachable: std::cell::RefCell::new(std::collections::HashSet::new()),
            requests: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back((status, body.to_string()));
    }

    pub fn mock_network_failure(&self, url: &str) {
        self.unreachable.borrow_mut().insert(url.to_string());
    }

    /// 发往指定 URL 的请求数
    pub fn count_requests_to(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url == url).count()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        self.requests.borrow_mut().push(req.clone());

        if self.unreachable.borrow().contains(&req.url) {
            return Err(ApiError::Network("connection refused".to_string()));
        }

        let mut responses = self.responses.borrow_mut();
        if let Some(queue) = responses.get_mut(&req.url) {
            let (status, body) = if queue.len() > 1 {
                queue.pop_front().unwrap_or((404, "Not Found".to_string()))
            } else {
                queue
                    .front()
                    .cloned()
                    .unwrap_or((404, "Not Found".to_string()))
            };
            Ok(HttpResponse { status, body })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_replays_single_response() {
        let client = MockHttpClient::new();
        client.mock_response("http://x/a", 200, json!({"ok": true}));

        for _ in 0..3 {
            let res = client
                .send(HttpRequest::new("http://x/a", HttpMethod::Get))
                .await
                .unwrap();
            assert_eq!(res.status, 200);
        }
        assert_eq!(client.count_requests_to("http://x/a"), 3);
    }

    #[tokio::test]
    async fn test_mock_pops_sequenced_responses() {
        let client = MockHttpClient::new();
        client.mock_response("http://x/b", 422, json!({"detail": "bad status"}));
        client.mock_response("http://x/b", 200, json!({}));

        let first = client
            .send(HttpRequest::new("http://x/b", HttpMethod::Patch))
            .await
            .unwrap();
        let second = client
            .send(HttpRequest::new("http://x/b", HttpMethod::Patch))
            .await
            .unwrap();
        assert_eq!((first.status, second.status), (422, 200));
    }

    #[tokio::test]
    async fn test_mock_network_failure() {
        let client = MockHttpClient::new();
        client.mock_network_failure("http://down/");
        let err = client
            .send(HttpRequest::new("http://down/", HttpMethod::Get))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn test_request_builders() {
        let req = HttpRequest::new("http://x", HttpMethod::Post)
            .with_bearer("tok123")
            .with_body(json!({"a": 1}))
            .with_timeout(8_000);
        assert_eq!(
            req.headers.get("Authorization").map(String::as_str),
            Some("Bearer tok123")
        );
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(req.body.as_deref(), Some("{\"a\":1}"));
        assert_eq!(req.timeout_ms, Some(8_000));
    }
}
