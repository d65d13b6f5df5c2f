//! 认证接口客户端
//!
//! 登录响应的字段布局在各环境间并不稳定（有无 `data` 包装、
//! token 字段名、用户信息嵌套层级都见过不同版本），这里集中做
//! 一次规整，store 层只消费 [`LoginPayload`]。

use crate::api::http::{HttpClient, HttpMethod, HttpRequest};
use crate::error::{ApiError, ApiResult};
use serde_json::{json, Value};

/// 规整后的登录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPayload {
    pub access_token: String,
    pub name: String,
    pub email: String,
    pub first_login: bool,
}

pub struct AuthApi<C: HttpClient> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> AuthApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginPayload> {
        let req = HttpRequest::new(&self.url("/auth/login"), HttpMethod::Post)
            .with_body(json!({ "email": email, "password": password }));
        let res = self.client.send(req).await?;
        if !res.ok() {
            return Err(login_error(res.status, &res.body));
        }
        let body: Value = res.json()?;
        normalize_login(&body)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> ApiResult<()> {
        let req = HttpRequest::new(&self.url("/auth/register"), HttpMethod::Post)
            .with_body(json!({ "name": name, "email": email, "password": password }));
        let res = self.client.send(req).await?;
        if !res.ok() {
            return Err(ApiError::from_status(res.status, extract_detail(&res.body)));
        }
        Ok(())
    }

    /// 校验已有 token 是否仍有效。
    ///
    /// `Ok(false)` 表示服务端明确拒绝；网络或服务端故障走 `Err`，
    /// 调用方据此区分 "token 失效" 和 "暂时联系不上"。
    pub async fn validate(&self, token: &str) -> ApiResult<bool> {
        let req =
            HttpRequest::new(&self.url("/auth/validate"), HttpMethod::Get).with_bearer(token);
        let res = self.client.send(req).await?;
        if res.status == 401 || res.status == 403 {
            return Ok(false);
        }
        if !res.ok() {
            return Err(ApiError::from_status(res.status, extract_detail(&res.body)));
        }
        let body: Value = res.json()?;
        Ok(body.get("valid").and_then(Value::as_bool).unwrap_or(false))
    }
}

/// 登录失败的分类，文案直接面向用户
fn login_error(status: u16, body: &str) -> ApiError {
    match status {
        400 => ApiError::Validation("User not found".to_string()),
        401 | 422 => ApiError::Auth("Invalid email or password".to_string()),
        _ => ApiError::from_status(status, extract_detail(body)),
    }
}

/// FastAPI 风格的错误体带 `detail` 字段，取不到就退回原始文本
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// 逐个候选位置探测，取第一个存在且非 null 的字符串。
/// 对应原始约定：只有缺失/null 才继续往后找。
fn probe_str(candidates: &[Option<&Value>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| c.filter(|v| !v.is_null()))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// 把任意已知形状的登录响应规整为 [`LoginPayload`]。
///
/// 探测顺序：
/// - 有 `data` 对象包装则先解开；
/// - `access_token` ← `access_token` | `token`（必需）；
/// - `name` ← `name` | `user.name` | `data.name` | `user.username`；
/// - `email` ← `email` | `user.email` | `data.email`；
/// - `first_login` 缺省为 false。
///
/// name 和 email 都解析不出来视为响应形状错误。
pub fn normalize_login(body: &Value) -> ApiResult<LoginPayload> {
    let root = match body.get("data") {
        Some(data) if data.is_object() => data,
        _ => body,
    };

    let access_token = probe_str(&[root.get("access_token"), root.get("token")])
        .ok_or_else(|| ApiError::Shape("login response has no access token".to_string()))?;

    let name = probe_str(&[
        root.get("name"),
        root.pointer("/user/name"),
        body.pointer("/data/name"),
        root.pointer("/user/username"),
    ]);
    let email = probe_str(&[
        root.get("email"),
        root.pointer("/user/email"),
        body.pointer("/data/email"),
    ]);

    if name.is_none() && email.is_none() {
        return Err(ApiError::Shape(
            "login response has neither name nor email".to_string(),
        ));
    }

    Ok(LoginPayload {
        access_token,
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        first_login: root
            .get("first_login")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::MockHttpClient;
    use serde_json::json;

    fn api(client: MockHttpClient) -> AuthApi<MockHttpClient> {
        AuthApi::new(client, "http://localhost:8000")
    }

    #[test]
    fn test_normalize_flat_shape() {
        let payload = normalize_login(&json!({
            "access_token": "tok123",
            "name": "Ana Silva",
            "email": "a@example.com"
        }))
        .unwrap();
        assert_eq!(payload.access_token, "tok123");
        assert_eq!(payload.name, "Ana Silva");
        assert_eq!(payload.email, "a@example.com");
        assert!(!payload.first_login);
    }

    #[test]
    fn test_normalize_data_wrapper() {
        let payload = normalize_login(&json!({
            "data": {
                "token": "tok123",
                "name": "Ana Silva",
                "email": "a@example.com",
                "first_login": true
            }
        }))
        .unwrap();
        assert_eq!(payload.access_token, "tok123");
        assert_eq!(payload.name, "Ana Silva");
        assert!(payload.first_login);
    }

    #[test]
    fn test_normalize_nested_user() {
        let payload = normalize_login(&json!({
            "access_token": "tok123",
            "user": { "username": "ana", "email": "a@example.com" }
        }))
        .unwrap();
        assert_eq!(payload.name, "ana");
        assert_eq!(payload.email, "a@example.com");
    }

    #[test]
    fn test_normalize_all_shapes_agree() {
        let flat = normalize_login(&json!({
            "access_token": "t", "name": "N", "email": "e@x.com"
        }))
        .unwrap();
        let wrapped = normalize_login(&json!({
            "data": { "access_token": "t", "name": "N", "email": "e@x.com" }
        }))
        .unwrap();
        let nested = normalize_login(&json!({
            "access_token": "t", "user": { "name": "N", "email": "e@x.com" }
        }))
        .unwrap();
        assert_eq!(flat, wrapped);
        assert_eq!(flat, nested);
    }

    #[test]
    fn test_normalize_requires_token() {
        let err = normalize_login(&json!({ "name": "N", "email": "e@x.com" })).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }

    #[test]
    fn test_normalize_requires_name_or_email() {
        let err = normalize_login(&json!({ "access_token": "t" })).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
        // 只有一项也算可用
        let ok = normalize_login(&json!({ "access_token": "t", "email": "e@x.com" })).unwrap();
        assert_eq!(ok.name, "");
        assert_eq!(ok.email, "e@x.com");
    }

    #[tokio::test]
    async fn test_login_classifies_failures() {
        let client = MockHttpClient::new();
        client.mock_response(
            "http://localhost:8000/auth/login",
            400,
            json!({"detail": "no such user"}),
        );
        let err = api(client).login("a@example.com", "pw").await.unwrap_err();
        assert_eq!(err, ApiError::Validation("User not found".to_string()));

        let client = MockHttpClient::new();
        client.mock_response(
            "http://localhost:8000/auth/login",
            401,
            json!({"detail": "nope"}),
        );
        let err = api(client).login("a@example.com", "pw").await.unwrap_err();
        assert_eq!(err, ApiError::Auth("Invalid email or password".to_string()));
    }

    #[tokio::test]
    async fn test_login_network_failure_is_network_error() {
        let client = MockHttpClient::new();
        client.mock_network_failure("http://localhost:8000/auth/login");
        let err = api(client).login("a@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(
            err.user_message(),
            "Unable to reach the server. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_validate_distinguishes_invalid_from_unreachable() {
        let client = MockHttpClient::new();
        client.mock_response("http://localhost:8000/auth/validate", 401, json!({}));
        assert_eq!(api(client).validate("tok").await.unwrap(), false);

        let client = MockHttpClient::new();
        client.mock_response("http://localhost:8000/auth/validate", 200, json!({"valid": true}));
        assert_eq!(api(client).validate("tok").await.unwrap(), true);

        let client = MockHttpClient::new();
        client.mock_network_failure("http://localhost:8000/auth/validate");
        assert!(api(client).validate("tok").await.is_err());
    }

    #[tokio::test]
    async fn test_login_sends_credentials_as_json() {
        let client = MockHttpClient::new();
        client.mock_response(
            "http://localhost:8000/auth/login",
            200,
            json!({"access_token": "t", "email": "a@example.com"}),
        );
        let api = api(client);
        api.login("a@example.com", "Secret1!").await.unwrap();

        let requests = api.client.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@example.com");
        assert_eq!(body["password"], "Secret1!");
    }
}
