//! Roadmap 集合
//!
//! 聚合只有一个：已生成的 roadmap 总数，恒等于列表长度。
//! 生成请求成功后整体重取，让新 roadmap 立即出现在面板里。

use crate::api::http::{FetchClient, HttpClient};
use crate::api::roadmap::RoadmapApi;
use crate::config::backend_url;
use crate::store::auth::{BrowserSession, SessionStore};
use crate::web::log::log_error;
use crate::web::storage::{BrowserCache, StateCache};
use ideahub_shared::{Roadmap, STORAGE_ROADMAP};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoadmapState {
    pub roadmaps: Vec<Roadmap>,
    pub created_roadmap: usize,
}

impl RoadmapState {
    pub fn from_list(roadmaps: Vec<Roadmap>) -> Self {
        let created_roadmap = roadmaps.len();
        Self {
            roadmaps,
            created_roadmap,
        }
    }
}

pub fn roadmaps_for_idea<'a>(roadmaps: &'a [Roadmap], idea_id: &str) -> Vec<&'a Roadmap> {
    roadmaps.iter().filter(|r| r.idea_id == idea_id).collect()
}

// =========================================================
// 业务层
// =========================================================

pub struct RoadmapService<C: HttpClient, K: StateCache> {
    api: RoadmapApi<C>,
    cache: K,
}

impl<C: HttpClient, K: StateCache> RoadmapService<C, K> {
    pub fn new(client: C, cache: K, base_url: &str) -> Self {
        Self {
            api: RoadmapApi::new(client, base_url),
            cache,
        }
    }

    pub fn cached(&self) -> Option<RoadmapState> {
        let json = self.cache.read(STORAGE_ROADMAP)?;
        serde_json::from_str(&json).ok()
    }

    fn persist(&self, state: &RoadmapState) {
        match serde_json::to_string(state) {
            Ok(json) => {
                self.cache.write(STORAGE_ROADMAP, &json);
            }
            Err(e) => log_error!("roadmap state not persisted: {}", e),
        }
    }

    pub async fn refresh(&self, token: &str) -> Option<RoadmapState> {
        let roadmaps = self.api.list(token).await?;
        let state = RoadmapState::from_list(roadmaps);
        self.persist(&state);
        Some(state)
    }

    pub async fn create(
        &self,
        token: &str,
        idea_id: &str,
        exported_to: &str,
    ) -> Option<RoadmapState> {
        if !self.api.create(token, idea_id, exported_to).await {
            return None;
        }
        self.refresh(token).await
    }
}

// =========================================================
// 信号层与组件胶水
// =========================================================

#[derive(Clone, Copy)]
pub struct RoadmapContext {
    pub state: ReadSignal<RoadmapState>,
    pub set_state: WriteSignal<RoadmapState>,
    /// 生成请求在途（生成要等 AI，给按钮一个忙碌态）
    pub is_generating: RwSignal<bool>,
}

impl RoadmapContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(RoadmapState::default());
        Self {
            state,
            set_state,
            is_generating: RwSignal::new(false),
        }
    }
}

impl Default for RoadmapContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_roadmaps() -> RoadmapContext {
    use_context::<RoadmapContext>().expect("RoadmapContext should be provided")
}

fn browser_service() -> RoadmapService<FetchClient, BrowserCache> {
    RoadmapService::new(FetchClient, BrowserCache, backend_url())
}

pub fn hydrate(ctx: &RoadmapContext) {
    if let Some(state) = browser_service().cached() {
        ctx.set_state.set(state);
    }
}

pub async fn load_roadmaps(ctx: &RoadmapContext) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    match browser_service().refresh(&token).await {
        Some(state) => {
            ctx.set_state.set(state);
            true
        }
        None => false,
    }
}

pub async fn create_roadmap(ctx: &RoadmapContext, idea_id: String, exported_to: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    ctx.is_generating.set(true);
    let created = browser_service().create(&token, &idea_id, &exported_to).await;
    ctx.is_generating.set(false);
    match created {
        Some(state) => {
            ctx.set_state.set(state);
            true
        }
        None => false,
    }
}

/// 注销时清空，roadmap 属于账号数据不留给下一个会话
pub fn clear(ctx: &RoadmapContext) {
    ctx.set_state.set(RoadmapState::default());
    crate::web::storage::LocalStorage::delete(STORAGE_ROADMAP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::{HttpMethod, MockHttpClient};
    use crate::web::storage::tests::MockCache;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    #[tokio::test]
    async fn test_refresh_counts_and_persists() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/roadmap", BASE),
            200,
            json!([
                { "id": "r1", "idea_id": "7" },
                { "id": "r2", "idea_id": "8" }
            ]),
        );
        let service = RoadmapService::new(client, MockCache::new(), BASE);

        let state = service.refresh("tok").await.unwrap();
        assert_eq!(state.created_roadmap, state.roadmaps.len());
        assert_eq!(state.created_roadmap, 2);
        assert_eq!(service.cached(), Some(state));
    }

    #[tokio::test]
    async fn test_create_then_refresh_sequence() {
        let create_url = format!("{}/api/roadmap/7", BASE);
        let list_url = format!("{}/api/roadmap", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&create_url, 200, json!({}));
        client.mock_response(&list_url, 200, json!([{ "id": "r1", "idea_id": "7" }]));

        let service = RoadmapService::new(client, MockCache::new(), BASE);
        let state = service.create("tok", "7", "trello").await.unwrap();
        assert_eq!(state.created_roadmap, 1);

        let requests = service.api.client.requests.borrow();
        let trace: Vec<HttpMethod> = requests.iter().map(|r| r.method).collect();
        assert_eq!(trace, vec![HttpMethod::Post, HttpMethod::Get]);
    }

    #[tokio::test]
    async fn test_create_failure_skips_refresh() {
        let create_url = format!("{}/api/roadmap/7", BASE);
        let list_url = format!("{}/api/roadmap", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&create_url, 500, json!({}));

        let service = RoadmapService::new(client, MockCache::new(), BASE);
        assert!(service.create("tok", "7", "trello").await.is_none());
        assert_eq!(service.api.client.count_requests_to(&list_url), 0);
    }

    #[test]
    fn test_roadmaps_for_idea_filters() {
        let roadmaps = vec![
            Roadmap {
                idea_id: "7".to_string(),
                ..Default::default()
            },
            Roadmap {
                idea_id: "8".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(roadmaps_for_idea(&roadmaps, "7").len(), 1);
        assert!(roadmaps_for_idea(&roadmaps, "9").is_empty());
    }
}
