//! Idea 集合与统计
//!
//! 统计是列表的纯投影，每次取数后整体重算、整体替换，不做增量
//! 维护。取数失败时既有状态原样保留。状态写穿到 LocalStorage，
//! 刷新页面后先用缓存摆出上次的数据，再在后台重取。

use crate::api::http::{FetchClient, HttpClient};
use crate::api::idea::{IdeaApi, UpdateIdea};
use crate::config::backend_url;
use crate::store::auth::{BrowserSession, SessionStore};
use crate::web::log::log_error;
use crate::web::storage::{BrowserCache, StateCache};
use ideahub_shared::date;
use ideahub_shared::{CreateIdeaRequest, Idea, IdeaStatus, STORAGE_IDEA};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

// =========================================================
// 状态与投影
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// 1-12
    pub month: u32,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaStats {
    pub idea_created: usize,
    pub idea_progress: usize,
    pub idea_finished: usize,
    pub created_this_month: usize,
    /// 按 created_at 的月份分桶，顺序是列表里首次出现的顺序
    pub monthly: Vec<MonthBucket>,
    /// 最近创建的三条（没有创建时间的不参与）
    pub recent: Vec<Idea>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaState {
    pub ideas: Vec<Idea>,
    pub stats: IdeaStats,
}

/// 列表 → 统计的纯投影。`current_month` 单独传入便于测试。
pub fn project_ideas(ideas: &[Idea], current_month: u32) -> IdeaStats {
    let mut stats = IdeaStats::default();

    for idea in ideas {
        match idea.status {
            IdeaStatus::Draft => stats.idea_created += 1,
            IdeaStatus::Active => stats.idea_progress += 1,
            IdeaStatus::Finished => stats.idea_finished += 1,
        }

        let month = idea.created_at.as_deref().and_then(date::month_of);
        if let Some(month) = month {
            if month == current_month {
                stats.created_this_month += 1;
            }
            match stats.monthly.iter_mut().find(|b| b.month == month) {
                Some(bucket) => bucket.count += 1,
                None => stats.monthly.push(MonthBucket {
                    month,
                    label: date::month_label(month).to_string(),
                    count: 1,
                }),
            }
        }
    }

    let mut dated: Vec<(i64, &Idea)> = ideas
        .iter()
        .filter_map(|idea| {
            let ts = idea.created_at.as_deref().and_then(date::parse)?;
            Some((ts.as_millis(), idea))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    stats.recent = dated.into_iter().take(3).map(|(_, idea)| idea.clone()).collect();

    stats
}

/// 编辑器本地回写：只改正文，不动统计
pub fn patch_content(state: &mut IdeaState, id: &str, content: &str) {
    if let Some(idea) = state
        .ideas
        .iter_mut()
        .find(|i| i.id.as_deref() == Some(id))
    {
        idea.raw_content = Some(content.to_string());
    }
}

// =========================================================
// 业务层
// =========================================================

pub struct IdeaService<C: HttpClient, K: StateCache> {
    api: IdeaApi<C>,
    cache: K,
}

impl<C: HttpClient, K: StateCache> IdeaService<C, K> {
    pub fn new(client: C, cache: K, base_url: &str) -> Self {
        Self {
            api: IdeaApi::new(client, base_url),
            cache,
        }
    }

    /// 上次持久化的状态，没有或读不回来就算没有
    pub fn cached(&self) -> Option<IdeaState> {
        let json = self.cache.read(STORAGE_IDEA)?;
        serde_json::from_str(&json).ok()
    }

    fn persist(&self, state: &IdeaState) {
        match serde_json::to_string(state) {
            Ok(json) => {
                self.cache.write(STORAGE_IDEA, &json);
            }
            Err(e) => log_error!("idea state not persisted: {}", e),
        }
    }

    /// 整体重取。失败返回 `None`，调用方保持现状。
    pub async fn refresh(&self, token: &str) -> Option<IdeaState> {
        let ideas = self.api.list(token).await?;
        let stats = project_ideas(&ideas, date::current_month());
        let state = IdeaState { ideas, stats };
        self.persist(&state);
        Some(state)
    }

    /// 创建成功后整体重取（服务端补全 id、分类、时间戳）
    pub async fn create(&self, token: &str, payload: &CreateIdeaRequest) -> Option<IdeaState> {
        self.api.create(token, payload).await?;
        self.refresh(token).await
    }

    /// 元数据更新成功后整体重取；两次编码都被拒时不发列表请求
    pub async fn update(&self, token: &str, id: &str, changes: &UpdateIdea) -> Option<IdeaState> {
        if !self.api.update(token, id, changes).await {
            return None;
        }
        self.refresh(token).await
    }

    /// 没有 id 的行是尚未落库的本地行，不发请求
    pub async fn delete(&self, token: &str, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.api.delete(token, id).await
    }

    /// 自动保存只打补丁，不触发列表重取
    pub async fn autosave(&self, token: &str, id: &str, content: &str) -> bool {
        self.api.autosave(token, id, content).await
    }

    pub async fn get(&self, token: &str, id: &str) -> Option<Idea> {
        self.api.get(token, id).await
    }
}

// =========================================================
// 信号层与组件胶水
// =========================================================

#[derive(Clone, Copy)]
pub struct IdeaContext {
    pub state: ReadSignal<IdeaState>,
    pub set_state: WriteSignal<IdeaState>,
    pub is_loading: RwSignal<bool>,
}

impl IdeaContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(IdeaState::default());
        Self {
            state,
            set_state,
            is_loading: RwSignal::new(false),
        }
    }
}

impl Default for IdeaContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_ideas() -> IdeaContext {
    use_context::<IdeaContext>().expect("IdeaContext should be provided")
}

fn browser_service() -> IdeaService<FetchClient, BrowserCache> {
    IdeaService::new(FetchClient, BrowserCache, backend_url())
}

/// 挂载时先用缓存摆数据
pub fn hydrate(ctx: &IdeaContext) {
    if let Some(state) = browser_service().cached() {
        ctx.set_state.set(state);
    }
}

pub async fn load_ideas(ctx: &IdeaContext) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    ctx.is_loading.set(true);
    let refreshed = browser_service().refresh(&token).await;
    ctx.is_loading.set(false);
    match refreshed {
        Some(state) => {
            ctx.set_state.set(state);
            true
        }
        None => false,
    }
}

pub async fn create_idea(ctx: &IdeaContext, payload: CreateIdeaRequest) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    match browser_service().create(&token, &payload).await {
        Some(state) => {
            ctx.set_state.set(state);
            true
        }
        None => false,
    }
}

pub async fn update_idea(ctx: &IdeaContext, id: String, changes: UpdateIdea) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    match browser_service().update(&token, &id, &changes).await {
        Some(state) => {
            ctx.set_state.set(state);
            true
        }
        None => false,
    }
}

/// 乐观删除：先从列表摘掉，成功后重取对账，失败重取还原
pub async fn delete_idea(ctx: &IdeaContext, id: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    ctx.set_state.update(|state| {
        state.ideas.retain(|i| i.id.as_deref() != Some(id.as_str()));
        state.stats = project_ideas(&state.ideas, date::current_month());
    });
    let service = browser_service();
    let deleted = service.delete(&token, &id).await;
    if let Some(state) = service.refresh(&token).await {
        ctx.set_state.set(state);
    }
    deleted
}

pub async fn autosave_idea(ctx: &IdeaContext, id: String, content: String) -> bool {
    let Some(token) = BrowserSession.token() else {
        return false;
    };
    let saved = browser_service().autosave(&token, &id, &content).await;
    if saved {
        ctx.set_state.update(|state| patch_content(state, &id, &content));
    }
    saved
}

/// 详情页按 id 单取，不经过列表状态
pub async fn fetch_idea(id: String) -> Option<Idea> {
    let token = BrowserSession.token()?;
    browser_service().get(&token, &id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::{HttpMethod, MockHttpClient};
    use crate::web::storage::tests::MockCache;
    use serde_json::json;

    const BASE: &str = "http://localhost:8000";

    fn idea(id: &str, status: IdeaStatus, created_at: Option<&str>) -> Idea {
        Idea {
            id: Some(id.to_string()),
            title: format!("idea {}", id),
            status,
            created_at: created_at.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_counts_sum_to_list_length() {
        let ideas = vec![
            idea("1", IdeaStatus::Draft, None),
            idea("2", IdeaStatus::Active, None),
            idea("3", IdeaStatus::Active, None),
            idea("4", IdeaStatus::Finished, None),
        ];
        let stats = project_ideas(&ideas, 6);
        assert_eq!(stats.idea_created, 1);
        assert_eq!(stats.idea_progress, 2);
        assert_eq!(stats.idea_finished, 1);
        assert_eq!(
            stats.idea_created + stats.idea_progress + stats.idea_finished,
            ideas.len()
        );
    }

    #[test]
    fn test_monthly_buckets_keep_first_occurrence_order() {
        let ideas = vec![
            idea("1", IdeaStatus::Draft, Some("2025-06-12T10:30:00Z")),
            idea("2", IdeaStatus::Draft, Some("2025-03-01T00:00:00Z")),
            idea("3", IdeaStatus::Draft, Some("2025-06-20T08:00:00Z")),
            idea("4", IdeaStatus::Draft, None),
        ];
        let stats = project_ideas(&ideas, 6);
        let months: Vec<(u32, usize)> =
            stats.monthly.iter().map(|b| (b.month, b.count)).collect();
        assert_eq!(months, vec![(6, 2), (3, 1)]);
        assert_eq!(stats.monthly[0].label, "Jun");
        assert_eq!(stats.created_this_month, 2);
    }

    #[test]
    fn test_recent_takes_three_newest_dated() {
        let ideas = vec![
            idea("old", IdeaStatus::Draft, Some("2025-01-01T00:00:00Z")),
            idea("undated", IdeaStatus::Draft, None),
            idea("a", IdeaStatus::Draft, Some("2025-06-01T00:00:00Z")),
            idea("b", IdeaStatus::Draft, Some("2025-06-02T00:00:00Z")),
            idea("c", IdeaStatus::Draft, Some("2025-06-03T00:00:00Z")),
        ];
        let stats = project_ideas(&ideas, 6);
        let ids: Vec<&str> = stats
            .recent
            .iter()
            .filter_map(|i| i.id.as_deref())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_patch_content_only_touches_target_row() {
        let mut state = IdeaState {
            ideas: vec![idea("1", IdeaStatus::Draft, None), idea("2", IdeaStatus::Draft, None)],
            stats: IdeaStats::default(),
        };
        let before = state.stats.clone();
        patch_content(&mut state, "2", "new text");
        assert_eq!(state.ideas[0].raw_content, None);
        assert_eq!(state.ideas[1].raw_content.as_deref(), Some("new text"));
        assert_eq!(state.stats, before);
    }

    #[tokio::test]
    async fn test_refresh_persists_state() {
        let client = MockHttpClient::new();
        client.mock_response(
            &format!("{}/api/idea", BASE),
            200,
            json!([{ "id": "1", "title": "A", "status": "ACTIVE" }]),
        );
        let service = IdeaService::new(client, MockCache::new(), BASE);

        let state = service.refresh("tok").await.unwrap();
        assert_eq!(state.ideas.len(), 1);
        assert_eq!(state.stats.idea_progress, 1);

        // 写穿缓存能原样读回
        assert_eq!(service.cached(), Some(state));
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_cache_alone() {
        let client = MockHttpClient::new();
        client.mock_network_failure(&format!("{}/api/idea", BASE));
        let cached = serde_json::to_string(&IdeaState::default()).unwrap();
        let service =
            IdeaService::new(client, MockCache::new().with_entry(STORAGE_IDEA, &cached), BASE);

        assert!(service.refresh("tok").await.is_none());
        assert_eq!(service.cached(), Some(IdeaState::default()));
    }

    #[tokio::test]
    async fn test_update_retry_then_refresh_sequence() {
        let patch_url = format!("{}/api/idea/7", BASE);
        let list_url = format!("{}/api/idea", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&patch_url, 422, json!({"detail": "numeric only"}));
        client.mock_response(&patch_url, 200, json!({}));
        client.mock_response(&list_url, 200, json!([]));

        let service = IdeaService::new(client, MockCache::new(), BASE);
        let changes = UpdateIdea {
            status: Some(IdeaStatus::Finished),
            ..Default::default()
        };
        assert!(service.update("tok", "7", &changes).await.is_some());

        let requests = service.api.client.requests.borrow();
        let trace: Vec<(HttpMethod, &str)> =
            requests.iter().map(|r| (r.method, r.url.as_str())).collect();
        assert_eq!(
            trace,
            vec![
                (HttpMethod::Patch, patch_url.as_str()),
                (HttpMethod::Patch, patch_url.as_str()),
                (HttpMethod::Get, list_url.as_str()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_failure_skips_refresh() {
        let patch_url = format!("{}/api/idea/7", BASE);
        let list_url = format!("{}/api/idea", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&patch_url, 422, json!({}));
        client.mock_response(&patch_url, 422, json!({}));

        let service = IdeaService::new(client, MockCache::new(), BASE);
        let changes = UpdateIdea {
            status: Some(IdeaStatus::Finished),
            ..Default::default()
        };
        assert!(service.update("tok", "7", &changes).await.is_none());
        assert_eq!(service.api.client.count_requests_to(&list_url), 0);
    }

    #[tokio::test]
    async fn test_delete_without_id_stays_local() {
        let service = IdeaService::new(MockHttpClient::new(), MockCache::new(), BASE);
        assert!(!service.delete("tok", "").await);
        assert!(service.api.client.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_autosave_does_not_refresh() {
        let patch_url = format!("{}/api/idea/7", BASE);
        let list_url = format!("{}/api/idea", BASE);
        let client = MockHttpClient::new();
        client.mock_response(&patch_url, 200, json!({}));

        let service = IdeaService::new(client, MockCache::new(), BASE);
        assert!(service.autosave("tok", "7", "text").await);
        assert_eq!(service.api.client.count_requests_to(&list_url), 0);
    }
}
