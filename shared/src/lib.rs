use serde::{Deserialize, Serialize};

pub mod date;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话 Cookie 名称
pub const COOKIE_TOKEN: &str = "token";
/// 会话 Cookie 有效期（秒）
pub const COOKIE_MAX_AGE_SECS: i64 = 3600;

// LocalStorage 键：各 Store 的写穿缓存
pub const STORAGE_AUTH: &str = "auth-storage";
pub const STORAGE_IDEA: &str = "idea-storage";
pub const STORAGE_ROADMAP: &str = "roadmap-storage";
pub const STORAGE_CHAT: &str = "chat-storage";

/// 每个创意首条聊天消息的一次性标记前缀
pub const SEEDED_CHAT_PREFIX: &str = "seeded_initial_chat_";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 创意生命周期状态
///
/// 后端对该字段的编码不统一：列表接口可能返回数字 (0/1/2)
/// 或英文代码字符串 ("DRAFT" 等)。解析入口统一走
/// [`IdeaStatus::from_code`] / [`IdeaStatus::from_number`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdeaStatus {
    #[default]
    Draft,
    Active,
    Finished,
}

impl IdeaStatus {
    /// 英文代码编码（主要线上编码）
    pub fn as_code(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "DRAFT",
            IdeaStatus::Active => "ACTIVE",
            IdeaStatus::Finished => "FINISHED",
        }
    }

    /// 数字编码（兼容旧接口）
    pub fn as_number(&self) -> u8 {
        match self {
            IdeaStatus::Draft => 0,
            IdeaStatus::Active => 1,
            IdeaStatus::Finished => 2,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "DRAFT" | "0" => Some(IdeaStatus::Draft),
            "ACTIVE" | "1" => Some(IdeaStatus::Active),
            "FINISHED" | "2" => Some(IdeaStatus::Finished),
            _ => None,
        }
    }

    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            0 => Some(IdeaStatus::Draft),
            1 => Some(IdeaStatus::Active),
            2 => Some(IdeaStatus::Finished),
            _ => None,
        }
    }

    /// 界面展示文案
    pub fn label(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "Draft",
            IdeaStatus::Active => "In progress",
            IdeaStatus::Finished => "Finished",
        }
    }
}

/// 用户身份。未登录时各字段为空字符串，从不缺省为 null。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserIdentity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Idea {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: IdeaStatus,
    #[serde(default)]
    pub ai_classification: String,
    #[serde(default)]
    pub raw_content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 新建创意的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdeaRequest {
    pub title: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Roadmap {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub idea_id: String,
    #[serde(default)]
    pub exported_to: String,
    #[serde(default)]
    pub generated_at: String,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoadmapStep {
    #[serde(default)]
    pub step_order: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<RoadmapTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RoadmapTask {
    #[serde(default)]
    pub task_order: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suggested_tools: Vec<String>,
}

/// 消息发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sender {
    #[default]
    Ai,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChatMessage {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Chat {
    #[serde(default)]
    pub idea_id: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// 用户反馈类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Bug,
    Feedback,
    Sponsor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub message: String,
}

// =========================================================
// 单元测试
// =========================================================
