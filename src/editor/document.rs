//! 编辑器内容的比较与回灌判断
//!
//! 文档在存储里可能是结构化 JSON 也可能是纯文本。外部内容到达
//! 时（进入页面、缓存恢复）要避免把编辑器刚保存的内容当新内容
//! 灌回去：序列化归一后相同就不动，保存在途时一律不动。

/// 归一化：去掉首尾空白；看起来是 JSON 对象/数组就重新序列化
/// （消掉缩进和键间空白的差异），解析不了就按纯文本处理。
pub fn normalize(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
            if let Ok(canonical) = serde_json::to_string(&value) {
                return canonical;
            }
        }
    }
    trimmed.to_string()
}

/// 外部内容是否应该灌进编辑器
pub fn should_apply(current: &str, incoming: &str, saving: bool) -> bool {
    if saving {
        return false;
    }
    normalize(current) != normalize(incoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonicalizes_json() {
        let spaced = "{ \"type\": \"doc\",  \"content\": [] }";
        let tight = "{\"type\":\"doc\",\"content\":[]}";
        assert_eq!(normalize(spaced), normalize(tight));
    }

    #[test]
    fn test_normalize_trims_plain_text() {
        assert_eq!(normalize("  some notes \n"), "some notes");
    }

    #[test]
    fn test_normalize_keeps_broken_json_as_text() {
        assert_eq!(normalize("{not json"), "{not json");
    }

    #[test]
    fn test_identical_content_is_not_reapplied() {
        let current = "{\"type\":\"doc\",\"content\":[]}";
        let incoming = "{ \"type\": \"doc\", \"content\": [] }";
        assert!(!should_apply(current, incoming, false));
    }

    #[test]
    fn test_changed_content_is_applied() {
        assert!(should_apply("old", "new", false));
    }

    #[test]
    fn test_nothing_applies_while_saving() {
        assert!(!should_apply("old", "new", true));
    }
}
