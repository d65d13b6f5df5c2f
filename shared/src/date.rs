//! 时间类型模块
//!
//! 提供两类能力：
//! - `Timestamp`: 可序列化的毫秒时间戳，用于排序与去抖判定
//! - ISO 8601 字符串的解析与月份投影（聚合统计用）
//!
//! 后端的 `created_at` 字段格式不完全统一（带/不带时区偏移，
//! 偶尔只有日期），解析入口统一在 [`parse`]，失败返回 `None`
//! 而不是报错，调用方把无法解析的时间视为"缺失"。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// =========================================================
// Timestamp - 可传输的时间戳类型
// =========================================================

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// 创建新的时间戳
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    /// 获取毫秒值
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// 获取秒值
    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

impl From<Timestamp> for i64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// =========================================================
// 当前时间
// =========================================================

/// 当前时间的毫秒时间戳
#[inline]
pub fn now() -> Timestamp {
    Timestamp(Utc::now().timestamp_millis())
}

/// 当前时间的 ISO 8601 字符串（乐观插入的消息用）
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 当前日历月份 (1-12)
pub fn current_month() -> u32 {
    Utc::now().month()
}

// =========================================================
// 解析
// =========================================================

/// 解析 ISO 8601 / RFC 3339 字符串为毫秒时间戳
///
/// 依次尝试：带偏移的完整时间、无偏移的本地时间（按 UTC 处理）、
/// 纯日期。全部失败返回 `None`。
pub fn parse(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp(dt.timestamp_millis()));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Timestamp(naive.and_utc().timestamp_millis()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let naive = date.and_hms_opt(0, 0, 0)?;
        return Some(Timestamp(naive.and_utc().timestamp_millis()));
    }
    None
}

/// 解析字符串并返回其日历月份 (1-12)
pub fn month_of(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.month());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.month());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.month());
    }
    None
}

// =========================================================
// 月份标签
// =========================================================

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 月份编号 (1-12) 转 3 字母缩写，越界返回空串
pub fn month_label(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        MONTH_LABELS[(month - 1) as usize]
    } else {
        ""
    }
}

// =========================================================
// 单元测试
// =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse("2025-06-12T10:30:00Z").unwrap();
        assert_eq!(ts.as_secs(), 1749724200);
        assert!(parse("2025-06-12T10:30:00+02:00").is_some());
    }

    #[test]
    fn test_parse_naive_datetime() {
        // FastAPI 常见输出：无偏移、带微秒
        assert!(parse("2025-06-12T10:30:00").is_some());
        assert!(parse("2025-06-12T10:30:00.123456").is_some());
    }

    #[test]
    fn test_parse_date_only() {
        assert!(parse("2025-06-12").is_some());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse("").is_none());
        assert!(parse("yesterday").is_none());
        assert!(parse("12/06/2025").is_none());
    }

    #[test]
    fn test_parse_ordering_matches_chronology() {
        let a = parse("2025-01-01T00:00:00Z").unwrap();
        let b = parse("2025-06-12T10:30:00Z").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_month_of() {
        assert_eq!(month_of("2025-06-12T10:30:00Z"), Some(6));
        assert_eq!(month_of("2025-12-01"), Some(12));
        assert_eq!(month_of("not a date"), None);
    }

    #[test]
    fn test_month_label_bounds() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "");
        assert_eq!(month_label(13), "");
    }
}
