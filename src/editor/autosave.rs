//! 自动保存的去抖与单飞控制
//!
//! 定时器本身在组件层（每次编辑排一个 set_timeout），这里只做
//! 纯状态判断：时间一律由调用方传入，逻辑可以直接在原生测试里
//! 走时间线。
//!
//! 规则：
//! - 尾沿去抖：距最后一次编辑满 `quiet_ms` 才算到期；
//! - 单飞：有保存在途时到期也不取，内容留在 pending，由保存
//!   完成后的补查接走；
//! - 每次保存携带整篇文档，后来的保存天然覆盖先前的。

pub const AUTOSAVE_QUIET_MS: i64 = 2_000;

#[derive(Debug)]
pub struct AutosaveController {
    quiet_ms: i64,
    last_edit: Option<i64>,
    pending: Option<String>,
    in_flight: bool,
}

impl AutosaveController {
    pub fn new(quiet_ms: i64) -> Self {
        Self {
            quiet_ms,
            last_edit: None,
            pending: None,
            in_flight: false,
        }
    }

    /// 记录一次编辑：重置静默窗口，最新内容覆盖 pending
    pub fn record_edit(&mut self, now: i64, content: String) {
        self.last_edit = Some(now);
        self.pending = Some(content);
    }

    /// 定时器到点时调用。满足静默期且没有在途保存才交出内容，
    /// 同时进入在途态。
    pub fn take_due(&mut self, now: i64) -> Option<String> {
        if self.in_flight {
            return None;
        }
        let last = self.last_edit?;
        if now - last < self.quiet_ms {
            return None;
        }
        let content = self.pending.take()?;
        self.last_edit = None;
        self.in_flight = true;
        Some(content)
    }

    /// 保存结束（无论成败）
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Default for AutosaveController {
    fn default() -> Self {
        Self::new(AUTOSAVE_QUIET_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rapid_edits_yield_one_save_with_last_content() {
        let mut ctl = AutosaveController::new(2_000);
        ctl.record_edit(0, "a".to_string());
        ctl.record_edit(500, "ab".to_string());
        ctl.record_edit(900, "abc".to_string());

        // 前两次编辑排的定时器到点时静默期未满
        assert_eq!(ctl.take_due(2_000), None);
        assert_eq!(ctl.take_due(2_500), None);
        // 最后一次编辑排的定时器拿到最终内容
        assert_eq!(ctl.take_due(2_900), Some("abc".to_string()));
        // 没有第二份
        ctl.finish();
        assert_eq!(ctl.take_due(10_000), None);
    }

    #[test]
    fn test_not_due_before_quiet_period() {
        let mut ctl = AutosaveController::new(2_000);
        ctl.record_edit(1_000, "x".to_string());
        assert_eq!(ctl.take_due(2_999), None);
        assert_eq!(ctl.take_due(3_000), Some("x".to_string()));
    }

    #[test]
    fn test_in_flight_blocks_new_save_but_keeps_pending() {
        let mut ctl = AutosaveController::new(2_000);
        ctl.record_edit(0, "v1".to_string());
        assert_eq!(ctl.take_due(2_000), Some("v1".to_string()));
        assert!(ctl.in_flight());

        // 在途期间继续编辑，到期也不开第二个保存
        ctl.record_edit(2_100, "v2".to_string());
        assert_eq!(ctl.take_due(4_200), None);

        // 保存结束后 pending 仍在，之后的到期检查能接走
        ctl.finish();
        assert_eq!(ctl.take_due(4_300), Some("v2".to_string()));
    }

    #[test]
    fn test_take_without_edits_is_noop() {
        let mut ctl = AutosaveController::new(2_000);
        assert_eq!(ctl.take_due(5_000), None);
    }

    #[test]
    fn test_failed_save_waits_for_next_edit() {
        let mut ctl = AutosaveController::new(2_000);
        ctl.record_edit(0, "v1".to_string());
        assert_eq!(ctl.take_due(2_000), Some("v1".to_string()));
        // 保存失败：不自动重试
        ctl.finish();
        assert_eq!(ctl.take_due(9_999), None);
        // 下一次编辑照常触发
        ctl.record_edit(10_000, "v2".to_string());
        assert_eq!(ctl.take_due(12_000), Some("v2".to_string()));
    }
}
