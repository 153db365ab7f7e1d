use std::time::Duration;

use serde::Serialize;

/// 提示自动消失的时间
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// 短暂显示、自动消失的提示，不会阻塞操作
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub ttl_ms: u64,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            ttl_ms: NOTICE_TTL.as_millis() as u64,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_auto_dismiss_after_five_seconds() {
        let notice = Notice::warning("Product removed");
        assert_eq!(notice.ttl_ms, 5_000);

        let json = serde_json::to_value(Notice::new(NoticeLevel::Danger, "Failed to load products")).unwrap();
        assert_eq!(json["level"], "danger");
        assert_eq!(json["ttlMs"], 5_000);
    }
}
