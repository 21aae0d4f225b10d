// 🔔 Notices - transient messages for the user, auto-dismissed

use std::time::{Duration, Instant};

/// How long a notice stays visible
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    queue: Vec<Notice>,
}

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Notices {
            ttl,
            queue: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, level: NoticeLevel, now: Instant) {
        self.queue.push(Notice {
            message: message.into(),
            level,
            shown_at: now,
        });
    }

    /// Latest notice, while it is still within its TTL
    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.queue
            .last()
            .filter(|notice| now.saturating_duration_since(notice.shown_at) < self.ttl)
    }

    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.queue
            .retain(|notice| now.saturating_duration_since(notice.shown_at) < ttl);
    }

    /// Everything pushed and not yet pruned, oldest first
    pub fn pending(&self) -> &[Notice] {
        &self.queue
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut notices = Notices::default();
        let t0 = Instant::now();

        notices.push("Quotes imported successfully!", NoticeLevel::Success, t0);

        assert!(notices.current(t0 + Duration::from_secs(4)).is_some());
        assert!(notices.current(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_latest_notice_wins() {
        let mut notices = Notices::default();
        let t0 = Instant::now();

        notices.push("first", NoticeLevel::Info, t0);
        notices.push("second", NoticeLevel::Error, t0 + Duration::from_secs(1));

        let current = notices.current(t0 + Duration::from_secs(2)).unwrap();
        assert_eq!(current.message, "second");
        assert_eq!(current.level, NoticeLevel::Error);
    }

    #[test]
    fn test_prune_drops_expired() {
        let mut notices = Notices::new(Duration::from_secs(5));
        let t0 = Instant::now();

        notices.push("old", NoticeLevel::Info, t0);
        notices.push("new", NoticeLevel::Info, t0 + Duration::from_secs(4));
        notices.prune(t0 + Duration::from_secs(6));

        assert_eq!(notices.pending().len(), 1);
        assert_eq!(notices.pending()[0].message, "new");
    }
}
