use chrono::{
    DateTime,
    Duration,
    Local,
};
use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 50;
const MAX_LIFETIME_SECS: u64 = 24 * 60 * 60;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn destructive(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Notification {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

#[derive(Clone, Debug)]
pub struct Stamped {
    pub notification: Notification,
    pub at: DateTime<Local>,
}

/// Transient toasts plus a bounded history of everything emitted.
#[derive(Clone, Debug)]
pub struct NotificationCenter {
    history: VecDeque<Stamped>,
    lifetime: Duration,
    emitted: u64,
}

impl NotificationCenter {
    pub fn new(lifetime_secs: u64) -> Self {
        let secs = lifetime_secs.min(MAX_LIFETIME_SECS) as i64;
        NotificationCenter {
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            lifetime: Duration::seconds(secs),
            emitted: 0,
        }
    }

    pub fn push(&mut self, notification: Notification, at: DateTime<Local>) {
        self.history.push_back(Stamped { notification, at });
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.emitted += 1;
    }

    /// Toasts still within their lifetime, newest first.
    pub fn active(&self, now: DateTime<Local>) -> Vec<Stamped> {
        self.history
            .iter()
            .rev()
            .take_while(|s| now.signed_duration_since(s.at) < self.lifetime)
            .cloned()
            .collect()
    }

    /// Newest first.
    pub fn history(&self) -> Vec<Stamped> {
        self.history.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&Stamped> {
        self.history.back()
    }

    /// Total ever emitted, including entries evicted from the history.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn has_active(&self, now: DateTime<Local>) -> bool {
        self.latest()
            .is_some_and(|s| now.signed_duration_since(s.at) < self.lifetime)
    }
}
