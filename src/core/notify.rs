//! # Notifications
//!
//! The fire-and-forget "toast" collaborator. Components report outcomes
//! through the [`Notifier`] trait and never look at what happens next.
//! [`ToastQueue`] is the in-app implementation rendered by the TUI.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::info;

pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub created_at: Instant,
}

/// Bounded queue of recent toasts with a fixed time-to-live.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

impl ToastQueue {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(4);
    const CAPACITY: usize = 4;

    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
            capacity: Self::CAPACITY,
        }
    }

    fn push(&mut self, level: ToastLevel, message: &str) {
        if self.toasts.len() == self.capacity {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message: message.to_string(),
            created_at: Instant::now(),
        });
    }

    /// Drop toasts older than the TTL. Returns true if anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
        self.toasts.len() != before
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Notifier for ToastQueue {
    fn notify_success(&mut self, message: &str) {
        info!("Toast (success): {}", message);
        self.push(ToastLevel::Success, message);
    }

    fn notify_error(&mut self, message: &str) {
        info!("Toast (error): {}", message);
        self.push(ToastLevel::Error, message);
    }
}
