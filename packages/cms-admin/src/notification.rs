//! Transient toast notifications.

use std::time::{Duration, Instant};

/// How long a toast stays up unless dismissed.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Queue of live toasts, oldest first.
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifications {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
            ttl,
        }
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message.into())
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message.into())
    }

    fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        match kind {
            ToastKind::Success => tracing::debug!(id, %message, "Success notification"),
            ToastKind::Error => tracing::debug!(id, %message, "Error notification"),
        }
        self.toasts.push(Toast {
            id,
            kind,
            message,
            raised_at: Instant::now(),
        });
        id
    }

    /// Remove one toast. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Drop every toast older than the TTL as of `now`.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts
            .retain(|t| now.saturating_duration_since(t.raised_at) < ttl);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn errors(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(|t| t.kind == ToastKind::Error)
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
