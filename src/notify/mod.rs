//! Outbound notification module
//!
//! Fire-and-forget alerts to the operator. Delivery failure is logged and
//! never aborts the cycle.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

/// Trait for notification channel implementations
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a plain-text alert; must not fail the caller
    async fn notify(&self, text: &str);
}

/// Notifier that drops everything (notifications disabled, tests)
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, text: &str) {
        tracing::debug!(text, "notification suppressed");
    }
}

/// Notifier that keeps every message in memory so callers can inspect
/// what was sent
#[derive(Default)]
pub struct RecordingNotifier {
    messages: std::sync::Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
    }
}
