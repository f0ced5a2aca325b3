mod inmemory;
mod telegram;

pub use inmemory::{InMemoryDispatcher, SentMessage};
pub use telegram::TelegramDispatcher;
use teamdesk_domain::DispatchOutcome;
use tracing::warn;

/// Delivers a rendered message to chat handles
#[async_trait::async_trait]
pub trait IMessageDispatcher: Send + Sync {
    /// Sends `message` to every handle. A failing handle never stops
    /// delivery to the remaining ones.
    async fn send(&self, handles: &[String], message: &str) -> DispatchOutcome;
}

/// Used when no delivery channel is configured, every send fails
pub struct DisabledDispatcher {}

#[async_trait::async_trait]
impl IMessageDispatcher for DisabledDispatcher {
    async fn send(&self, handles: &[String], _message: &str) -> DispatchOutcome {
        warn!(
            "No notification channel is configured, dropping message for {} handle(s)",
            handles.len()
        );
        DispatchOutcome {
            success_count: 0,
            fail_count: handles.len(),
        }
    }
}
