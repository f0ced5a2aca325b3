use super::IMessageDispatcher;
use std::sync::Mutex;
use teamdesk_domain::DispatchOutcome;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub handle: String,
    pub message: String,
}

/// Keeps every delivered message in memory, handles registered
/// with `fail_for` are reported as failed.
pub struct InMemoryDispatcher {
    sent: Mutex<Vec<SentMessage>>,
    failing_handles: Mutex<Vec<String>>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_handles: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_for(&self, handle: &str) {
        self.failing_handles.lock().unwrap().push(handle.to_string());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMessageDispatcher for InMemoryDispatcher {
    async fn send(&self, handles: &[String], message: &str) -> DispatchOutcome {
        let failing_handles = self.failing_handles.lock().unwrap().clone();
        let mut outcome = DispatchOutcome::default();
        for handle in handles {
            if failing_handles.contains(handle) {
                outcome.fail_count += 1;
                continue;
            }
            self.sent.lock().unwrap().push(SentMessage {
                handle: handle.clone(),
                message: message.to_string(),
            });
            outcome.success_count += 1;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failing_handle_does_not_stop_other_sends() {
        let dispatcher = InMemoryDispatcher::new();
        dispatcher.fail_for("2");

        let handles = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let outcome = dispatcher.send(&handles, "hello").await;

        assert_eq!(
            outcome,
            DispatchOutcome {
                success_count: 2,
                fail_count: 1
            }
        );
        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].handle, "3");
    }
}
