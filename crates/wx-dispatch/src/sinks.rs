use crate::{DispatchError, NotificationEnvelope, NotificationSink};
use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

/// Logs each envelope as JSON instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

#[async_trait]
impl NotificationSink for LoggingSink {
    async fn dispatch(&self, envelope: NotificationEnvelope) -> Result<(), DispatchError> {
        let body = envelope.to_json()?;
        info!(
            message_id = %envelope.metadata.message_id,
            hazard_id = %envelope.metadata.hazard_id,
            targets = envelope.payload.targets.len(),
            body = %body,
            "Notification dispatched"
        );
        Ok(())
    }
}

/// Keeps every envelope in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    envelopes: Mutex<Vec<NotificationEnvelope>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn envelopes(&self) -> Vec<NotificationEnvelope> {
        self.envelopes.lock().await.clone()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn dispatch(&self, envelope: NotificationEnvelope) -> Result<(), DispatchError> {
        self.envelopes.lock().await.push(envelope);
        Ok(())
    }
}

/// Forwards envelopes to an in-process consumer task.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<NotificationEnvelope>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<NotificationEnvelope>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn dispatch(&self, envelope: NotificationEnvelope) -> Result<(), DispatchError> {
        self.sender
            .send(envelope)
            .await
            .map_err(|_| DispatchError::Closed)
    }
}
