use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use wx_core::{EpochMillis, HazardId};
use wx_match::HazardNotification;

mod sinks;
pub use sinks::{ChannelSink, LoggingSink, MemorySink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("dispatch channel closed")]
    Closed,
}

impl From<DispatchError> for wx_core::WxError {
    fn from(value: DispatchError) -> Self {
        Self::new(wx_core::ErrorCode::Upstream, value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchMetadata {
    pub message_id: MessageId,
    pub hazard_id: HazardId,
    pub sent_at_ms: EpochMillis,
    pub source_service: String,
}

impl DispatchMetadata {
    pub fn new(hazard_id: HazardId, sent_at_ms: EpochMillis, source_service: String) -> Self {
        Self {
            message_id: MessageId::new(),
            hazard_id,
            sent_at_ms,
            source_service,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub metadata: DispatchMetadata,
    pub payload: HazardNotification,
}

impl NotificationEnvelope {
    pub fn new(payload: HazardNotification, sent_at_ms: EpochMillis, source_service: &str) -> Self {
        Self {
            metadata: DispatchMetadata::new(
                payload.hazard_id.clone(),
                sent_at_ms,
                source_service.to_string(),
            ),
            payload,
        }
    }

    pub fn to_json(&self) -> Result<String, DispatchError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Hand-off point to push delivery.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, envelope: NotificationEnvelope) -> Result<(), DispatchError>;
}
