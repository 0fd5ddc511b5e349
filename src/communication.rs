use crate::{alarm::AlarmId, webhook::WebhookPayload};

/// sent from the gui thread to the webhook worker
#[derive(Debug)]
pub struct Message {
    pub kind: MessageType,
    pub alarm_id: AlarmId,
}

impl Message {
    #[must_use]
    pub const fn new(kind: MessageType, alarm_id: AlarmId) -> Self {
        Self { kind, alarm_id }
    }
}

#[derive(Debug, Clone)]
pub enum MessageType {
    // an alarm with a webhook fired
    WebhookRequested { url: String, payload: WebhookPayload },
}
