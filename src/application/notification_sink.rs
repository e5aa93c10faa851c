// Chat delivery port
use crate::application::renderer::ActionSet;
use crate::domain::error::DeliveryError;
use crate::domain::notification::{MessageBody, NotificationId};
use async_trait::async_trait;

#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Posts one notification to the configured destination. Each action in
    /// `actions` must be exposed so it can later be resolved through `id`.
    async fn deliver(
        &self,
        id: NotificationId,
        body: &MessageBody,
        actions: &ActionSet,
    ) -> Result<(), DeliveryError>;
}
