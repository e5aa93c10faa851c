// Tracker service - One location webhook in, one chat notification out
use crate::application::action_registry::ActionRegistry;
use crate::application::notification_sink::NotificationSink;
use crate::application::record_builder::LocationRecordBuilder;
use crate::application::renderer::NotificationRenderer;
use crate::domain::error::TrackerError;
use crate::domain::notification::{ActionKind, NotificationId};
use crate::domain::payload::RawLocationPayload;
use std::sync::Arc;

#[derive(Clone)]
pub struct TrackerService {
    builder: LocationRecordBuilder,
    renderer: NotificationRenderer,
    registry: Arc<ActionRegistry>,
    sink: Arc<dyn NotificationSink>,
}

impl TrackerService {
    pub fn new(
        builder: LocationRecordBuilder,
        renderer: NotificationRenderer,
        registry: Arc<ActionRegistry>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            builder,
            renderer,
            registry,
            sink,
        }
    }

    /// Runs the full pipeline for one webhook body.
    pub async fn handle_event(&self, body: &[u8]) -> Result<NotificationId, TrackerError> {
        let payload = RawLocationPayload::from_slice(body)?;
        let record = Arc::new(self.builder.build(&payload).await?);

        tracing::info!(
            coordinates = %record.coordinates,
            heading = record.forward_heading,
            distance_m = record.distance_meters,
            "Built location record"
        );
        tracing::debug!("Location record:\n{}", record);

        let (message, actions) = self.renderer.render(record);
        let id = self.registry.register(actions.clone());

        if let Err(e) = self.sink.deliver(id, &message, &actions).await {
            self.registry.forget(id);
            return Err(e.into());
        }

        tracing::info!(notification = %id, "Delivered location notification");
        Ok(id)
    }

    /// Resolves a button handle such as `maps:<id>` to its follow-up message.
    /// `None` when the handle is unknown or its notification has expired.
    pub fn invoke_action(&self, handle: &str) -> Option<String> {
        let (kind, id) = ActionKind::parse_handle(handle)?;
        let action = self.registry.resolve(id, kind)?;

        tracing::debug!(
            notification = %id,
            action = action.label(),
            coordinates = %action.record().coordinates,
            "Invoking notification action"
        );
        Some(action.invoke())
    }
}
