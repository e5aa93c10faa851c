// Application state for HTTP handlers
use crate::application::tracker_service::TrackerService;
use crate::infrastructure::discord_signature::InteractionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub tracker_service: TrackerService,
    pub interaction_verifier: InteractionVerifier,
}
