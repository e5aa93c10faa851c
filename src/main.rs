// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::action_registry::ActionRegistry;
use crate::application::record_builder::LocationRecordBuilder;
use crate::application::renderer::NotificationRenderer;
use crate::application::tracker_service::TrackerService;
use crate::infrastructure::config::{load_config, resolve_display_zone};
use crate::infrastructure::discord_channel::DiscordChannel;
use crate::infrastructure::discord_signature::InteractionVerifier;
use crate::infrastructure::google_geocoder::GoogleGeocoder;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{handle_interaction, health_check, receive_locations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;
    let zone = resolve_display_zone(&config.display, std::env::var("TZ").ok())?;
    tracing::info!(timezone = zone.name(), "Rendering timestamps in display zone");

    // Create adapters (infrastructure layer)
    let http = reqwest::Client::new();
    let geocoder = Arc::new(GoogleGeocoder::new(
        http.clone(),
        config.google.geocode_url.clone(),
        config.google.api_key.clone(),
    ));
    let channel = Arc::new(DiscordChannel::new(
        http,
        config.discord.api_base.clone(),
        config.discord.token.clone(),
        config.discord.channel_id.clone(),
    ));
    let interaction_verifier =
        InteractionVerifier::from_public_key(config.discord.public_key.as_deref())?;
    if !interaction_verifier.is_configured() {
        tracing::warn!("discord.public_key is not set; interaction callbacks will be refused");
    }

    // Register slash commands
    let application_id = config.discord.application_id.as_deref();
    if let Some(application_id) = application_id.filter(|a| !a.is_empty()) {
        let guild_id = config.discord.guild_id.as_deref().filter(|g| !g.is_empty());
        if let Err(e) = channel.register_commands(application_id, guild_id).await {
            tracing::warn!(error = %e, "Failed to register application commands");
        }
    }

    // Create services (application layer)
    let builder = LocationRecordBuilder::new(geocoder, zone);
    let renderer = NotificationRenderer::new(config.google.map_links());
    let registry = Arc::new(ActionRegistry::new(
        config.actions.ttl(),
        config.actions.capacity,
    ));
    let tracker_service = TrackerService::new(builder, renderer, registry, channel);

    // Create application state
    let state = Arc::new(AppState {
        tracker_service,
        interaction_verifier,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/endpoint", post(receive_locations))
        .route("/interactions", post(handle_interaction))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting tracker-bridge on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
