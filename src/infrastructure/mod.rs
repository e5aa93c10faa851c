// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod discord_channel;
pub mod discord_signature;
pub mod google_geocoder;
