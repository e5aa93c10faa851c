// Application layer - Use cases and the ports they depend on
pub mod action_registry;
pub mod geocoder;
pub mod notification_sink;
pub mod record_builder;
pub mod renderer;
pub mod tracker_service;
