// Domain layer - Location records, payloads and notification model
pub mod error;
pub mod geodesic;
pub mod location;
pub mod notification;
pub mod payload;
pub mod timestamp;
