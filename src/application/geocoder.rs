// Reverse geocoding port used by the record builder
use crate::domain::error::GeocodingError;
use crate::domain::location::Coordinates;
use async_trait::async_trait;

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Formatted address of the first match for `coordinates`.
    /// Zero matches is an error, not an empty string.
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, GeocodingError>;
}
