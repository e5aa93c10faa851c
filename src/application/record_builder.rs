// Location record builder - Turns a raw webhook payload into an enriched record
use crate::application::geocoder::Geocoder;
use crate::domain::error::TrackerError;
use crate::domain::geodesic;
use crate::domain::location::{BatteryLevel, Coordinates, LocationRecord, Speed, Wifi};
use crate::domain::payload::{RawLocationPayload, WifiField};
use crate::domain::timestamp::{self, DisplayZone};
use std::sync::Arc;

#[derive(Clone)]
pub struct LocationRecordBuilder {
    geocoder: Arc<dyn Geocoder>,
    zone: DisplayZone,
}

impl LocationRecordBuilder {
    pub fn new(geocoder: Arc<dyn Geocoder>, zone: DisplayZone) -> Self {
        Self { geocoder, zone }
    }

    /// Builds a record from the last two samples of `payload`.
    ///
    /// Everything except the address is derived locally; the address lookup is
    /// the only I/O and runs last, so a malformed payload never costs a request.
    pub async fn build(&self, payload: &RawLocationPayload) -> Result<LocationRecord, TrackerError> {
        let (current, previous) = payload.current_and_previous()?;

        let (lon, lat) = current.geometry.lon_lat("current")?;
        let (prev_lon, prev_lat) = previous.geometry.lon_lat("previous")?;
        let coordinates = Coordinates::rounded(lat, lon);
        let previous_coordinates = Coordinates::rounded(prev_lat, prev_lon);

        let solution = geodesic::inverse(previous_coordinates, coordinates);

        let properties = current.properties;
        let recorded_at = timestamp::parse_utc(&properties.timestamp)?;
        let networks = properties
            .wifi
            .map(WifiField::into_networks)
            .unwrap_or_default();

        let address = self.geocoder.reverse_geocode(coordinates).await?;

        Ok(LocationRecord {
            coordinates,
            previous_coordinates,
            forward_heading: solution.forward_azimuth,
            reverse_heading: solution.reverse_azimuth,
            distance_meters: solution.distance_meters,
            speed: Speed::from_raw(properties.speed),
            battery_level: BatteryLevel::from_fraction(properties.battery_level),
            altitude: properties.altitude,
            recorded_at,
            timestamp: self.zone.render(recorded_at),
            wifi: Wifi::from_networks(networks),
            address,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::error::{GeocodingError, MalformedPayloadError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geocoder double: answers with a fixed address, or no results when `None`.
    pub(crate) struct StubGeocoder {
        pub address: Option<String>,
        pub calls: AtomicUsize,
    }

    impl StubGeocoder {
        pub(crate) fn answering(address: &str) -> Self {
            Self {
                address: Some(address.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn empty() -> Self {
            Self {
                address: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<String, GeocodingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.address.clone().ok_or(GeocodingError::NoResults)
        }
    }

    pub(crate) fn sample(lat: f64, lon: f64, speed: f64, battery: f64, wifi: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lon, lat] },
            "properties": {
                "speed": speed,
                "battery_level": battery,
                "altitude": 87,
                "timestamp": "2024-07-04T16:30:00Z",
                "wifi": wifi
            }
        })
    }

    pub(crate) fn payload(locations: Vec<Value>) -> RawLocationPayload {
        RawLocationPayload { locations }
    }

    fn builder(geocoder: Arc<StubGeocoder>) -> LocationRecordBuilder {
        LocationRecordBuilder::new(geocoder, DisplayZone::Named(chrono_tz::America::New_York))
    }

    #[tokio::test]
    async fn test_end_to_end_stationary_record() {
        let geocoder = Arc::new(StubGeocoder::answering("1 Main St, Springfield"));
        let payload = payload(vec![
            sample(40.0, -75.0, 2.0, 0.56, json!(["Old"])),
            sample(40.001, -75.001, 0.0, 0.55, json!([])),
        ]);

        let record = builder(geocoder.clone()).build(&payload).await.unwrap();

        assert_eq!(record.coordinates, Coordinates::new(40.001, -75.001));
        assert_eq!(record.previous_coordinates, Coordinates::new(40.0, -75.0));
        assert_eq!(record.speed, Speed::Stationary);
        assert_eq!(record.speed.to_string(), "Stationary");
        assert_eq!(record.battery_level.to_string(), "55%");
        assert_eq!(record.wifi, Wifi::None);
        assert_eq!(record.wifi.to_string(), "None");
        assert_eq!(record.altitude, 87.0);
        assert_eq!(record.timestamp, "07/04/2024 12:30:00");
        assert_eq!(record.address, "1 Main St, Springfield");
        assert!((record.forward_heading - 322.437575).abs() < 1e-3);
        assert!((record.reverse_heading - 142.436932).abs() < 1e-3);
        assert!((record.distance_meters - 140.073895).abs() < 0.01);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_textbook_pair_after_rounding() {
        let geocoder = Arc::new(StubGeocoder::answering("Buninyong VIC"));
        let payload = payload(vec![
            sample(-37.95103341666667, 144.42486788888889, 1.0, 0.5, json!([])),
            sample(-37.65282113888889, 143.92649552777778, 1.0, 0.5, json!([])),
        ]);

        let record = builder(geocoder).build(&payload).await.unwrap();

        assert_eq!(record.coordinates, Coordinates::new(-37.652821, 143.926496));
        assert_eq!(record.previous_coordinates, Coordinates::new(-37.951033, 144.424868));
        assert!((record.forward_heading - 306.868154).abs() < 1e-3);
        assert!((record.reverse_heading - 127.173625).abs() < 1e-3);
        assert!((record.distance_meters - 54972.227315).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_moving_record_passes_values_through() {
        let geocoder = Arc::new(StubGeocoder::answering("Somewhere"));
        let payload = payload(vec![
            sample(51.5, -0.12, 1.0, 0.9, json!([])),
            sample(51.500123456, -0.120987654, 3.4, 0.873, json!(["NetA", "NetB"])),
        ]);

        let record = builder(geocoder).build(&payload).await.unwrap();

        assert_eq!(record.coordinates, Coordinates::new(51.500123, -0.120988));
        assert_eq!(record.speed, Speed::MetersPerSecond(3.4));
        assert_eq!(record.battery_level.to_string(), "87%");
        assert_eq!(
            record.wifi,
            Wifi::Networks(vec!["NetA".to_string(), "NetB".to_string()])
        );
    }

    #[tokio::test]
    async fn test_single_sample_is_malformed() {
        let geocoder = Arc::new(StubGeocoder::answering("unused"));
        let payload = payload(vec![sample(40.0, -75.0, 0.0, 0.5, json!([]))]);

        let err = builder(geocoder.clone()).build(&payload).await.unwrap_err();

        assert!(matches!(
            err,
            TrackerError::MalformedPayload(MalformedPayloadError::TooFewSamples(1))
        ));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_coordinates_is_malformed() {
        let geocoder = Arc::new(StubGeocoder::answering("unused"));
        let mut current = sample(40.001, -75.001, 0.0, 0.5, json!([]));
        current["geometry"]
            .as_object_mut()
            .unwrap()
            .remove("coordinates");
        let payload = payload(vec![sample(40.0, -75.0, 0.0, 0.5, json!([])), current]);

        let err = builder(geocoder).build(&payload).await.unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_coordinate_is_malformed() {
        let geocoder = Arc::new(StubGeocoder::answering("unused"));
        let mut current = sample(40.001, -75.001, 0.0, 0.5, json!([]));
        current["geometry"]["coordinates"] = json!(["east", 40.0]);
        let payload = payload(vec![sample(40.0, -75.0, 0.0, 0.5, json!([])), current]);

        let err = builder(geocoder).build(&payload).await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::MalformedPayload(MalformedPayloadError::InvalidSample { which: "current", .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_property_is_malformed() {
        let geocoder = Arc::new(StubGeocoder::answering("unused"));
        let mut current = sample(40.001, -75.001, 0.0, 0.5, json!([]));
        current["properties"]
            .as_object_mut()
            .unwrap()
            .remove("battery_level");
        let payload = payload(vec![sample(40.0, -75.0, 0.0, 0.5, json!([])), current]);

        let err = builder(geocoder).build(&payload).await.unwrap_err();
        assert!(matches!(err, TrackerError::MalformedPayload(_)));
    }

    #[tokio::test]
    async fn test_bad_timestamp_is_malformed() {
        let geocoder = Arc::new(StubGeocoder::answering("unused"));
        let mut current = sample(40.001, -75.001, 0.0, 0.5, json!([]));
        current["properties"]["timestamp"] = json!("2024-07-04T16:30:00.123Z");
        let payload = payload(vec![sample(40.0, -75.0, 0.0, 0.5, json!([])), current]);

        let err = builder(geocoder).build(&payload).await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::MalformedPayload(MalformedPayloadError::InvalidTimestamp { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_geocoding_results() {
        let geocoder = Arc::new(StubGeocoder::empty());
        let payload = payload(vec![
            sample(40.0, -75.0, 0.0, 0.5, json!([])),
            sample(40.001, -75.001, 0.0, 0.5, json!([])),
        ]);

        let err = builder(geocoder).build(&payload).await.unwrap_err();
        assert!(matches!(err, TrackerError::Geocoding(GeocodingError::NoResults)));
    }
}
