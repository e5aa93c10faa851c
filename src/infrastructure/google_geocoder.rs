// Google Geocoding API adapter
use crate::application::geocoder::Geocoder;
use crate::domain::error::GeocodingError;
use crate::domain::location::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn build_request_url(&self, coordinates: Coordinates, api_key: &str) -> String {
        format!(
            "{}?latlng={}&key={}",
            self.base_url,
            coordinates.compact(),
            urlencoding::encode(api_key)
        )
    }
}

/// Picks the first result, mapping provider statuses onto the error taxonomy.
fn first_address(response: GeocodeResponse) -> Result<String, GeocodingError> {
    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => response
            .results
            .into_iter()
            .next()
            .map(|r| r.formatted_address)
            .ok_or(GeocodingError::NoResults),
        _ => Err(GeocodingError::Provider {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        }),
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<String, GeocodingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GeocodingError::NotConfigured("google.api_key"))?;
        let url = self.build_request_url(coordinates, api_key);

        tracing::debug!(latlng = %coordinates.compact(), "Reverse geocoding");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        first_address(response)
    }
}
