// Inbound webhook payload (GeoJSON feature list sent by the tracking client)
use super::error::MalformedPayloadError;
use serde::Deserialize;
use serde_json::Value;

/// Raw body of a location webhook.
///
/// Samples are kept as untyped JSON; only the two most recent ones are
/// ever decoded, so stale entries further back cannot fail a request.
#[derive(Debug, Deserialize)]
pub struct RawLocationPayload {
    pub locations: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Geometry {
    /// Returns `(longitude, latitude)`. A trailing altitude element is ignored.
    pub fn lon_lat(&self, which: &'static str) -> Result<(f64, f64), MalformedPayloadError> {
        match self.coordinates.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(MalformedPayloadError::MissingCoordinates { which }),
        }
    }
}

/// Visible networks. Clients send either a list or a single SSID string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WifiField {
    Networks(Vec<String>),
    Single(String),
}

impl WifiField {
    pub fn into_networks(self) -> Vec<String> {
        match self {
            WifiField::Networks(networks) => networks,
            WifiField::Single(name) if name.is_empty() => Vec::new(),
            WifiField::Single(name) => vec![name],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SampleProperties {
    pub speed: f64,
    pub battery_level: f64,
    pub altitude: f64,
    pub timestamp: String,
    #[serde(default)]
    pub wifi: Option<WifiField>,
}

/// The most recent sample: geometry and properties are both required.
#[derive(Debug, Deserialize)]
pub struct LocationSample {
    pub geometry: Geometry,
    pub properties: SampleProperties,
}

/// The sample before it: only its position is read.
#[derive(Debug, Deserialize)]
pub struct PositionSample {
    pub geometry: Geometry,
}

impl RawLocationPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, MalformedPayloadError> {
        serde_json::from_slice(body).map_err(MalformedPayloadError::InvalidBody)
    }

    /// Decodes the last and second-to-last samples.
    pub fn current_and_previous(
        &self,
    ) -> Result<(LocationSample, PositionSample), MalformedPayloadError> {
        let count = self.locations.len();
        if count < 2 {
            return Err(MalformedPayloadError::TooFewSamples(count));
        }

        let current = decode(&self.locations[count - 1], "current")?;
        let previous = decode(&self.locations[count - 2], "previous")?;
        Ok((current, previous))
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    value: &Value,
    which: &'static str,
) -> Result<T, MalformedPayloadError> {
    T::deserialize(value).map_err(|source| MalformedPayloadError::InvalidSample { which, source })
}
