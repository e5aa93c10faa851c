// Error taxonomy for the location pipeline
use thiserror::Error;

/// The inbound payload does not have the shape the pipeline needs.
/// Permanent: only a resent, valid payload can fix it.
#[derive(Error, Debug)]
pub enum MalformedPayloadError {
    #[error("payload body could not be decoded: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("expected at least 2 location samples, got {0}")]
    TooFewSamples(usize),

    #[error("{which} sample is malformed: {source}")]
    InvalidSample {
        which: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{which} sample has no [longitude, latitude] pair")]
    MissingCoordinates { which: &'static str },

    #[error("timestamp '{value}' is not in YYYY-MM-DDTHH:MM:SSZ form")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Reverse geocoding failed. Transient, never retried.
#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("geocoding provider returned no results")]
    NoResults,

    #[error("geocoding provider answered {status}: {message}")]
    Provider { status: String, message: String },

    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding is not configured: {0}")]
    NotConfigured(&'static str),
}

/// The chat destination could not be reached.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("chat delivery is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("chat delivery request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chat platform rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// An interaction callback could not be proven to come from the chat platform.
#[derive(Error, Debug)]
pub enum InteractionAuthError {
    #[error("no interaction public key is configured")]
    NotConfigured,

    #[error("missing {0} header")]
    MissingHeader(&'static str),

    #[error("{what} is not valid hex: {source}")]
    Encoding {
        what: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("signature check failed: {0}")]
    BadSignature(#[from] ed25519_dalek::SignatureError),
}

/// Every failure the event pipeline can produce.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] MalformedPayloadError),

    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl TrackerError {
    /// Pipeline stage the error was raised in, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            TrackerError::MalformedPayload(_) => "parse",
            TrackerError::Geocoding(_) => "geocode",
            TrackerError::Delivery(_) => "deliver",
        }
    }
}
