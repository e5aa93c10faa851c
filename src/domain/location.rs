// Enriched location record and its display-ready field types
use chrono::{DateTime, Utc};
use std::fmt;

const COORDINATE_SCALE: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Rounds both axes to 6 decimal places (~0.11 m).
    pub fn rounded(latitude: f64, longitude: f64) -> Self {
        Self::new(round6(latitude), round6(longitude))
    }

    /// `lat,lon` without whitespace, as map providers expect in query strings.
    pub fn compact(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

fn round6(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// Ground speed in m/s. Exactly zero collapses to `Stationary`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speed {
    Stationary,
    MetersPerSecond(f64),
}

impl Speed {
    pub fn from_raw(value: f64) -> Self {
        if value == 0.0 {
            Speed::Stationary
        } else {
            // Negative values (unknown fix) pass through untouched
            Speed::MetersPerSecond(value)
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speed::Stationary => f.write_str("Stationary"),
            Speed::MetersPerSecond(value) => write!(f, "{}", value),
        }
    }
}

/// Battery charge as a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryLevel {
    pub percent: i64,
}

impl BatteryLevel {
    /// Converts a `[0, 1]` fraction, rounding half to even (0.125 -> 12%, 0.375 -> 38%).
    pub fn from_fraction(fraction: f64) -> Self {
        Self {
            percent: (fraction * 100.0).round_ties_even() as i64,
        }
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Wifi {
    None,
    Networks(Vec<String>),
}

impl Wifi {
    pub fn from_networks(networks: Vec<String>) -> Self {
        if networks.is_empty() {
            Wifi::None
        } else {
            Wifi::Networks(networks)
        }
    }
}

impl fmt::Display for Wifi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wifi::None => f.write_str("None"),
            Wifi::Networks(networks) => f.write_str(&networks.join(", ")),
        }
    }
}

/// One fully derived location fix. Built once per webhook, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub coordinates: Coordinates,
    pub previous_coordinates: Coordinates,
    pub forward_heading: f64,
    pub reverse_heading: f64,
    pub distance_meters: f64,
    pub speed: Speed,
    pub battery_level: BatteryLevel,
    pub altitude: f64,
    pub recorded_at: DateTime<Utc>,
    /// `recorded_at` in the display zone, `MM/DD/YYYY HH:MM:SS`
    pub timestamp: String,
    pub wifi: Wifi,
    pub address: String,
}

impl fmt::Display for LocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp: {} ({})", self.timestamp, self.recorded_at.to_rfc3339())?;
        writeln!(f, "Coordinates: {}", self.coordinates)?;
        writeln!(f, "Previous Coordinates: {}", self.previous_coordinates)?;
        writeln!(
            f,
            "Heading: {:.1} (reverse {:.1}), {:.1} m",
            self.forward_heading, self.reverse_heading, self.distance_meters
        )?;
        writeln!(f, "Speed: {}", self.speed)?;
        writeln!(f, "Altitude: {}", self.altitude)?;
        writeln!(f, "Battery Level: {}", self.battery_level)?;
        writeln!(f, "WiFi: {}", self.wifi)?;
        write!(f, "Address: {}", self.address)
    }
}
