use crate::application::renderer::MapLinks;
use crate::domain::timestamp::DisplayZone;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "config/tracker";
const ENV_PREFIX: &str = "TRACKER";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub google: GoogleSettings,
    pub discord: DiscordSettings,
    pub display: DisplaySettings,
    pub actions: ActionSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleSettings {
    pub api_key: Option<String>,
    pub geocode_url: String,
    pub static_map_url: String,
    pub street_view_url: String,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            static_map_url: "https://maps.googleapis.com/maps/api/staticmap".to_string(),
            street_view_url: "https://maps.googleapis.com/maps/api/streetview".to_string(),
        }
    }
}

impl GoogleSettings {
    pub fn map_links(&self) -> MapLinks {
        MapLinks {
            api_key: self.api_key.clone().unwrap_or_default(),
            static_map_url: self.static_map_url.clone(),
            street_view_url: self.street_view_url.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DiscordSettings {
    pub token: Option<String>,
    pub channel_id: Option<String>,
    /// Hex ed25519 key used to check interaction callbacks.
    pub public_key: Option<String>,
    /// Enables `/ping` registration at start-up.
    pub application_id: Option<String>,
    pub guild_id: Option<String>,
    pub api_base: String,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            token: None,
            channel_id: None,
            public_key: None,
            application_id: None,
            guild_id: None,
            api_base: "https://discord.com/api/v10".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DisplaySettings {
    /// IANA zone name. Falls back to `$TZ`, then to the host zone.
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActionSettings {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 180,
            capacity: 64,
        }
    }
}

impl ActionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Loads `config/tracker.*` (optional) with `TRACKER__SECTION__KEY` overrides.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Picks the display zone once for the process lifetime.
///
/// A configured name must be valid. `$TZ` is only a hint: an unparseable value
/// falls back to the host zone.
pub fn resolve_display_zone(
    display: &DisplaySettings,
    tz_env: Option<String>,
) -> anyhow::Result<DisplayZone> {
    if let Some(name) = display.timezone.as_deref().filter(|n| !n.is_empty()) {
        let tz: Tz = name
            .parse()
            .map_err(|e| anyhow::anyhow!("unknown timezone '{}': {}", name, e))?;
        return Ok(DisplayZone::Named(tz));
    }

    match tz_env.as_deref().map(str::parse::<Tz>) {
        Some(Ok(tz)) => Ok(DisplayZone::Named(tz)),
        _ => Ok(DisplayZone::Host),
    }
}
