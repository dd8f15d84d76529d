// --- File: crates/meetslot_config/src/models.rs ---

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite:data/meetslot.db, loaded via MEETSLOT__DATABASE__URL
}

/// A business closure that is not part of the federal holiday calendar.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub name: String,
}

// --- Scheduling Config ---
// Business window and reference zone shared by slot generation and validation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// IANA name of the zone the business window is defined in.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// First bookable hour (inclusive), local time.
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    /// End of the business window (exclusive), local time.
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
    /// Upper bound for every call to an external collaborator.
    #[serde(default = "default_external_timeout_secs")]
    pub external_timeout_secs: u64,
    #[serde(default)]
    pub extra_holidays: Vec<HolidayEntry>,
}

fn default_time_zone() -> String {
    "America/Denver".to_string()
}

fn default_open_hour() -> u32 {
    7
}

fn default_close_hour() -> u32 {
    17
}

fn default_external_timeout_secs() -> u64 {
    10
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            external_timeout_secs: default_external_timeout_secs(),
            extra_holidays: Vec::new(),
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,    // service account JSON
    pub calendar_id: Option<String>, // defaults to "primary"
}

// --- Zoom Config ---
// Server-to-server OAuth app. The secret is normally given as "secret_from_env"
// and resolved from ZOOM_CLIENT_SECRET.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ZoomConfig {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_zoom_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_zoom_oauth_url")]
    pub oauth_url: String,
}

fn default_zoom_api_base_url() -> String {
    "https://api.zoom.us/v2".to_string()
}

fn default_zoom_oauth_url() -> String {
    "https://zoom.us/oauth/token".to_string()
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_zoom: bool,

    #[serde(default)]
    pub scheduling: SchedulingConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub zoom: Option<ZoomConfig>,
}
