use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub mod models;
pub use models::*;

/// Marker value replaced by an environment variable named after the key path.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.{toml,yaml,json}`
/// 2. `{CONFIG_DIR}/{RUN_ENV}.{toml,yaml,json}`
/// 3. environment variables prefixed with `PREFIX` (default `MEETSLOT`), `__` as separator
///
/// Afterwards every `"secret_from_env"` string is resolved, e.g. `zoom.client_secret`
/// is read from `ZOOM_CLIENT_SECRET`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "MEETSLOT".to_string());
    let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string()));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);
    debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(Environment::with_prefix(&prefix).separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for secret_from_env", env_key);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Loads the dotenv file once per process.
///
/// The path is taken from `DOTENV_OVERRIDE`, then from a first command line
/// argument starting with `.env`, and falls back to `.env`. Returns the path used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        serde_json::from_value(serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 8086 },
            "use_zoom": true,
            "zoom": {
                "account_id": "acct",
                "client_id": "client",
                "client_secret": "secret_from_env"
            }
        }))
        .expect("sample config must deserialize")
    }

    #[test]
    fn scheduling_section_falls_back_to_defaults() {
        let config = sample_config();
        assert_eq!(config.scheduling.time_zone, "America/Denver");
        assert_eq!(config.scheduling.open_hour, 7);
        assert_eq!(config.scheduling.close_hour, 17);
        assert_eq!(config.scheduling.external_timeout_secs, 10);
        assert!(config.scheduling.extra_holidays.is_empty());
    }

    #[test]
    fn zoom_urls_default_to_public_endpoints() {
        let zoom = sample_config().zoom.expect("zoom section");
        assert_eq!(zoom.api_base_url, "https://api.zoom.us/v2");
        assert_eq!(zoom.oauth_url, "https://zoom.us/oauth/token");
    }

    #[test]
    fn secret_marker_is_replaced_from_environment() {
        env::set_var("ZOOM_CLIENT_SECRET", "s3cr3t");
        let config = apply_env_overrides_from_marker(sample_config()).expect("overrides");
        assert_eq!(config.zoom.expect("zoom section").client_secret, "s3cr3t");
    }
}
