use std::env;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Handler-facing configuration, injected into [`crate::AppState`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Shared static secret expected in the `API-Key` header.
    pub api_key: String,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Full process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub log_json: bool,
    pub api: ApiConfig,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("SALES_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
            database_url: env::var("SALES_DATABASE_URL")
                .unwrap_or_else(|_| "sales.db".to_string()),
            log_json: env_bool("SALES_LOG_JSON", false),
            api: ApiConfig {
                api_key: env::var("SALES_API_KEY").unwrap_or_default(),
                max_body_bytes: env_usize("SALES_MAX_BODY_BYTES", 64 * 1024),
            },
        }
    }
}

pub(crate) fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub(crate) fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

pub fn validate_startup_config_contract(config: &AppConfig) -> Result<(), String> {
    if config.api.api_key.trim().is_empty() {
        return Err("SALES_API_KEY must be set to a non-empty secret".to_string());
    }
    if config.database_url.trim().is_empty() {
        return Err("SALES_DATABASE_URL must not be empty".to_string());
    }
    if config.api.max_body_bytes == 0 {
        return Err("body size limit must be > 0".to_string());
    }
    Ok(())
}
