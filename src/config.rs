use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LatencyConfig {
    pub enabled: bool,
    pub scale: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub fixtures_dir: Option<PathBuf>,
    pub latency: LatencyConfig,
    /// Fall back to the first fixture user when a request carries no identity.
    pub default_identity: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("APP_PORT must be a port number: {e}"))?,
            Err(_) => 8080,
        };
        let latency = LatencyConfig {
            enabled: env_flag("SIMULATED_LATENCY", true),
            scale: std::env::var("LATENCY_SCALE")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|s| s.is_finite() && *s >= 0.0)
                .unwrap_or(1.0),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            fixtures_dir: std::env::var("FIXTURES_DIR").ok().map(PathBuf::from),
            latency,
            default_identity: env_flag("DEFAULT_IDENTITY", true),
        })
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| parse_flag(&v).unwrap_or(default))
        .unwrap_or(default)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
