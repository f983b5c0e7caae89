use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::services::DEFAULT_FETCH_CONCURRENCY;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub redis_url: Option<String>,
    pub fetch_concurrency: usize,
    pub include_complete_default: bool,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            log_level: "info".to_string(),
            redis_url: None,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            include_complete_default: false,
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(defaults.host);

        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        let redis_url = std::env::var("REDIS_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let fetch_concurrency = std::env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.fetch_concurrency);

        let include_complete_default =
            env_bool("INCLUDE_COMPLETE_DEFAULT").unwrap_or(defaults.include_complete_default);

        let enable_file_logs =
            env_bool("ENABLE_FILE_LOGS").unwrap_or(defaults.enable_file_logs);

        let log_dir = std::env::var("LOG_DIR")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.log_dir);

        Self {
            host,
            port,
            log_level,
            redis_url,
            fetch_concurrency,
            include_complete_default,
            enable_file_logs,
            log_dir,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

pub fn env_bool(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    parse_bool(&value)
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
