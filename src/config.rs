use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

const DEFAULT_STATUS_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DETECT_INTERVAL_SECS: u64 = 10;

/// Address of one shared state store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAddress {
    pub host: String,
    pub port: u16,
}

impl StoreAddress {
    /// Accepts `host:port` and the older `host__port` form.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let (host, port) = raw
            .split_once("__")
            .or_else(|| raw.rsplit_once(':'))
            .ok_or_else(|| format!("'{}' is not host:port", raw))?;

        if host.is_empty() {
            return Err(format!("'{}' has an empty host", raw));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| format!("'{}' has an invalid port: {}", raw, e))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/0", self.host, self.port)
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub namespace: String,
    pub local_store: StoreAddress,
    pub remote_stores: Vec<StoreAddress>,
    pub debug_logging: bool,
    pub webhooks_config: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub status_addr: Option<SocketAddr>,
    pub detect_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let namespace = non_empty("NAMESPACE").ok_or(ConfigError::Missing("NAMESPACE"))?;
        let host = non_empty("REDIS_HOST").ok_or(ConfigError::Missing("REDIS_HOST"))?;
        let port = non_empty("REDIS_PORT").ok_or(ConfigError::Missing("REDIS_PORT"))?;
        let port = port.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
            name: "REDIS_PORT",
            message: e.to_string(),
        })?;

        let remote_stores = match non_empty("REMOTE_REDIS_HOSTS") {
            Some(raw) => raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(StoreAddress::parse)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|message| ConfigError::Invalid {
                    name: "REMOTE_REDIS_HOSTS",
                    message,
                })?,
            None => Vec::new(),
        };

        let debug_logging = lookup("LOGLEVEL")
            .map(|v| v.eq_ignore_ascii_case("DEBUG"))
            .unwrap_or(false);

        let status_addr = match non_empty("STATUS_ADDR") {
            Some(v) if v.eq_ignore_ascii_case("off") => None,
            Some(v) => Some(v.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    name: "STATUS_ADDR",
                    message: e.to_string(),
                }
            })?),
            None => DEFAULT_STATUS_ADDR.parse().ok(),
        };

        let detect_interval = match non_empty("DETECT_INTERVAL_SECS") {
            Some(v) => {
                let secs = v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: "DETECT_INTERVAL_SECS",
                    message: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "DETECT_INTERVAL_SECS",
                        message: "must be greater than zero".into(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_DETECT_INTERVAL_SECS),
        };

        Ok(Self {
            namespace,
            local_store: StoreAddress { host, port },
            remote_stores,
            debug_logging,
            webhooks_config: non_empty("WEBHOOKS_CONFIG").map(PathBuf::from),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
            status_addr,
            detect_interval,
        })
    }
}
