use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::domain::ttl::service::schema_ttl_extractor::SchemaMatchMode;

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub cql: CqlConfig,
    pub parser: ParserConfig,
    /// Fallbacks taken while loading; logged by `log_warnings` once tracing is installed.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        let mut vars = EnvReader::default();
        Self {
            server: ServerConfig::load(&mut vars),
            log: LogConfig::load(&mut vars),
            cql: CqlConfig::load(&mut vars),
            parser: ParserConfig::load(&mut vars),
            warnings: vars.warnings,
        }
    }

    pub fn log_warnings(&self) {
        for message in &self.warnings {
            warn!("{}", message);
        }
    }
}

// SERVER
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    fn load(vars: &mut EnvReader) -> Self {
        Self {
            host:             vars.get("TTLENS_HOST", "127.0.0.1"),
            port:             vars.get("TTLENS_PORT", "8090"),
            max_upload_bytes: vars.get("TTLENS_MAX_UPLOAD_BYTES", "10485760"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// LOGGING
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub format: String,
}

impl LogConfig {
    fn load(vars: &mut EnvReader) -> Self {
        Self {
            level:  vars.get("TTLENS_LOG_LEVEL", "info"),
            dir:    vars.get("TTLENS_LOG_DIR", "./logs"),
            format: vars.get("TTLENS_LOG_FORMAT", "compact"),
        }
    }
}

// CQL CLIENT
#[derive(Debug, Clone)]
pub struct CqlConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl CqlConfig {
    fn load(vars: &mut EnvReader) -> Self {
        Self {
            connect_timeout_ms: vars.get("TTLENS_CQL_CONNECT_TIMEOUT_MS", "5000"),
            request_timeout_ms: vars.get("TTLENS_CQL_REQUEST_TIMEOUT_MS", "10000"),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for CqlConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            request_timeout_ms: 10_000,
        }
    }
}

// PARSERS
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub schema_match_mode: SchemaMatchMode,
}

impl ParserConfig {
    fn load(vars: &mut EnvReader) -> Self {
        Self {
            schema_match_mode: vars.get("TTLENS_SCHEMA_MATCH_MODE", "scoped"),
        }
    }
}

/// Reads typed values from the environment, keeping a note of every fallback.
#[derive(Default)]
struct EnvReader {
    warnings: Vec<String>,
}

impl EnvReader {
    /// `key` parsed as `T`, or `default` when unset or unparsable.
    fn get<T: FromStr>(&mut self, key: &str, default: &str) -> T {
        match env::var(key) {
            Ok(raw) => match raw.parse::<T>() {
                Ok(v) => v,
                Err(_) => {
                    self.warnings.push(format!(
                        "Invalid value '{}' for {}, using default '{}'",
                        raw, key, default
                    ));
                    parse_default(key, default)
                }
            },
            Err(_) => parse_default(key, default),
        }
    }
}

fn parse_default<T: FromStr>(key: &str, default: &str) -> T {
    default
        .parse::<T>()
        .unwrap_or_else(|_| panic!("Built-in default '{}' for {} must parse", default, key))
}
