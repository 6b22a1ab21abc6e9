use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LogConfig;

const LOG_FILE_PREFIX: &str = "ttlens.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Base level plus quieted driver/http internals. `RUST_LOG`, when set, wins.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level.to_string()];
    let noisy: &[(&str, &str)] = &[
        ("scylla", "warn"),
        ("hyper", "warn"),
        ("tower_http", "info"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Installs the global subscriber: console layer plus a daily-rolling file under `cfg.dir`.
///
/// The returned guard flushes the file writer on drop and must live as long as `main`.
pub fn init_logging(cfg: &LogConfig) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(&cfg.dir)?;

    let appender = tracing_appender::rolling::daily(&cfg.dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(build_env_filter(&cfg.level)?);

    let file_layer = match LogFormat::parse(&cfg.format) {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(file_writer)
            .with_target(true)
            .with_filter(build_env_filter(&cfg.level)?)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_writer)
            .with_target(true)
            .with_filter(build_env_filter(&cfg.level)?)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!("Logging initialized: level={}, dir={}", cfg.level, cfg.dir);
    Ok(guard)
}
