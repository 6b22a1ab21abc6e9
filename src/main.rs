use ttlens::config::AppConfig;
use ttlens::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();

    // Dropping the guard flushes the file writer.
    let _log_guard = init_logging(&config.log)?;
    config.log_warnings();

    ttlens::serve(config).await
}
