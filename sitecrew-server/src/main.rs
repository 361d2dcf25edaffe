use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Use JSON logs in production (SITECREW_LOG_JSON=1), human-readable otherwise
    let json_logs = std::env::var("SITECREW_LOG_JSON").unwrap_or_default() == "1";
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = sitecrew_server::config::log_filter(rust_log.as_deref())?;
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    let config = sitecrew_server::config::ServerConfig::parse();
    config.validate()?;
    tracing::info!(
        addr = %config.listen_addr,
        model = %config.model,
        strict_extraction = config.strict_extraction,
        "Starting sitecrew server"
    );

    let server = sitecrew_server::server::Server::new(config);
    server.run().await
}
