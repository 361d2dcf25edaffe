//! Server configuration (command line + environment).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use sitecrew_agents::llm::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

use crate::artifact::FencePolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "sitecrew-server", about = "Generate and version static sites from a business brief")]
pub struct ServerConfig {
    /// HTTP listen address
    #[arg(long, env = "SITECREW_ADDR", default_value = "127.0.0.1:8000")]
    pub listen_addr: String,

    /// JSON metadata document
    #[arg(long, env = "SITECREW_METADATA_PATH", default_value = "data/sites.json")]
    pub metadata_path: PathBuf,

    /// Directory for generated HTML artifacts
    #[arg(long, env = "SITECREW_PREVIEW_DIR", default_value = "previews")]
    pub preview_dir: PathBuf,

    /// Optional directory served under /static
    #[arg(long, env = "SITECREW_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Claude model used by both agents
    #[arg(long, env = "SITECREW_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Anthropic API key (or set ANTHROPIC_API_KEY env var)
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Messages API root
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Max output tokens per agent call
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Fail generation when the output has no ```html block
    #[arg(long)]
    pub strict_extraction: bool,

    /// Abort generation after this many seconds (unset: wait indefinitely)
    #[arg(long, env = "SITECREW_GENERATION_TIMEOUT_SECS")]
    pub generation_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            metadata_path: PathBuf::from("data/sites.json"),
            preview_dir: PathBuf::from("previews"),
            static_dir: None,
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            strict_extraction: false,
            generation_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Startup checks. A missing credential is fatal.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("ANTHROPIC_API_KEY environment variable is not set");
        }
        if self.max_tokens == 0 {
            anyhow::bail!("--max-tokens must be positive");
        }
        Ok(())
    }

    pub fn fence_policy(&self) -> FencePolicy {
        if self.strict_extraction {
            FencePolicy::Strict
        } else {
            FencePolicy::Permissive
        }
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }
}

/// Directives used when `RUST_LOG` is unset or empty.
pub const DEFAULT_LOG_FILTER: &str = "sitecrew_server=info,sitecrew_agents=info";

/// Log filter from a `RUST_LOG` value. A set value replaces the defaults
/// entirely.
pub fn log_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = match rust_log.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_LOG_FILTER,
    };
    Ok(EnvFilter::try_new(directives)?)
}
