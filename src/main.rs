//! mcp-social binary entry point

use anyhow::{Context, Result};
use clap::Parser;
use mcp_social::config::AppConfig;
use mcp_social::handlers::SocialHandler;
use mcp_social::llm::create_provider;
use mcp_social::logging::{init_logging, LogConfig};
use mcp_social::mcp::McpServer;
use mcp_social::posting::{PostPublisher, TwitterPublisher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mcp-social", version, about = "AI-enhanced social posting MCP server")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "MCP_SOCIAL_CONFIG")]
    config: Option<PathBuf>,

    /// Serve JSON-RPC over stdin/stdout instead of TCP
    #[arg(long)]
    stdio: bool,

    /// TCP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Log level or EnvFilter directive
    #[arg(long)]
    log_level: Option<String>,

    /// Write a sample configuration file and exit
    #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "mcp-social.toml.example")]
    generate_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.generate_config {
        AppConfig::generate_sample_config(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("✅ Sample configuration written to {}", path.display());
        return Ok(());
    }

    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.stdio {
        config.server.stdio = true;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(level) = cli.log_level {
        config.server.log_level = level;
    }

    let _guard = init_logging(&LogConfig::from_server_config(&config.server))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.gemini.default_model,
        "Starting mcp-social"
    );

    let provider = create_provider(&config.gemini).context("failed to create Gemini provider")?;

    let publisher: Option<Arc<dyn PostPublisher>> = match config.twitter.validate() {
        Ok(()) => Some(Arc::new(
            TwitterPublisher::new(config.twitter.clone())
                .context("failed to create Twitter publisher")?,
        )),
        Err(e) => {
            warn!("Posting disabled: {}", e);
            None
        }
    };

    let handler = Arc::new(SocialHandler::new(provider, publisher));
    let server = McpServer::new(handler);

    if config.server.stdio {
        server.run_stdio().await?;
    } else {
        server.run(&config.server.bind_addr).await?;
    }

    Ok(())
}
