//! Cascade CLI - one-shot conversational requests against the CMS.
//!
//! Reads configuration from the environment (and `.env`), classifies
//! the request, runs the matching pipeline, and prints the result.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cascade::llm::GeminiClient;
use cascade::mcp::McpHttpTransport;
use cascade::{Assistant, Config, RequestContext, StatusEmitter, ToolClient};

/// Conversational assistant for the Falls Into Love CMS.
#[derive(Parser)]
#[command(name = "cascade")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Create and manage waterfall pages with natural-language requests")]
struct Cli {
    /// The request, e.g. "Create a page for Multnomah Falls in Oregon"
    request: Vec<String>,

    /// Caller identity forwarded with status events
    #[arg(long, env = "CASCADE_USER_ID")]
    user_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cascade=info,cascade_cli=info")),
        )
        .init();

    let cli = Cli::parse();
    let request = cli.request.join(" ");
    if request.trim().is_empty() {
        bail!("no request given; try: cascade \"What pages do we have?\"");
    }

    let config = Config::from_env();
    config.validate().context("configuration is incomplete")?;

    let transport = McpHttpTransport::from_config(&config)?;
    let tools = ToolClient::new(Arc::new(transport));
    let llm = Arc::new(GeminiClient::from_config(&config));
    let assistant = Assistant::new(tools, llm, &config);

    let emitter = StatusEmitter::from_config(&config);
    let ctx = RequestContext::new(cli.user_id, emitter);

    info!("dispatching request");
    let reply = assistant.handle(&ctx, &request).await;
    println!("{reply}");
    Ok(())
}
