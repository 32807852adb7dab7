//! NNS Proposal Relay
//!
//! Bridges a chat-driven agent framework to the Internet Computer's NNS
//! governance canister: parses `!proposals` commands, queries the ledger,
//! and hands back normalized, filterable proposal summaries.

mod command;
mod config;
mod engine;
mod error;
mod governance;
mod handler;
mod projection;
mod registry;

use crate::config::Settings;
use crate::governance::HttpGovernanceClient;
use crate::handler::{CommandHandler, ProposalsProvider};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting NNS Proposal Relay...");

    // Load configuration
    let settings = Settings::load()?;
    info!(
        "📋 Configuration loaded: gateway {} canister {}",
        settings.gateway.host, settings.governance.canister_id
    );

    let client = HttpGovernanceClient::new(&settings)?;
    let provider = ProposalsProvider::new(client);

    info!("💬 Command grammar:");
    info!("   !proposals                               - latest 10 proposals");
    info!("   !proposals <limit>                       - latest <limit> proposals");
    info!("   !proposals <limit> topic <id>            - constrain to one topic");
    info!("   !proposals <limit> status <id>           - constrain to one status");
    info!("   !proposals <limit> topic <id> status <id> - both constraints");
    info!("");
    info!("Reading commands from stdin (Ctrl-D to exit)");

    // Stand-in for the host chat framework: one command per line.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match provider.handle(&line).await {
            Ok(Some(reply)) => {
                println!("{}", reply.text);
                println!("{}", serde_json::to_string_pretty(&reply.proposals)?);
            }
            Ok(None) => {}
            Err(e) => {
                error!("Query failed: {}", e);
                println!("⚠️  {}", e);
            }
        }
    }

    info!("👋 Relay shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,nns_proposal_relay=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .init();
}
