use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fitplan::config::ServerArgs;
use fitplan::llm::OpenAiChatClient;
use fitplan::planner::PlanGenerator;
use fitplan::server::run_server;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = ServerArgs::parse();
    let provider_config = args.provider_config();
    info!(
        base_url = %provider_config.base_url,
        model = %provider_config.model,
        max_tokens = args.max_tokens,
        strict_schema = args.strict_schema,
        "using completion provider"
    );

    let provider = OpenAiChatClient::new(provider_config).context("failed to create provider client")?;
    let generator = PlanGenerator::new(Arc::new(provider), args.generation_settings());

    run_server(args.bind, generator).await
}
