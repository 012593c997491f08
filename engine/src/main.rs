// StudyCoder Assistant
// Main entry point for the studycoder binary

use clap::Parser;
use std::sync::Arc;

use studycoder_engine::agent::Orchestrator;
use studycoder_engine::cli::{Cli, Command};
use studycoder_engine::config::Config;
use studycoder_engine::handlers::{
    handle_ask, handle_chat, handle_doctor, handle_info, OutputFormat,
};
use studycoder_engine::llm::openai::OpenAIProvider;
use studycoder_engine::llm::TextGenerator;
use studycoder_engine::memory::MemoryStore;
use studycoder_engine::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize basic telemetry first (before config is loaded)
    telemetry::init_default();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize telemetry with config-driven log level
    // (only takes effect if nothing was installed yet)
    telemetry::init(&config.core.log_level);

    tracing::info!("StudyCoder Assistant v{}", env!("CARGO_PKG_VERSION"));

    let generator: Arc<dyn TextGenerator> =
        Arc::new(OpenAIProvider::from_env(config.llm.clone())?);

    match cli.command {
        Command::Ask { query } => {
            tracing::info!("processing single query");
            let mut orchestrator = Orchestrator::new(generator, MemoryStore::new());
            handle_ask(&mut orchestrator, &query, format).await
        }

        Command::Chat => {
            tracing::info!("starting interactive session");
            let mut orchestrator = Orchestrator::new(generator, MemoryStore::new());
            handle_chat(&mut orchestrator, &config).await
        }

        Command::Doctor => {
            tracing::info!("running connectivity check");
            handle_doctor(generator.as_ref(), format).await
        }

        Command::Info => {
            let orchestrator = Orchestrator::new(generator, MemoryStore::new());
            handle_info(&orchestrator, &config, format)
        }
    }
}
