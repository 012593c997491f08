//! Command handlers
//!
//! One handler per CLI command. Handlers own the user-facing output; the
//! orchestrator stays presentation-free apart from its report formatter.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::json;
use tracing::info;

use crate::agent::Orchestrator;
use crate::config::Config;
use crate::llm::{TemplateVars, TextGenerator};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Process one query and print the report.
pub async fn handle_ask(
    orchestrator: &mut Orchestrator,
    query: &str,
    format: OutputFormat,
) -> Result<()> {
    let outcome = orchestrator.process(query).await?;
    match format {
        OutputFormat::Text => println!("{}", orchestrator.format_report(&outcome)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

/// Run the interactive session loop.
pub async fn handle_chat(orchestrator: &mut Orchestrator, config: &Config) -> Result<()> {
    println!("StudyCoder interactive session.");
    println!("Type a query, or: 'stats', 'history', 'info', 'exit'.");

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("query> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                editor.add_history_entry(input).ok();

                match input.to_lowercase().as_str() {
                    "exit" | "quit" | "q" => {
                        println!("Goodbye!");
                        break;
                    }
                    "stats" | "statistics" => print_stats(orchestrator),
                    "history" | "hist" => print_history(orchestrator),
                    "info" | "system" => print_info(orchestrator, config),
                    _ => match orchestrator.process(input).await {
                        Ok(outcome) => println!("{}", orchestrator.format_report(&outcome)),
                        Err(e) => eprintln!("Error: {e:#}"),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Session closed.");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Probe the backend with one trivial generate call.
pub async fn handle_doctor(generator: &dyn TextGenerator, format: OutputFormat) -> Result<()> {
    info!("probing backend connectivity");

    let probe = generator
        .generate(
            "You are a connectivity probe. Reply with a short confirmation.",
            "Connection test.",
            &TemplateVars::new(),
        )
        .await;

    match format {
        OutputFormat::Text => match probe {
            Ok(reply) => {
                let first_line = reply.lines().next().unwrap_or_default();
                println!("Backend reachable: {first_line}");
            }
            Err(e) => println!("Backend unreachable: {e}"),
        },
        OutputFormat::Json => {
            let report = match probe {
                Ok(reply) => json!({ "ok": true, "reply": reply }),
                Err(e) => json!({ "ok": false, "error": e.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Print the system information report.
pub fn handle_info(
    orchestrator: &Orchestrator,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let system = orchestrator.system_info();
    match format {
        OutputFormat::Text => {
            println!("StudyCoder Assistant v{}", system.version);
            println!("  Generator:   {}", system.generator);
            println!("  Endpoint:    {}", config.llm.base_url);
            println!("  Model:       {}", config.llm.model);
            println!("  Temperature: {}", config.llm.temperature);
            println!("  Agents:      {}", system.agents.join(", "));
            println!("  Tools:       {}", system.tools.join(", "));
        }
        OutputFormat::Json => {
            let report = json!({
                "system": system,
                "llm": {
                    "base_url": config.llm.base_url,
                    "model": config.llm.model,
                    "temperature": config.llm.temperature,
                },
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn print_stats(orchestrator: &Orchestrator) {
    let stats = orchestrator.statistics();
    println!("Session statistics:");
    println!("  Total interactions: {}", stats.interaction_count);
    println!("  Retained records:   {}", stats.total_interactions);
    println!("  Categories used:    {}", stats.categories_used.join(", "));
    println!("  Agents used:        {}", stats.agents_used.join(", "));
    println!("  Tools used:         {}", stats.unique_tools_used.join(", "));
}

fn print_history(orchestrator: &Orchestrator) {
    let records = orchestrator.memory().recent(5);
    if records.is_empty() {
        println!("No interactions yet.");
        return;
    }
    println!("Recent interactions:");
    for (i, record) in records.iter().enumerate() {
        let query: String = record.query.chars().take(50).collect();
        println!("  {}. [{}] {}...", i + 1, record.agent, query);
    }
}

fn print_info(orchestrator: &Orchestrator, config: &Config) {
    // Text variant of the info command, reused inside the chat loop.
    handle_info(orchestrator, config, OutputFormat::Text).ok();
}
