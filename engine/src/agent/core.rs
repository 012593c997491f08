//! Session Orchestrator
//!
//! Entry point for a complete request: seeds per-query state, runs the
//! dispatch graph, persists the completed interaction to the memory store,
//! and formats the user-facing report. The store is constructor-injected and
//! owned (no ambient global state) so isolated tests and independent
//! sessions each get their own.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::classifier::Category;
use super::graph::DispatchGraph;
use crate::llm::TextGenerator;
use crate::memory::{MemoryStatistics, MemoryStore};
use crate::tools::ToolSet;

/// Completed result of one processed query
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Original query text
    pub query: String,

    /// Category the router assigned
    pub category: Category,

    /// Name of the responding agent
    pub agent: String,

    /// Agents that handled the request, in order
    pub agents_used: Vec<String>,

    /// Tools invoked while producing the answer
    pub tools_used: Vec<String>,

    /// The answer, including any tool output appended by the branch
    pub response: String,

    /// Time spent in the responding branch, milliseconds
    pub agent_time_ms: u64,

    /// Total processing time, milliseconds
    pub total_time_ms: u64,
}

/// Serializable system description for the `info` command
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub generator: String,
    pub agents: Vec<&'static str>,
    pub tools: Vec<&'static str>,
    pub statistics: MemoryStatistics,
}

/// Orchestrator that owns the dispatch graph and the session memory
pub struct Orchestrator {
    graph: DispatchGraph,
    generator_name: String,
    memory: MemoryStore,
}

impl Orchestrator {
    /// Create an orchestrator over a generator handle and an injected store.
    pub fn new(generator: Arc<dyn TextGenerator>, memory: MemoryStore) -> Self {
        let generator_name = generator.name().to_string();
        Self {
            graph: DispatchGraph::new(generator, ToolSet::new()),
            generator_name,
            memory,
        }
    }

    /// Process one query end-to-end.
    ///
    /// Runs the dispatch graph, records the completed interaction, and
    /// returns the outcome. A backend failure aborts the request and leaves
    /// the memory store untouched.
    pub async fn process(&mut self, query: &str) -> Result<QueryOutcome> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        info!("request {} started", request_id);

        let ctx = self
            .graph
            .run(query, &self.memory)
            .await
            .context("text generator call failed")?;

        // The router always assigns a category before any branch runs.
        let category = ctx.category.unwrap_or(Category::General);
        let agent = ctx.responding_agent().to_string();

        self.memory.record(
            &ctx.query,
            &ctx.answer,
            &agent,
            category.label(),
            &ctx.tools_used,
        );

        let total = start.elapsed();
        info!(
            "request {} completed by {} in {:.2?}",
            request_id, agent, total
        );
        debug!("request {} tools: {:?}", request_id, ctx.tools_used);

        Ok(QueryOutcome {
            query: ctx.query,
            category,
            agent,
            agents_used: ctx.agent_history,
            tools_used: ctx.tools_used,
            response: ctx.answer,
            agent_time_ms: ctx.elapsed.as_millis() as u64,
            total_time_ms: total.as_millis() as u64,
        })
    }

    /// Statistics over the current session memory.
    pub fn statistics(&self) -> MemoryStatistics {
        self.memory.get_statistics()
    }

    /// Read access to the session memory, for inspection commands.
    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Serializable system description.
    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            version: env!("CARGO_PKG_VERSION"),
            generator: self.generator_name.clone(),
            agents: vec!["router", "theory", "code", "planner", "general"],
            tools: ToolSet::tool_names().to_vec(),
            statistics: self.memory.get_statistics(),
        }
    }

    /// Render the user-facing report for a completed query.
    pub fn format_report(&self, outcome: &QueryOutcome) -> String {
        let stats = self.memory.get_statistics();
        let rule = "=".repeat(60);
        let tools = if outcome.tools_used.is_empty() {
            "not used".to_string()
        } else {
            outcome.tools_used.join(", ")
        };

        let mut report = String::new();
        report.push_str(&format!("\n{rule}\n"));
        report.push_str(&format!(
            "STUDYCODER ASSISTANT | {}\n",
            Local::now().format("%H:%M:%S")
        ));
        report.push_str(&format!("{rule}\n\n"));
        report.push_str(&format!("QUERY: {}\n\n", outcome.query));
        report.push_str(&format!("CATEGORY: {}\n", outcome.category));
        report.push_str(&format!(
            "AGENTS USED: {}\n",
            outcome.agents_used.join(" -> ")
        ));
        report.push_str(&format!("TOOLS: {tools}\n\n"));
        report.push_str("PROCESSING TIME:\n");
        report.push_str(&format!(
            "  agent: {:.2} sec\n",
            outcome.agent_time_ms as f64 / 1000.0
        ));
        report.push_str(&format!(
            "  total: {:.2} sec\n\n",
            outcome.total_time_ms as f64 / 1000.0
        ));
        report.push_str(&format!("{rule}\n\nANSWER:\n\n{}\n\n{rule}\n", outcome.response));
        report.push_str("SESSION STATISTICS:\n");
        report.push_str(&format!(
            "  total interactions: {}\n",
            stats.interaction_count
        ));
        report.push_str(&format!("  topics discussed: {}\n", stats.topics_discussed));
        report.push_str(&format!("  agents used: {}\n", stats.agents_used.join(", ")));
        report.push_str(&format!("{rule}\n"));
        report
    }
}
