//! Dispatch graph
//!
//! The per-request state machine: `router -> {theory, code, planner,
//! general} -> terminal`. The router node classifies the query; exactly one
//! branch node then generates the response and may invoke a single tool.
//! There are no loops and no re-entry: every branch transitions straight to
//! the terminal state.
//!
//! Branch dispatch is an exhaustive match over the closed `Category` enum,
//! so a new category is a compile-time-checked addition rather than a
//! string-keyed lookup.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::classifier::{Category, Classifier};
use super::prompts;
use crate::llm::{Result, TemplateVars, TextGenerator};
use crate::memory::MemoryStore;
use crate::tools::{self, ToolSet};

/// Records of past turns requested from the memory store per branch
const CONTEXT_TURNS: usize = 2;

/// Upper bound on the day count a planning query may request
const MAX_PLAN_DAYS: u32 = 30;

/// Day count used when a planning query names no number
const DEFAULT_PLAN_DAYS: u32 = 7;

/// Marker opening a fenced code block in a generated response
const CODE_FENCE: &str = "```python";

/// Ephemeral per-request state threaded through the graph nodes.
///
/// Created at request start, mutated only by the nodes in sequence, and
/// consumed by the orchestrator once the graph terminates.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Original user query
    pub query: String,

    /// Category assigned by the router node
    pub category: Option<Category>,

    /// Agents that have handled this request, in order
    pub agent_history: Vec<String>,

    /// Tools invoked while producing the answer, in order
    pub tools_used: Vec<String>,

    /// Produced answer text
    pub answer: String,

    /// Elapsed time of the last node that ran
    pub elapsed: Duration,
}

impl QueryContext {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            agent_history: Vec::new(),
            tools_used: Vec::new(),
            answer: String::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Name of the agent that produced the answer (last history entry).
    pub fn responding_agent(&self) -> &str {
        self.agent_history
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// State machine that routes one query to one response branch
pub struct DispatchGraph {
    generator: Arc<dyn TextGenerator>,
    classifier: Classifier,
    tools: ToolSet,
}

impl DispatchGraph {
    pub fn new(generator: Arc<dyn TextGenerator>, tools: ToolSet) -> Self {
        let classifier = Classifier::new(Arc::clone(&generator));
        Self {
            generator,
            classifier,
            tools,
        }
    }

    /// Run one query through the graph: the router node, then exactly one
    /// branch node. A backend failure anywhere aborts the request.
    pub async fn run(&self, query: &str, memory: &MemoryStore) -> Result<QueryContext> {
        let mut ctx = QueryContext::new(query);

        let category = self.router_node(&mut ctx).await?;
        match category {
            Category::Theory => self.theory_node(&mut ctx, memory).await?,
            Category::Code => self.code_node(&mut ctx, memory).await?,
            Category::Planning => self.planner_node(&mut ctx, memory).await?,
            Category::General => self.general_node(&mut ctx, memory).await?,
        }

        Ok(ctx)
    }

    async fn router_node(&self, ctx: &mut QueryContext) -> Result<Category> {
        let start = Instant::now();
        debug!("[router] analyzing query");

        let category = self.classifier.classify(&ctx.query).await?;

        ctx.category = Some(category);
        ctx.agent_history.push("router".to_string());
        ctx.tools_used.clear();
        ctx.elapsed = start.elapsed();

        info!("[router] category {} ({:.2?})", category, ctx.elapsed);
        Ok(category)
    }

    async fn theory_node(&self, ctx: &mut QueryContext, memory: &MemoryStore) -> Result<()> {
        let start = Instant::now();
        debug!("[theory] processing theoretical question");

        let context = memory.get_context(CONTEXT_TURNS);
        let mut response = self
            .generate_branch(prompts::THEORY, &ctx.query, &context)
            .await?;

        let query_lower = ctx.query.to_lowercase();
        if ["what is", "explain", "definition"]
            .iter()
            .any(|kw| query_lower.contains(kw))
        {
            let knowledge = self.tools.knowledge.lookup(&ctx.query);
            response.push_str(&format!("\n\nAdditional information:\n{knowledge}"));
            ctx.tools_used.push(tools::SEARCH_KNOWLEDGE_BASE.to_string());
        }

        complete(ctx, "theory", response, start);
        Ok(())
    }

    async fn code_node(&self, ctx: &mut QueryContext, memory: &MemoryStore) -> Result<()> {
        let start = Instant::now();
        debug!("[code] processing programming query");

        let context = memory.get_context(CONTEXT_TURNS);
        let mut response = self
            .generate_branch(prompts::CODE, &ctx.query, &context)
            .await?;

        if response.contains(CODE_FENCE) || response.contains("def ") {
            // A missing or empty block is a soft-fail: skip silently.
            if let Some(code) = extract_code_block(&response) {
                let result = self.tools.sandbox.execute(&code);
                response.push_str(&format!("\n\nCode execution result:\n{result}"));
                ctx.tools_used.push(tools::EXECUTE_CODE.to_string());
            }
        }

        complete(ctx, "code", response, start);
        Ok(())
    }

    async fn planner_node(&self, ctx: &mut QueryContext, memory: &MemoryStore) -> Result<()> {
        let start = Instant::now();
        debug!("[planner] processing planning query");

        let context = memory.get_context(CONTEXT_TURNS);
        let mut response = self
            .generate_branch(prompts::PLANNER, &ctx.query, &context)
            .await?;

        let query_lower = ctx.query.to_lowercase();
        if ["plan", "schedule", "days", "weeks"]
            .iter()
            .any(|kw| query_lower.contains(kw))
        {
            let days = extract_day_count(&ctx.query);
            match self.tools.planner.create_plan(days, &ctx.query) {
                Ok(plan) => {
                    response.push_str(&format!("\n\nStructured plan:\n{plan}"));
                    ctx.tools_used.push(tools::CREATE_STUDY_PLAN.to_string());
                }
                Err(e) => {
                    response.push_str(&format!("\n\nFailed to create detailed plan: {e}"));
                }
            }
        }

        complete(ctx, "planner", response, start);
        Ok(())
    }

    async fn general_node(&self, ctx: &mut QueryContext, memory: &MemoryStore) -> Result<()> {
        let start = Instant::now();
        debug!("[general] processing general query");

        let context = memory.get_context(CONTEXT_TURNS);
        let response = self
            .generate_branch(prompts::GENERAL, &ctx.query, &context)
            .await?;

        complete(ctx, "general", response, start);
        Ok(())
    }

    async fn generate_branch(&self, prompt: &str, query: &str, context: &str) -> Result<String> {
        let mut vars = TemplateVars::new();
        vars.insert("context".to_string(), context.to_string());
        self.generator.generate(prompt, query, &vars).await
    }
}

/// Write the branch outcome into the context and log completion.
fn complete(ctx: &mut QueryContext, agent: &str, response: String, started: Instant) {
    ctx.agent_history.push(agent.to_string());
    ctx.answer = response;
    ctx.elapsed = started.elapsed();
    info!(
        "[{}] completed ({:.2?}), tools: {:?}",
        agent, ctx.elapsed, ctx.tools_used
    );
}

/// Extract the body of the first ```python fence in `response`.
///
/// Returns the trimmed text between the opening marker and the next closing
/// fence, or None when no well-formed non-empty block exists. Later blocks
/// are never considered.
pub fn extract_code_block(response: &str) -> Option<String> {
    let open = response.find(CODE_FENCE)?;
    let body_start = open + CODE_FENCE.len();
    let rest = &response[body_start..];

    let close = rest.find("```")?;
    let code = rest[..close].trim();
    if code.is_empty() {
        None
    } else {
        Some(code.to_string())
    }
}

/// Scan whitespace-separated query tokens for the first purely-numeric one.
///
/// Found values are capped at 30; a query without a numeric token defaults
/// to 7 days.
pub fn extract_day_count(query: &str) -> u32 {
    match query
        .split_whitespace()
        .find(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
    {
        // A token too large for u32 is still astronomically many days: cap it.
        Some(token) => token
            .parse::<u32>()
            .map_or(MAX_PLAN_DAYS, |days| days.min(MAX_PLAN_DAYS)),
        None => DEFAULT_PLAN_DAYS,
    }
}
