//! Session Memory Store
//!
//! Bounded log of completed interactions plus a lifetime session profile.
//! The log keeps at most the 20 most recent records, evicting the oldest
//! first. The profile's interaction counter and topic list are never
//! truncated: they reflect lifetime totals even after records are evicted,
//! while `get_statistics` computes its agent/category/tool sets from the
//! retained records only. That asymmetry is part of the contract.
//!
//! The store is a plain owned value: construct one per session and inject it
//! into the orchestrator. Concurrent sessions either get their own store or
//! share one behind a lock of the caller's choosing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of retained interaction records
const MAX_RETAINED: usize = 20;

/// Characters of the response kept in a record preview
const PREVIEW_CHARS: usize = 200;

/// Characters of the query kept as a topic prefix
const TOPIC_CHARS: usize = 100;

/// Characters of the query shown per context line
const CONTEXT_QUERY_CHARS: usize = 80;

/// Message returned by `get_context` when nothing is retained
const EMPTY_HISTORY: &str = "Interaction history is empty.";

/// One persisted summary of a completed request. Immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct InteractionRecord {
    /// When the interaction completed
    pub timestamp: DateTime<Utc>,

    /// Original user query
    pub query: String,

    /// First 200 characters of the response, with a trailing ellipsis when
    /// truncated
    pub response_preview: String,

    /// Name of the responding agent
    pub agent: String,

    /// Assigned category label
    pub category: String,

    /// Tools invoked while producing the response
    pub tools_used: Vec<String>,
}

/// Lifetime aggregates, independent of log retention
#[derive(Debug, Clone, Serialize)]
pub struct SessionProfile {
    /// Distinct query prefixes seen this session (first 100 chars each)
    pub topics_discussed: Vec<String>,

    /// Number of interactions ever recorded, eviction notwithstanding
    pub interaction_count: u64,

    /// When this session started
    pub first_interaction: DateTime<Utc>,
}

/// Statistics over the retained log plus the lifetime profile
#[derive(Debug, Clone, Serialize)]
pub struct MemoryStatistics {
    /// Number of currently retained records
    pub total_interactions: usize,

    /// Lifetime interaction counter
    pub interaction_count: u64,

    /// Number of distinct topics discussed over the session lifetime
    pub topics_discussed: usize,

    /// Distinct agents across retained records, in first-seen order
    pub agents_used: Vec<String>,

    /// Distinct categories across retained records, in first-seen order
    pub categories_used: Vec<String>,

    /// Distinct tool names across retained records, in first-seen order
    pub unique_tools_used: Vec<String>,
}

/// Append-only bounded log of past interactions plus the session profile
#[derive(Debug, Clone)]
pub struct MemoryStore {
    interactions: VecDeque<InteractionRecord>,
    profile: SessionProfile,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            interactions: VecDeque::new(),
            profile: SessionProfile {
                topics_discussed: Vec::new(),
                interaction_count: 0,
                first_interaction: Utc::now(),
            },
        }
    }

    /// Append one completed interaction.
    ///
    /// Bumps the lifetime counter, stores the topic prefix if it is new, and
    /// evicts from the front of the log until at most 20 records remain.
    pub fn record(
        &mut self,
        query: &str,
        response: &str,
        agent: &str,
        category: &str,
        tools_used: &[String],
    ) {
        self.interactions.push_back(InteractionRecord {
            timestamp: Utc::now(),
            query: query.to_string(),
            response_preview: preview(response),
            agent: agent.to_string(),
            category: category.to_string(),
            tools_used: tools_used.to_vec(),
        });
        self.profile.interaction_count += 1;

        let topic = truncate_chars(query, TOPIC_CHARS);
        if !self.profile.topics_discussed.iter().any(|t| t == &topic) {
            self.profile.topics_discussed.push(topic);
        }

        while self.interactions.len() > MAX_RETAINED {
            self.interactions.pop_front();
        }
    }

    /// Human-readable digest of the last `n` retained records, or a fixed
    /// message when the log is empty. Read-only and therefore idempotent.
    pub fn get_context(&self, n: usize) -> String {
        if self.interactions.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        let mut context = String::from("Recent interaction history:\n");
        for (i, record) in self.recent(n).iter().enumerate() {
            context.push_str(&format!(
                "{}. [{}] {}: {}...\n",
                i + 1,
                record.category,
                record.agent,
                truncate_chars(&record.query, CONTEXT_QUERY_CHARS)
            ));
        }
        context
    }

    /// Statistics over the retained log. The agent/category/tool sets shrink
    /// when eviction drops the only records mentioning them; the lifetime
    /// counter and topic count do not.
    pub fn get_statistics(&self) -> MemoryStatistics {
        let mut agents = Vec::new();
        let mut categories = Vec::new();
        let mut tools = Vec::new();

        for record in &self.interactions {
            push_distinct(&mut agents, &record.agent);
            push_distinct(&mut categories, &record.category);
            for tool in &record.tools_used {
                push_distinct(&mut tools, tool);
            }
        }

        MemoryStatistics {
            total_interactions: self.interactions.len(),
            interaction_count: self.profile.interaction_count,
            topics_discussed: self.profile.topics_discussed.len(),
            agents_used: agents,
            categories_used: categories,
            unique_tools_used: tools,
        }
    }

    /// The last `n` retained records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&InteractionRecord> {
        let skip = self.interactions.len().saturating_sub(n);
        self.interactions.iter().skip(skip).collect()
    }

    /// The lifetime session profile.
    pub fn profile(&self) -> &SessionProfile {
        &self.profile
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

/// First 200 characters of `response`, with "..." appended when truncated.
fn preview(response: &str) -> String {
    if response.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_chars(response, PREVIEW_CHARS))
    } else {
        response.to_string()
    }
}

/// First `max` characters of `s`, respecting char boundaries.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
