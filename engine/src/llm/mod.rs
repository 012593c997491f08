//! Text Generator Abstraction Layer
//!
//! This module defines the interface the routing core uses for every model
//! invocation. The `TextGenerator` trait is the whole contract: one
//! system-plus-user exchange in, raw completion text out. Providers implement
//! the trait; the core never sees transport details. There is no retry and no
//! timeout; a failed call is fatal for the request that made it.

use async_trait::async_trait;
use std::collections::HashMap;

pub mod openai;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Variables substituted into system instructions before a request is built
pub type TemplateVars = HashMap<String, String>;

/// Replace every `{key}` placeholder in `template` with the matching value
/// from `vars`. Placeholders without a matching key are left untouched.
pub fn render_template(template: &str, vars: &TemplateVars) -> String {
    let mut rendered = template.to_string();
    for (key, value) in vars {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

/// Text generator trait that all providers must implement
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the name of the backing provider (e.g., "openai")
    fn name(&self) -> &str;

    /// Send one system+user exchange to the backend and return the raw
    /// completion text.
    ///
    /// # Arguments
    /// * `system_instructions` - System prompt, may contain `{key}` placeholders
    /// * `user_query` - The user message
    /// * `vars` - Values substituted into the system prompt placeholders
    async fn generate(
        &self,
        system_instructions: &str,
        user_query: &str,
        vars: &TemplateVars,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_template_substitutes_vars() {
        let mut vars = TemplateVars::new();
        vars.insert("context".to_string(), "previous discussion".to_string());

        let rendered = render_template("Context: {context}. Answer well.", &vars);
        assert_eq!(rendered, "Context: previous discussion. Answer well.");
    }

    #[test]
    fn test_render_template_multiple_occurrences() {
        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), "planner".to_string());

        let rendered = render_template("{name} and {name} again", &vars);
        assert_eq!(rendered, "planner and planner again");
    }

    #[test]
    fn test_render_template_leaves_unknown_placeholders() {
        let vars = TemplateVars::new();
        let rendered = render_template("keep {unknown} as is", &vars);
        assert_eq!(rendered, "keep {unknown} as is");
    }
}
