//! Query classification
//!
//! Single-shot classifier that maps a free-text query onto one of the four
//! fixed categories. The model is asked for exactly one label; the reply is
//! trimmed, lowercased, and coerced to `General` when it is not a valid
//! label. The coercion is silent: a hallucinated label is never an error
//! and never retried. A transport failure, on the other hand, propagates
//! untouched to the caller.

use crate::agent::prompts;
use crate::llm::{Result, TemplateVars, TextGenerator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// One of the four fixed query classes, decided once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Theory,
    Code,
    Planning,
    General,
}

impl Category {
    /// Parse a classifier label, coercing anything unrecognized to General.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "theory" => Self::Theory,
            "code" => Self::Code,
            "planning" => Self::Planning,
            "general" => Self::General,
            other => {
                debug!("unrecognized category label {:?}, using general", other);
                Self::General
            }
        }
    }

    /// The lowercase wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Theory => "theory",
            Self::Code => "code",
            Self::Planning => "planning",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classifier that issues the routing call
pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
}

impl Classifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classify a query with one blocking generate call.
    ///
    /// Label validation never fails; only a backend failure produces an Err.
    pub async fn classify(&self, query: &str) -> Result<Category> {
        let raw = self
            .generator
            .generate(prompts::ROUTER, query, &TemplateVars::new())
            .await?;
        Ok(Category::from_label(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_labels_map_to_their_category() {
        assert_eq!(Category::from_label("theory"), Category::Theory);
        assert_eq!(Category::from_label("code"), Category::Code);
        assert_eq!(Category::from_label("planning"), Category::Planning);
        assert_eq!(Category::from_label("general"), Category::General);
    }

    #[test]
    fn test_labels_are_trimmed_and_lowercased() {
        assert_eq!(Category::from_label("  Theory \n"), Category::Theory);
        assert_eq!(Category::from_label("CODE"), Category::Code);
    }

    #[test]
    fn test_unknown_labels_coerce_to_general() {
        assert_eq!(Category::from_label("banana"), Category::General);
        assert_eq!(Category::from_label(""), Category::General);
        assert_eq!(
            Category::from_label("planning, probably"),
            Category::General
        );
    }

    #[test]
    fn test_label_roundtrip() {
        for category in [
            Category::Theory,
            Category::Code,
            Category::Planning,
            Category::General,
        ] {
            assert_eq!(Category::from_label(category.label()), category);
        }
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(Category::Planning.to_string(), "planning");
    }
}
