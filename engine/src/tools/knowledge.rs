//! Knowledge base lookup
//!
//! A small fixed mapping from topic categories to canned facts. Lookup is
//! deterministic and has no side effects: first try a category whose name
//! occurs in the topic, then fall back to word overlap against the first
//! three topic tokens, then report that nothing was found.

/// Facts per category. Order matters: categories are scanned front to back.
const KNOWLEDGE_BASE: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            "Python is a high-level interpreted programming language",
            "Core data structures: list, dict, tuple, set",
            "Functions are defined with def, classes with class",
            "Python supports object-oriented, functional and imperative styles",
        ],
    ),
    (
        "algorithm",
        &[
            "An algorithm is a finite sequence of steps that solves a problem",
            "Algorithm complexity is measured in Big O notation (O(1), O(n), O(n^2), O(log n))",
            "Classic sorting algorithms: bubble sort, quick sort, merge sort, heap sort",
            "Search algorithms: linear (O(n)), binary (O(log n)) on sorted input",
        ],
    ),
    (
        "data structure",
        &[
            "An array is a contiguous memory area holding elements of one type",
            "A linked list stores nodes that carry data and a pointer to the next node",
            "A stack is LIFO (Last In, First Out) with push and pop operations",
            "A queue is FIFO (First In, First Out) with enqueue and dequeue operations",
        ],
    ),
    (
        "multi-agent system",
        &[
            "A multi-agent system is a set of autonomous agents interacting in one environment",
            "An agent perceives its environment and acts on it autonomously",
            "Common multi-agent patterns: Router, Planner-Executor, Supervisor",
            "Dispatch graphs model agent interaction as nodes with conditional edges",
        ],
    ),
    (
        "langchain",
        &[
            "LangChain is a framework for building applications on language models",
            "Its main concepts are Prompts, Chains, Agents and Tools",
            "Memory components preserve state between model calls",
            "LangGraph extends it with cyclic graphs for multi-agent systems",
        ],
    ),
    (
        "machine learning",
        &[
            "Machine learning is the subset of AI where algorithms learn from data",
            "Learning regimes: supervised, unsupervised and reinforcement learning",
            "Neural networks are built from input, hidden and output layers",
            "LLMs (Large Language Models) are trained on huge text corpora",
        ],
    ),
];

/// Facts returned per lookup, at most
const MAX_FACTS: usize = 3;

/// Message returned when neither match tier finds anything
const NOT_FOUND: &str = "Information on this topic not found. Please clarify your query.";

/// Static knowledge lookup tool
pub struct KnowledgeBase;

impl KnowledgeBase {
    pub fn new() -> Self {
        Self
    }

    /// Look up facts for a free-text topic.
    ///
    /// Match policy, in order: (a) a category whose name is a substring of
    /// the lowercased topic wins and contributes up to 3 of its facts;
    /// (b) otherwise any fact sharing a word with the first 3 whitespace
    /// tokens of the topic, stopping at 3 matches; (c) otherwise the fixed
    /// not-found message.
    pub fn lookup(&self, topic: &str) -> String {
        let topic_lower = topic.to_lowercase();

        for (category, facts) in KNOWLEDGE_BASE {
            if topic_lower.contains(category) {
                return facts
                    .iter()
                    .take(MAX_FACTS)
                    .map(|fact| format!("- {fact}"))
                    .collect::<Vec<_>>()
                    .join("\n");
            }
        }

        let tokens: Vec<&str> = topic_lower.split_whitespace().take(3).collect();
        let mut results = Vec::new();
        'categories: for (_, facts) in KNOWLEDGE_BASE {
            for fact in *facts {
                let fact_lower = fact.to_lowercase();
                if tokens.iter().any(|word| fact_lower.contains(word)) {
                    results.push(format!("- {fact}"));
                    if results.len() >= MAX_FACTS {
                        break 'categories;
                    }
                }
            }
        }

        if results.is_empty() {
            NOT_FOUND.to_string()
        } else {
            results.join("\n")
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_substring_match() {
        let kb = KnowledgeBase::new();
        let result = kb.lookup("What is Python?");

        assert!(result.contains("high-level interpreted"));
        assert_eq!(result.lines().count(), 3);
        assert!(result.lines().all(|line| line.starts_with("- ")));
    }

    #[test]
    fn test_category_match_is_case_insensitive() {
        let kb = KnowledgeBase::new();
        let result = kb.lookup("Explain MACHINE LEARNING basics");
        assert!(result.contains("learn from data"));
    }

    #[test]
    fn test_keyword_fallback_match() {
        let kb = KnowledgeBase::new();
        // No category name present, but "stack" appears in the data
        // structure facts.
        let result = kb.lookup("stack usage");
        assert!(result.contains("LIFO"));
    }

    #[test]
    fn test_fallback_caps_at_three_facts() {
        let kb = KnowledgeBase::new();
        // "is" occurs in many facts across categories.
        let result = kb.lookup("is it true");
        assert_eq!(result.lines().count(), 3);
    }

    #[test]
    fn test_not_found_message() {
        let kb = KnowledgeBase::new();
        assert_eq!(
            kb.lookup("zzz_nonexistent_topic"),
            "Information on this topic not found. Please clarify your query."
        );
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let kb = KnowledgeBase::new();
        assert_eq!(kb.lookup("algorithm basics"), kb.lookup("algorithm basics"));
    }
}
