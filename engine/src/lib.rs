//! StudyCoder Engine Library
//!
//! This library provides the core functionality of the StudyCoder assistant:
//! a classifier-driven dispatch graph that routes a query to one of four
//! response agents, a bounded session memory, and three built-in tools.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Error types module
pub mod errors;

/// Text generator abstraction layer
pub mod llm;

/// Routing and orchestration module
pub mod agent;

/// Session memory module
pub mod memory;

/// Built-in tools module
pub mod tools;

/// Telemetry and observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
