//! BlogFlow Engine Library
//!
//! This library provides the core functionality of the BlogFlow engine:
//! the research → draft → optimize → review pipeline with its bounded
//! revision loop, the generation providers it runs on, and the outer
//! surfaces (configuration, secrets, CLI). It is used by both the main
//! binary and integration tests.

/// Configuration management module
pub mod config;

/// Secret management module
pub mod secrets;

/// LLM provider abstraction layer
pub mod llm;

/// Pipeline stages, memory and controller
pub mod pipeline;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
