//! Error types and handling
//!
//! This module provides the error types surfaced to users of the BlogFlow engine.
//! All errors implement the `BlogflowErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! Pipeline stages never return these errors: generation failures degrade to
//! placeholder data inside the engine. `EngineError` covers the surfaces around
//! the pipeline (configuration, credentials, output files).
//!
//! # Security
//!
//! Hints are static strings and never contain API keys or file contents.

use thiserror::Error;

/// Trait for BlogFlow error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait BlogflowErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is safe to display to end users and does not contain
    /// secrets or internal implementation details.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around. Non-recoverable
    /// errors require the user to fix their setup first.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: Invalid or missing configuration values
/// - **Credentials**: Missing or rejected API keys
/// - **LLM Provider**: Provider unreachable before the pipeline starts
/// - **Output**: Writing the published article failed
///
/// # Examples
///
/// ```
/// use sdk::errors::{BlogflowErrorExt, EngineError};
///
/// let error = EngineError::MissingCredentials("GOOGLE_API_KEY".to_string());
/// println!("Hint: {}", error.user_hint());
/// assert!(!error.is_recoverable());
///
/// let output_error = EngineError::Output("disk full".to_string());
/// assert!(output_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Credential errors
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    // LLM provider errors
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    // Keyring errors
    #[error("Keyring error: {0}")]
    KeyringError(String),

    // Output errors
    #[error("Output error: {0}")]
    Output(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogflowErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",

            Self::MissingCredentials(_) => {
                "Set GOOGLE_API_KEY in your environment or .env file, or run 'blogflow auth set'"
            }
            Self::InvalidCredentials(_) => {
                "The API key was rejected. Get a new key from https://aistudio.google.com/app/apikey"
            }

            Self::LLMProvider(_) => "LLM provider unavailable. Check your API keys and network",
            Self::UnknownProvider(_) => "Supported providers are 'gemini' and 'ollama'",

            Self::KeyringError(_) => "Failed to access secure storage. Check system keychain",

            Self::Output(_) => "Could not write the article. Check the output directory",

            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Setup problems that need user action
            Self::MissingCredentials(_)
            | Self::InvalidCredentials(_)
            | Self::UnknownProvider(_)
            | Self::Config(_) => false,

            _ => true,
        }
    }
}
