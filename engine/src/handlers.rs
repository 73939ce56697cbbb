//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - run: Generate an article for a topic
//! - doctor: Validate configuration, output directory and provider access
//! - config show / config path: Inspect configuration
//! - auth set / auth remove: Manage the stored Gemini API key

use anyhow::{Context, Result};
use sdk::errors::{BlogflowErrorExt, EngineError};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::config::{expand_path, Config, VALID_PROVIDERS};
use crate::llm::gemini::GeminiProvider;
use crate::llm::ollama::OllamaProvider;
use crate::llm::{Generator, LLMError, LLMProvider};
use crate::pipeline::{
    write_artifact, PipelineController, PipelineRun, PipelineSettings, DEFAULT_STYLE_GUIDE,
};
use crate::secrets::{scrub_text, SecretManager, GEMINI_KEY_NAME};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// A finished run and where its article was written
#[derive(Debug)]
pub struct RunOutcome {
    pub output_path: PathBuf,
    pub run: PipelineRun,
}

/// Apply `blogflow run` flags on top of the loaded configuration
pub fn apply_run_overrides(config: &mut Config, args: &RunArgs) -> Result<(), EngineError> {
    if let Some(threshold) = args.threshold {
        config.pipeline.quality_threshold = threshold;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.pipeline.max_iterations = max_iterations;
    }
    if let Some(dir) = &args.output_dir {
        config.core.output_dir = expand_path(dir)?;
    }
    if let Some(provider) = &args.provider {
        if !VALID_PROVIDERS.contains(&provider.as_str()) {
            return Err(EngineError::UnknownProvider(provider.clone()));
        }
        config.llm.default_provider = provider.clone();
    }

    config.pipeline.validate()
}

/// Read the style guide at `path`, falling back to the default guide
pub fn load_style_guide(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return DEFAULT_STYLE_GUIDE.to_string();
    };

    match fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!("Style guide {:?} is empty, using default", path);
            DEFAULT_STYLE_GUIDE.to_string()
        }
        Err(e) => {
            tracing::warn!("Cannot read style guide {:?} ({}), using default", path, e);
            DEFAULT_STYLE_GUIDE.to_string()
        }
    }
}

/// Build the configured provider, resolving credentials where needed
pub fn build_provider(
    config: &Config,
    secrets: &SecretManager,
) -> Result<Arc<dyn LLMProvider>, EngineError> {
    match config.llm.default_provider.as_str() {
        "gemini" => {
            let api_key = secrets.resolve_gemini_key()?;
            Ok(Arc::new(GeminiProvider::new(config.llm.gemini.clone(), api_key)))
        }
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            config.llm.ollama.base_url.clone(),
            config.llm.ollama.model.clone(),
        ))),
        other => Err(EngineError::UnknownProvider(other.to_string())),
    }
}

/// Check provider access before any pipeline work starts
pub async fn verify_provider(
    provider: &Arc<dyn LLMProvider>,
    timeout: Duration,
) -> Result<(), EngineError> {
    let result = tokio::time::timeout(timeout, provider.verify_credentials())
        .await
        .unwrap_or_else(|_| Err(LLMError::Timeout));

    match result {
        Ok(()) => Ok(()),
        Err(LLMError::AuthenticationFailed(detail)) => Err(EngineError::InvalidCredentials(
            scrub_text(&format!("{} rejected the API key: {}", provider.name(), detail)),
        )),
        Err(e) => Err(EngineError::LLMProvider(scrub_text(&format!(
            "{} is not reachable: {}",
            provider.name(),
            e
        )))),
    }
}

/// Verify the provider, run the pipeline and write the article.
///
/// Setup failures are returned before any generation call is made.
pub async fn execute_run(
    config: &Config,
    topic: &str,
    style_guide: &str,
    provider: Arc<dyn LLMProvider>,
) -> Result<RunOutcome, EngineError> {
    let timeout = Duration::from_secs(config.llm.request_timeout_secs);
    verify_provider(&provider, timeout).await?;

    let generator = Generator::new(provider, timeout);
    let controller = PipelineController::new(generator, PipelineSettings::from(&config.pipeline));
    let run = controller.run(topic, style_guide).await;

    let output_path = write_artifact(&config.core.output_dir, topic, &run.artifact)?;

    Ok(RunOutcome { output_path, run })
}

/// Generate an article for a topic
pub async fn handle_run(args: RunArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut config = config.clone();
    apply_run_overrides(&mut config, &args).map_err(user_error)?;

    let style_guide = load_style_guide(args.style.as_deref());
    let secrets = SecretManager::default();
    let provider = build_provider(&config, &secrets).map_err(user_error)?;

    if let OutputFormat::Text = format {
        println!("Generating article: {}", args.topic);
        println!("  Provider: {}", provider.name());
        println!();
    }

    let outcome = execute_run(&config, &args.topic, &style_guide, provider)
        .await
        .map_err(user_error)?;

    print_run_summary(&outcome, format)
}

fn print_run_summary(outcome: &RunOutcome, format: OutputFormat) -> Result<()> {
    let run = &outcome.run;
    let artifact = &run.artifact;
    let memory = &run.memory;
    let score = memory.latest_feedback().map(|f| f.score).unwrap_or(0.0);

    match format {
        OutputFormat::Text => {
            println!("✓ Article generation complete!");
            println!();
            println!("Article saved to: {}", outcome.output_path.display());
            println!("Statistics:");
            println!("  • Word Count: {} words", artifact.body.word_count());
            println!("  • Draft Iterations: {}", memory.drafts().len());
            println!("  • Editor Reviews: {}", memory.feedback_count());
            println!("  • Quality Score: {:.1}/10", score);
            println!("  • Keywords: {}", artifact.metadata.keywords.len());
            println!();
            println!("{}", artifact.report);
        }
        OutputFormat::Json => {
            let output = json!({
                "status": "completed",
                "run_id": run.run_id,
                "topic": run.topic,
                "output_path": outcome.output_path,
                "title": artifact.metadata.title,
                "description": artifact.metadata.description,
                "word_count": artifact.body.word_count(),
                "drafts": memory.drafts().len(),
                "reviews": memory.feedback_count(),
                "score": score,
                "keywords": artifact.metadata.keywords,
                "sources": artifact.metadata.sources,
                "report": artifact.report,
                "transitions": run.transitions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Attach the user hint to setup errors and scrub secrets from the message
fn user_error(e: EngineError) -> anyhow::Error {
    anyhow::anyhow!("{}\nHint: {}", scrub_text(&e.to_string()), e.user_hint())
}

/// Validate configuration and check dependencies
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    let mut issues = Vec::new();
    let mut checks: Vec<(&str, String)> = Vec::new();

    // Config is already validated when loaded
    checks.push(("Configuration", "Valid".to_string()));
    checks.push(("Provider", config.llm.default_provider.clone()));

    match probe_output_dir(&config.core.output_dir) {
        Ok(()) => checks.push(("Output directory", "Writable".to_string())),
        Err(e) => {
            checks.push(("Output directory", "Not writable".to_string()));
            issues.push(format!(
                "Cannot write to {:?}: {}",
                config.core.output_dir, e
            ));
        }
    }

    let secrets = SecretManager::default();
    if config.llm.default_provider == "gemini" {
        match secrets.resolve_gemini_key() {
            Ok(_) => checks.push(("Gemini API key", "Configured".to_string())),
            Err(e) => {
                checks.push(("Gemini API key", "Not configured".to_string()));
                issues.push(format!("{} ({})", e, e.user_hint()));
            }
        }
    } else {
        checks.push(("API key", "Not required".to_string()));
    }

    match build_provider(config, &secrets) {
        Ok(provider) => {
            let timeout = Duration::from_secs(config.llm.request_timeout_secs.min(15));
            match verify_provider(&provider, timeout).await {
                Ok(()) => checks.push(("Provider access", "OK".to_string())),
                Err(e) => {
                    checks.push(("Provider access", "Failed".to_string()));
                    issues.push(e.to_string());
                }
            }
        }
        Err(_) => checks.push(("Provider access", "Skipped".to_string())),
    }

    match format {
        OutputFormat::Text => {
            println!("BlogFlow System Diagnostics");
            println!("============================");
            println!();

            println!("System Checks:");
            for (check, status) in &checks {
                println!("  {:<25} {}", format!("{}:", check), status);
            }

            println!();

            if issues.is_empty() {
                println!("✓ All checks passed!");
            } else {
                println!("⚠ Issues found:");
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. {}", i + 1, issue);
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "checks": checks.iter().map(|(name, status)| {
                    json!({
                        "name": name,
                        "status": status
                    })
                }).collect::<Vec<_>>(),
                "issues": issues,
                "healthy": issues.is_empty()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Create the directory if needed and write then remove a probe file
fn probe_output_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let probe = dir.join(".blogflow-write-test");
    fs::write(&probe, b"ok")?;
    fs::remove_file(&probe)
}

/// Print the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let toml = config.to_toml()?;
            println!("{}", toml);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}

/// Print the configuration file path in use
pub fn handle_config_path(override_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    match format {
        OutputFormat::Text => println!("{}", path.display()),
        OutputFormat::Json => println!("{}", json!({ "path": path })),
    }
    Ok(())
}

/// Prompt for the Gemini API key without echo and store it in the keychain
pub fn handle_auth_set(format: OutputFormat) -> Result<()> {
    let key = rpassword::prompt_password_stderr("Gemini API key: ")
        .context("Failed to read API key")?;
    let key = key.trim();

    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    SecretManager::default()
        .set_secret(GEMINI_KEY_NAME, key)
        .map_err(user_error)?;

    match format {
        OutputFormat::Text => println!("✓ Gemini API key stored in keychain."),
        OutputFormat::Json => println!("{}", json!({ "status": "stored" })),
    }
    Ok(())
}

/// Delete the stored Gemini API key
pub fn handle_auth_remove(format: OutputFormat) -> Result<()> {
    SecretManager::default()
        .delete_secret(GEMINI_KEY_NAME)
        .map_err(user_error)?;

    match format {
        OutputFormat::Text => println!("✓ Gemini API key removed from keychain."),
        OutputFormat::Json => println!("{}", json!({ "status": "removed" })),
    }
    Ok(())
}
