// BlogFlow Engine
// Main entry point for the blogflow binary

use clap::Parser;
use blogflow_engine::cli::{AuthAction, Cli, Command, ConfigAction};
use blogflow_engine::config::Config;
use blogflow_engine::handlers::{
    handle_auth_remove, handle_auth_set, handle_config_path, handle_config_show, handle_doctor,
    handle_run, OutputFormat,
};
use blogflow_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // `config path` and `auth` work even when the config file is broken
    match &cli.command {
        Command::Config {
            action: ConfigAction::Path,
        } => return handle_config_path(cli.config.as_deref(), format),
        Command::Auth { action } => {
            init_telemetry_with_level(cli.log.as_deref().unwrap_or("info"));
            return match action {
                AuthAction::Set => handle_auth_set(format),
                AuthAction::Remove => handle_auth_remove(format),
            };
        }
        _ => {}
    }

    // Load configuration (or use custom path if provided)
    let config = Config::load(cli.config.as_deref())?;

    // --log beats the config level; RUST_LOG beats both
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(config.core.log_level.as_str()));

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("BlogFlow Engine v{} ({} - {})", version, commit, timestamp);

    // Handle commands
    match cli.command {
        Command::Run(args) => {
            tracing::info!("Generating article: {}", args.topic);
            handle_run(args, &config, format).await
        }

        Command::Doctor => {
            tracing::info!("Running diagnostics...");
            handle_doctor(&config, format).await
        }

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format),
            ConfigAction::Path => handle_config_path(cli.config.as_deref(), format),
        },

        Command::Auth { .. } => Ok(()),
    }
}
