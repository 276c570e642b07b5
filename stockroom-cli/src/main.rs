use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stockroom_config::{ConfigLoader, LogLevel, StockroomConfig};
use stockroom_core::AppContext;
use stockroom_logging::{init_logging_from_config, init_simple_tracing};
use tracing::{debug, info, warn};

mod cli;
mod commands;

use cli::{Cli, Commands, ConfigCommands, TenantCommands};
use commands::{config, records, session, tenant};

/// Load configuration from file or use defaults
fn load_config(config_path: Option<&PathBuf>) -> Result<StockroomConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => {
            if path.exists() {
                info!("Loading configuration from: {:?}", path);
                loader
                    .from_file(path)
                    .context(format!("Failed to load configuration from {:?}", path))
            } else {
                warn!("Configuration file not found: {:?}. Using defaults.", path);
                loader
                    .from_env()
                    .context("Failed to load configuration from environment")
            }
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            loader
                .from_env()
                .context("Failed to load configuration from environment")
        }
    }
}

/// Initialize logging from configuration with fallback to simple tracing
fn init_logging_with_config(config: &StockroomConfig, log_level: Option<&String>) -> Result<()> {
    // CLI log level overrides the configured one
    let mut logging_config = config.logging.clone();
    if let Some(level_str) = log_level {
        if let Ok(level) = level_str.parse::<LogLevel>() {
            logging_config.level = level;
        }
    }

    match init_logging_from_config(&logging_config) {
        Ok(()) => {
            debug!("Structured logging initialized");
        }
        Err(e) => {
            eprintln!(
                "Failed to initialize structured logging: {}, falling back to simple tracing",
                e
            );
            init_simple_tracing(log_level.map(String::as_str).unwrap_or("info"))?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref())?;
    init_logging_with_config(&config, cli.log_level.as_ref())?;

    // Config commands never touch the backend or the credential store
    if let Commands::Config { config_cmd } = &cli.command {
        return match config_cmd {
            ConfigCommands::Sample { output, force } => {
                config::handle_config_sample(output.as_deref(), *force)
            }
            ConfigCommands::Validate { config_file } => config::handle_config_validate(config_file),
        };
    }

    let ctx = AppContext::open(config).context("Failed to start")?;
    let host = cli.host.as_str();

    match &cli.command {
        Commands::Navigate { path } => session::handle_navigate(&ctx, host, path).await,
        Commands::Login { username, password } => session::handle_login(&ctx, username, password).await,
        Commands::Signup {
            username,
            email,
            password,
        } => session::handle_signup(&ctx, username, email, password).await,
        Commands::Logout => session::handle_logout(&ctx),
        Commands::Whoami => session::handle_whoami(&ctx),
        Commands::Tenant { tenant_cmd } => match tenant_cmd {
            TenantCommands::Show => tenant::handle_show(&ctx, host).await,
            TenantCommands::Fetch => tenant::handle_fetch(&ctx, host).await,
            TenantCommands::Update { file } => tenant::handle_update(&ctx, host, file).await,
            TenantCommands::Init => tenant::handle_init(&ctx, host).await,
        },
        Commands::Records { entity, action } => records::handle_records(&ctx, *entity, action).await,
        Commands::BatchesFor { product_id } => records::handle_batches_for(&ctx, product_id).await,
        Commands::Chat { prompt } => records::handle_chat(&ctx, prompt).await,
        Commands::Config { .. } => Ok(()),
    }
}
