//! Tenant configuration commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use stockroom_api_types::TenantConfig;
use stockroom_core::{AppContext, ResolutionState};

use super::print_json;

pub async fn handle_show(ctx: &AppContext, host: &str) -> Result<()> {
    let state = ctx.tenant().initialize(host).await;
    match &state {
        ResolutionState::Resolved(config) => {
            let key = ctx.tenant().tenant_key().map(|k| k.to_string()).unwrap_or_default();
            println!("{} {}", "Tenant".green(), config.display_name(&key).bold());
            print_json(config)
        }
        ResolutionState::NoTenant => {
            println!("{} has no tenant label", host);
            Ok(())
        }
        other => bail!("{}", other),
    }
}

pub async fn handle_fetch(ctx: &AppContext, host: &str) -> Result<()> {
    ctx.start(host).await;
    ctx.session().require()?;
    match ctx.tenant().fetch_current_config().await? {
        Some(config) => print_json(&config),
        None => {
            println!(
                "{}",
                "No configuration yet; run `stockroom tenant init` to create one".yellow()
            );
            Ok(())
        }
    }
}

pub async fn handle_update(ctx: &AppContext, host: &str, file: &Path) -> Result<()> {
    let config = read_config(file)?;
    ctx.start(host).await;
    ctx.session().require()?;

    let updated = ctx.tenant().update_config(&config).await?;
    println!("{} Configuration replaced", "✓".green());
    print_json(&updated)
}

pub async fn handle_init(ctx: &AppContext, host: &str) -> Result<()> {
    ctx.start(host).await;
    ctx.session().require()?;

    let config = ctx.tenant().initialize_default_config().await?;
    println!("{} Default configuration created", "✓".green());
    print_json(&config)
}

/// YAML parser also accepts JSON documents
fn read_config(file: &Path) -> Result<TenantConfig> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("Invalid tenant configuration in {}", file.display()))
}
