//! Configuration commands

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use stockroom_config::{ConfigLoader, StockroomConfig};
use tracing::{error, info};

pub fn handle_config_sample(output: Option<&Path>, force: bool) -> Result<()> {
    let sample = StockroomConfig::generate_sample();
    let Some(output) = output else {
        print!("{}", sample);
        return Ok(());
    };

    if output.exists() && !force {
        return Err(anyhow!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        ));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(output, sample).context("Failed to write configuration file")?;

    println!("{} Sample configuration written to {}", "✓".green(), output.display());
    println!(
        "Validate with: stockroom config validate --config-file {}",
        output.display()
    );
    Ok(())
}

pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {}", config_file.display());
    if !config_file.exists() {
        return Err(anyhow!("Configuration file not found: {}", config_file.display()));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_) => {
            println!("{} Configuration file is valid", "✓".green());
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration validation failed: {}", "✗".red(), e);
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}
