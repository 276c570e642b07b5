//! CLI argument parsing definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Host the shell is running on; its first label selects the tenant
    #[arg(long, value_name = "HOST", global = true, default_value = "localhost")]
    pub host: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the tenant, restore the session and decide a navigation
    Navigate {
        /// Requested in-app path
        #[arg(long, value_name = "PATH", default_value = "/")]
        path: String,
    },

    /// Sign in and persist the session
    Login {
        #[arg(long, value_name = "NAME")]
        username: String,

        #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Register a new account and sign in
    Signup {
        #[arg(long, value_name = "NAME")]
        username: String,

        #[arg(long, value_name = "EMAIL")]
        email: String,

        #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Drop the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Tenant configuration commands
    Tenant {
        #[command(subcommand)]
        tenant_cmd: TenantCommands,
    },

    /// List, show or delete records of one entity
    Records {
        #[arg(value_enum)]
        entity: Entity,

        #[command(subcommand)]
        action: RecordAction,
    },

    /// List the batches received for a product
    BatchesFor {
        #[arg(value_name = "PRODUCT_ID")]
        product_id: String,
    },

    /// Ask a free-text question about the tenant's data
    Chat {
        #[arg(required = true, num_args = 1.., value_name = "PROMPT")]
        prompt: Vec<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TenantCommands {
    /// Show the resolution outcome for --host
    Show,

    /// Fetch the current tenant's configuration (requires sign-in)
    Fetch,

    /// Replace the tenant's configuration with a YAML or JSON document
    Update {
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },

    /// Create a default configuration for a tenant that has none
    Init,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Products,
    Suppliers,
    Invoices,
    Batches,
    Transactions,
    Users,
}

#[derive(Subcommand)]
pub enum RecordAction {
    List,

    Get {
        /// Record key (product id, supplier id, invoice number, ...)
        key: String,

        /// Invoice number, for batches
        #[arg(long, value_name = "INVOICE_NO")]
        invoice: Option<String>,
    },

    Delete {
        key: String,

        /// Invoice number, for batches
        #[arg(long, value_name = "INVOICE_NO")]
        invoice: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print or write a sample configuration file
    Sample {
        /// Output file path; prints to stdout when omitted
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },
}
