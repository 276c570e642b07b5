//! Command handlers

pub mod config;
pub mod records;
pub mod session;
pub mod tenant;

use anyhow::{Context, Result};
use serde::Serialize;
use stockroom_core::{AppContext, Session};

/// Pretty-print any wire type
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}

/// Restore the persisted session and fail unless it is still valid
pub fn signed_in(ctx: &AppContext) -> Result<Session> {
    ctx.session().restore();
    Ok(ctx.session().require()?)
}
