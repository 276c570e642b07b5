//! Navigation and sign-in commands

use anyhow::Result;
use colored::Colorize;
use stockroom_api_types::{LoginRequest, SignupRequest};
use stockroom_core::{AppContext, NavigationDecision, View};
use tracing::info;

/// Resolve the tenant for `host`, restore the session and print what the
/// shell would do for `path`
pub async fn handle_navigate(ctx: &AppContext, host: &str, path: &str) -> Result<()> {
    ctx.start(host).await;
    let decision = ctx.navigate(path);

    let line = match &decision {
        NavigationDecision::RenderRoute(View::ResolutionError { .. }) => decision.to_string().red(),
        NavigationDecision::RenderRoute(_) => decision.to_string().green(),
        NavigationDecision::ClientRedirect(_) => decision.to_string().yellow(),
        NavigationDecision::CrossOriginRedirect(_) => decision.to_string().magenta(),
    };
    println!("{}", line);
    Ok(())
}

pub async fn handle_login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };
    let session = ctx.session().login(&request).await?;
    println!(
        "{} Signed in as {} until {}",
        "✓".green(),
        session.subject.bold(),
        session.expires_at.to_rfc3339()
    );
    Ok(())
}

pub async fn handle_signup(ctx: &AppContext, username: &str, email: &str, password: &str) -> Result<()> {
    let request = SignupRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    let session = ctx.session().signup(&request).await?;
    println!("{} Registered and signed in as {}", "✓".green(), session.subject.bold());
    Ok(())
}

pub fn handle_logout(ctx: &AppContext) -> Result<()> {
    ctx.session().restore();
    ctx.session().logout();
    info!("Persisted session cleared");
    println!("Signed out");
    Ok(())
}

pub fn handle_whoami(ctx: &AppContext) -> Result<()> {
    let Some(session) = ctx.session().restore() else {
        println!("{}", "Not signed in".yellow());
        return Ok(());
    };

    let role = session
        .display_role()
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("{} {}", "user:   ".dimmed(), session.subject.bold());
    println!("{} {}", "email:  ".dimmed(), session.email);
    println!("{} {}", "role:   ".dimmed(), role);
    println!("{} {}", "expires:".dimmed(), session.expires_at.to_rfc3339());
    Ok(())
}
