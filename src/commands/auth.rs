//! Session commands: login, register, oauth-callback, logout, whoami

use colored::Colorize;

use crate::auth::{AuthOutcome, AuthService, OAuthCallback};
use crate::commands::{notify, Context};
use crate::error::Result;
use crate::profile::ProfileService;

/// Log in with email and password.
pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    let service = AuthService::new(ctx.session.clone(), ctx.redirect());
    let outcome = service.login(email, password).await?;
    report_login(&outcome, "Login successful");
    Ok(())
}

/// Register a new account and log in.
pub async fn register(
    ctx: &Context,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<()> {
    let service = AuthService::new(ctx.session.clone(), ctx.redirect());
    let outcome = service.register(name, email, password, confirm).await?;
    report_login(&outcome, "Account created");
    Ok(())
}

/// Complete a social login from the browser's redirect URL.
pub async fn oauth_callback(ctx: &Context, url: &str) -> Result<()> {
    let handler = OAuthCallback::new(ctx.session.clone(), ctx.redirect());
    let outcome = handler.handle(url).await?;
    report_login(&outcome, "Successfully logged in");
    Ok(())
}

/// Forget the stored session.
pub async fn logout(ctx: &Context) -> Result<()> {
    AuthService::new(ctx.session.clone(), ctx.redirect())
        .logout()
        .await?;
    notify::success("Logged out");
    Ok(())
}

/// Show who is logged in.
///
/// The profile is fetched when a session exists; a failed fetch is
/// reported but does not fail the command.
pub async fn whoami(ctx: &Context) -> Result<()> {
    if ctx.client().token().await.is_none() {
        notify::info("Not logged in");
        return Ok(());
    }

    match ProfileService::new(ctx.client()).get().await {
        Ok(user) => {
            let name = if user.name.is_empty() { "-" } else { &user.name };
            println!("Logged in as {} ({})", user.email.cyan(), name);
        }
        Err(e) => {
            notify::error(&e, "Failed to load profile");
        }
    }
    Ok(())
}

fn report_login(outcome: &AuthOutcome, headline: &str) {
    let who = outcome
        .user
        .as_ref()
        .map(|u| u.email.clone())
        .filter(|e| !e.is_empty())
        .or_else(|| outcome.session.email.clone());
    match who {
        Some(email) => notify::success(&format!("{} as {}", headline, email)),
        None => notify::success(headline),
    }
    println!("Continue at {}", outcome.navigate_to.cyan());
}
