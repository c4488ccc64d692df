//! Profile commands

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::api::types::{ProfileUpdate, User};
use crate::cli::ProfileCommand;
use crate::commands::{notify, Context};
use crate::error::{LinkrecError, Result};
use crate::profile::ProfileService;

/// Handle `profile` subcommands
pub async fn handle_profile(ctx: &Context, command: ProfileCommand) -> Result<()> {
    let service = ProfileService::new(ctx.client());

    match command {
        ProfileCommand::Show { json } => {
            let user = service.get().await?;
            if json {
                let out = serde_json::to_string_pretty(&user).map_err(LinkrecError::Serialization)?;
                println!("{}", out);
            } else {
                print_user(&user);
            }
        }
        ProfileCommand::Update { name, email, bio } => {
            let user = service.update(ProfileUpdate { name, email, bio }).await?;
            notify::success("Profile updated");
            print_user(&user);
        }
        ProfileCommand::Password {
            current,
            new,
            confirm,
        } => {
            service.change_password(&current, &new, &confirm).await?;
            notify::success("Password changed");
        }
    }
    Ok(())
}

fn print_user(user: &User) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    let dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    table.add_row(row!["ID".bold(), dash(&user.id)]);
    table.add_row(row!["Name".bold(), dash(&user.name)]);
    table.add_row(row!["Email".bold(), dash(&user.email)]);
    table.add_row(row![
        "Bio".bold(),
        user.bio.clone().unwrap_or_else(|| "-".to_string())
    ]);
    table.add_row(row![
        "Member since".bold(),
        user.created_at.clone().unwrap_or_else(|| "-".to_string())
    ]);

    println!("\nProfile:");
    table.printstd();
    println!();
}
