//! Recommendation commands

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::api::types::{score_to_percent, Recommendation, ScoreBreakdown};
use crate::cli::RecommendationCommand;
use crate::commands::{notify, Context};
use crate::error::{LinkrecError, Result};
use crate::recommendations::{CategoryFilter, RecommendationService};

/// Handle `recommendations` subcommands
pub async fn handle_recommendations(ctx: &Context, command: RecommendationCommand) -> Result<()> {
    let service = RecommendationService::new(ctx.client());
    let default_limit = ctx.config.recommendations.default_limit;

    match command {
        RecommendationCommand::List {
            category,
            limit,
            json,
        } => {
            let filter = CategoryFilter::from_option(category.as_deref());
            let items = service
                .list(&filter, limit.unwrap_or(default_limit))
                .await?;

            if json {
                let out =
                    serde_json::to_string_pretty(&items).map_err(LinkrecError::Serialization)?;
                println!("{}", out);
            } else if items.is_empty() {
                println!("{}", "No recommendations found.".yellow());
            } else {
                println!("\nRecommendations ({}):", filter);
                print_recommendations(&items);
            }
        }
        RecommendationCommand::Feedback { id, kind, comment } => {
            service.feedback(&id, kind, comment).await?;
            notify::success(&format!("Feedback recorded ({})", kind));
        }
        RecommendationCommand::Save {
            id,
            category,
            limit,
        } => {
            let filter = CategoryFilter::from_option(category.as_deref());
            let item = service
                .find(&id, &filter, limit.unwrap_or(default_limit))
                .await?
                .ok_or_else(|| {
                    LinkrecError::Validation(format!(
                        "Recommendation {} not found; try a larger --limit",
                        id
                    ))
                })?;
            service.save(&item).await?;
            notify::success(&format!("Saved \"{}\" to bookmarks", item.title));
        }
    }
    Ok(())
}

/// Print recommendations as a table in the order received.
pub(crate) fn print_recommendations(items: &[Recommendation]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row![
        "ID".bold(),
        "Title".bold(),
        "Score".bold(),
        "Category".bold(),
        "Why".bold()
    ]);

    for rec in items {
        let why = match &rec.score_breakdown {
            Some(b) => format!("{}\n{}", truncate(&rec.reason, 60), breakdown_line(b)),
            None => truncate(&rec.reason, 60),
        };
        table.add_row(row![
            rec.id.cyan(),
            format!("{}\n{}", truncate(&rec.title, 50), rec.url),
            format!("{:.0}%", rec.score_percent()),
            rec.category.as_deref().unwrap_or("-"),
            why
        ]);
    }

    table.printstd();
    println!();
}

fn breakdown_line(b: &ScoreBreakdown) -> String {
    [
        ("tech", b.technology),
        ("content", b.content),
        ("difficulty", b.difficulty),
        ("intent", b.intent),
        ("semantic", b.semantic),
    ]
    .into_iter()
    .filter_map(|(label, v)| v.map(|v| format!("{} {:.0}%", label, score_to_percent(v))))
    .collect::<Vec<_>>()
    .join(" · ")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
