//! The `analyze` command: run the content pipeline for one post

use colored::Colorize;
use prettytable::{format, row, Table};

use crate::analyzer::{ContentPipeline, ContentReport};
use crate::commands::recommendations::print_recommendations;
use crate::commands::{notify, Context};
use crate::error::{LinkrecError, Result};

/// Extract, analyze and recommend for `url`.
///
/// # Arguments
///
/// * `ctx` - Command context
/// * `url` - LinkedIn post URL
/// * `json` - Print the full report as JSON instead of tables
pub async fn run_analyze(ctx: &Context, url: &str, json: bool) -> Result<()> {
    let pipeline = ContentPipeline::new(ctx.client(), ctx.config.recommendations.max_generated);
    let report = pipeline.run(url).await?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(LinkrecError::Serialization)?;
        println!("{}", out);
        return Ok(());
    }

    print_report(&report);
    notify::success(&format!(
        "Generated {} recommendations",
        report.recommendations.len()
    ));
    Ok(())
}

fn print_report(report: &ContentReport) {
    let list = |v: &[String]| {
        if v.is_empty() {
            "-".to_string()
        } else {
            v.join(", ")
        }
    };

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["Title".bold(), report.extracted.title]);
    table.add_row(row![
        "Extraction".bold(),
        format!(
            "{} (quality {:.2})",
            report.extracted.extraction_method, report.extracted.quality_score
        )
    ]);
    table.add_row(row!["Summary".bold(), report.analysis.summary]);
    table.add_row(row![
        "Technologies".bold(),
        list(&report.analysis.technologies)
    ]);
    table.add_row(row!["Content type".bold(), report.analysis.content_type]);
    table.add_row(row!["Difficulty".bold(), report.analysis.difficulty]);
    table.add_row(row![
        "Learning goals".bold(),
        list(&report.analysis.learning_goals)
    ]);

    println!("\nAnalysis of {}:", report.url.cyan());
    table.printstd();
    println!();

    if report.recommendations.is_empty() {
        println!("{}", "No recommendations generated.".yellow());
    } else {
        println!("Recommendations:");
        print_recommendations(&report.recommendations);
    }
}
