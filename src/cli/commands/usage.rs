use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use super::scan_setup;
use crate::cli::format::{format_cost, format_tokens, ratio_bar};
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::usage::aggregate_usage;
use crate::usage::summary::summarize;

/// Print the current month's usage ledger
pub async fn run(global: &GlobalArgs, config: Config, json: bool) -> Result<()> {
    let (_, options) = scan_setup(global, &config);
    let now = Utc::now();
    let records = tokio::task::spawn_blocking(move || aggregate_usage(&options, now)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let summary = summarize(&records);

    println!(
        "\n{}",
        format!("  AgentMeter Usage ({})", now.format("%Y-%m"))
            .bold()
            .bright_yellow()
    );
    println!("{}", "  ─────────────────────────────".dimmed());

    println!(
        "\n  {} {} over {} calls, {} in / {} out tokens",
        "Total:".bold(),
        format_cost(summary.total_cost).bright_yellow(),
        summary.record_count.to_string().bright_yellow(),
        format_tokens(summary.total_input_tokens),
        format_tokens(summary.total_output_tokens)
    );

    if summary.by_agent.is_empty() {
        println!("\n  {}", "No usage recorded this month.".dimmed());
        println!();
        return Ok(());
    }

    println!("\n  {}", "By Agent:".bold());
    for agent in &summary.by_agent {
        println!(
            "    {} {} {} {}",
            format!("{:>20}", agent.name).cyan(),
            ratio_bar(agent.percentage / 100.0, 20).bright_yellow(),
            format!("{:>9}", format_cost(agent.cost)),
            format!("{:5.1}%", agent.percentage).dimmed()
        );
    }

    if !summary.by_day.is_empty() {
        println!("\n  {}", "By Day:".bold());
        let max_cost = summary
            .by_day
            .iter()
            .map(|d| d.cost)
            .fold(0.0f64, f64::max);
        for day in &summary.by_day {
            let ratio = if max_cost > 0.0 { day.cost / max_cost } else { 0.0 };
            println!(
                "  {} {} {}",
                day.date.dimmed(),
                ratio_bar(ratio, 30).bright_yellow(),
                format_cost(day.cost).dimmed()
            );
        }
    }

    println!();
    Ok(())
}
