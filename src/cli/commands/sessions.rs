use anyhow::Result;
use chrono::Utc;
use colored::Colorize;

use super::scan_setup;
use crate::cli::format::{format_cost, format_tokens, ratio_bar};
use crate::cli::GlobalArgs;
use crate::config::Config;
use crate::usage::{active_sessions, ActiveSession};

/// Print active sessions ranked by context saturation
pub async fn run(
    global: &GlobalArgs,
    config: Config,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let (_, mut options) = scan_setup(global, &config);
    if let Some(limit) = limit {
        options.session_limit = limit;
    }
    let lookback_hours = options.lookback.num_hours();

    let now = Utc::now();
    let sessions = tokio::task::spawn_blocking(move || active_sessions(&options, now)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    println!(
        "\n{}",
        format!("  Active Sessions (last {}h)", lookback_hours)
            .bold()
            .bright_yellow()
    );
    println!("{}", "  ─────────────────────────────".dimmed());

    if sessions.is_empty() {
        println!("\n  {}", "No active sessions.".dimmed());
        println!();
        return Ok(());
    }

    println!();
    for session in &sessions {
        print_session(session);
    }

    println!();
    Ok(())
}

fn print_session(session: &ActiveSession) {
    let usage = session.context_usage();
    let bar = ratio_bar(usage, 20);
    let (bar, marker) = if session.is_critical() {
        (bar.red(), "critical".red().bold())
    } else if session.is_near_compaction() {
        (bar.yellow(), "near compaction".yellow())
    } else {
        (bar.green(), "".normal())
    };

    println!(
        "  {} {}",
        session.agent.bold().cyan(),
        session.id.dimmed()
    );
    println!(
        "    {} {} {} / {}  {}",
        bar,
        format!("{:5.1}%", usage * 100.0),
        format_tokens(session.context_tokens),
        format_tokens(session.context_limit),
        marker
    );
    println!(
        "    {}  {} msgs  {}  {}",
        session.model,
        session.message_count,
        format_cost(session.session_cost).bright_yellow(),
        session.last_activity.dimmed()
    );
}
