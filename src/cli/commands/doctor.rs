use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use std::collections::BTreeSet;

use super::scan_setup;
use crate::cli::format::format_tokens;
use crate::cli::GlobalArgs;
use crate::config::{config_path, Config};
use crate::paths::{display_path, DetectionSource};
use crate::usage::active::collect_sessions;
use crate::usage::ledger::collect_usage;
use crate::usage::scanner::session_files;
use crate::usage::stats::ScanStats;

/// Print resolved paths, scan diagnostics and the context limit table
pub async fn run(global: &GlobalArgs, config: Config) -> Result<()> {
    let (agents_dir, options) = scan_setup(global, &config);
    let config_file = config_path(global.config.as_deref())?;

    println!("\n{}", "  AgentMeter Doctor".bold().bright_yellow());
    println!("{}", "  ─────────────────────────────".dimmed());

    println!("\n  {}", "Paths:".bold());
    println!("    {:>12} {}", "config", display_path(&config_file));
    let source = match agents_dir.source {
        DetectionSource::NotFound => agents_dir.source.to_string().red(),
        _ => agents_dir.source.to_string().green(),
    };
    println!(
        "    {:>12} {} ({})",
        "agents",
        display_path(&agents_dir.path),
        source
    );

    let now = Utc::now();
    let (agents, files, usage_stats, session_stats, records, sessions) =
        tokio::task::spawn_blocking(move || {
            let mut agents = BTreeSet::new();
            let mut files = 0usize;
            for file in session_files(&options.agents_dir, &options.layout).flatten() {
                agents.insert(file.agent);
                files += 1;
            }

            let mut usage_stats = ScanStats::default();
            let records = collect_usage(&options, now, &mut usage_stats).len();
            let mut session_stats = ScanStats::default();
            let sessions = collect_sessions(&options, now, &mut session_stats).len();

            (agents, files, usage_stats, session_stats, records, sessions)
        })
        .await?;

    println!("\n  {}", "Agents:".bold());
    if agents.is_empty() {
        println!("    {}", "none found".dimmed());
    }
    for agent in &agents {
        println!("    {}", agent.cyan());
    }
    println!("    {} session files", files.to_string().bright_yellow());

    println!("\n  {}", "Scan:".bold());
    print_stats("usage", records, "records", &usage_stats);
    print_stats("sessions", sessions, "active", &session_stats);

    println!("\n  {}", "Context Limits:".bold());
    let limits = config.scan_options(agents_dir.path).context_limits;
    for rule in limits.rules() {
        println!(
            "    {} {}",
            format!("{:>20}", rule.pattern).cyan(),
            format_tokens(rule.limit)
        );
    }
    println!(
        "    {} {}",
        format!("{:>20}", "(default)").dimmed(),
        format_tokens(limits.default_limit())
    );

    println!();
    Ok(())
}

fn print_stats(label: &str, produced: usize, noun: &str, stats: &ScanStats) {
    println!(
        "    {:>12} {} {}, {} files read, {} stale, {} unreadable, {} lines dropped",
        label,
        produced.to_string().bright_yellow(),
        noun,
        stats.files_scanned,
        stats.files_stale,
        stats.files_failed + stats.dirs_failed,
        stats.lines_dropped
    );
}
