use chrono::{DateTime, Datelike, Utc};

use super::entry::parse_line;
use super::error::{LineError, ScanError};
use super::scanner::{session_files, SessionFile};
use super::stats::ScanStats;
use super::types::{UsageRecord, PROVIDER};
use super::ScanOptions;

/// Collect every positive-cost usage record logged in the current month.
///
/// Files last modified before the start of `now`'s UTC month are skipped
/// without being opened. Records keep directory and line order.
pub fn aggregate_usage(options: &ScanOptions, now: DateTime<Utc>) -> Vec<UsageRecord> {
    let mut stats = ScanStats::default();
    let records = collect_usage(options, now, &mut stats);
    stats.log_summary("usage");
    records
}

/// Same as [`aggregate_usage`], reporting what was dropped into `stats`
pub fn collect_usage(
    options: &ScanOptions,
    now: DateTime<Utc>,
    stats: &mut ScanStats,
) -> Vec<UsageRecord> {
    let start = month_start(now);
    let mut records = Vec::new();

    for item in session_files(&options.agents_dir, &options.layout) {
        let file = match item {
            Ok(file) => file,
            Err(e) => {
                stats.record_scan_error(&e);
                continue;
            }
        };

        if file.is_older_than(start) {
            stats.files_stale += 1;
            continue;
        }

        read_file_usage(&file, &mut records, stats);
    }

    records
}

/// First instant of the UTC calendar month containing `now`
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

fn read_file_usage(file: &SessionFile, records: &mut Vec<UsageRecord>, stats: &mut ScanStats) {
    let file_records = file.lines().and_then(|lines| {
        file_usage(&file.agent, lines, stats).map_err(|source| ScanError::ReadFile {
            path: file.path.clone(),
            source,
        })
    });

    match file_records {
        Ok(mut file_records) => {
            stats.files_scanned += 1;
            records.append(&mut file_records);
        }
        Err(e) => stats.record_scan_error(&e),
    }
}

/// Records from one log. A read error that ends the file discards the
/// records collected from it so far.
fn file_usage<I>(
    agent: &str,
    lines: I,
    stats: &mut ScanStats,
) -> Result<Vec<UsageRecord>, LineError>
where
    I: Iterator<Item = Result<String, LineError>>,
{
    let mut records = Vec::new();

    for line in lines {
        match line.and_then(|l| parse_line(&l)) {
            Ok(Some(entry)) => {
                stats.lines_used += 1;
                if entry.cost > 0.0 {
                    records.push(UsageRecord {
                        provider: PROVIDER.to_string(),
                        agent: agent.to_string(),
                        input_tokens: entry.input_tokens(),
                        output_tokens: entry.output_tokens(),
                        cost: entry.cost,
                        model: entry.model,
                        timestamp: entry.timestamp,
                    });
                }
            }
            Ok(None) => stats.lines_filtered += 1,
            Err(e) if e.ends_file() => return Err(e),
            Err(e) => stats.record_line_error(&e),
        }
    }

    Ok(records)
}
