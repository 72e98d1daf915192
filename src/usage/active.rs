use chrono::{DateTime, Utc};

use super::entry::{parse_line, UsageEntry};
use super::error::{LineError, ScanError};
use super::limits::ContextLimits;
use super::scanner::{session_files, SessionFile};
use super::stats::ScanStats;
use super::types::ActiveSession;
use super::ScanOptions;

/// Rank recently active sessions by how full their context window is.
///
/// Only files modified within `options.lookback` of `now` are read. The result
/// is sorted by saturation, highest first, and holds at most
/// `options.session_limit` entries.
pub fn active_sessions(options: &ScanOptions, now: DateTime<Utc>) -> Vec<ActiveSession> {
    let mut stats = ScanStats::default();
    let sessions = collect_sessions(options, now, &mut stats);
    stats.log_summary("sessions");
    sessions
}

/// Same as [`active_sessions`], reporting what was dropped into `stats`
pub fn collect_sessions(
    options: &ScanOptions,
    now: DateTime<Utc>,
    stats: &mut ScanStats,
) -> Vec<ActiveSession> {
    let cutoff = now - options.lookback;
    let mut sessions = Vec::new();

    for item in session_files(&options.agents_dir, &options.layout) {
        let file = match item {
            Ok(file) => file,
            Err(e) => {
                stats.record_scan_error(&e);
                continue;
            }
        };

        if file.is_older_than(cutoff) {
            stats.files_stale += 1;
            continue;
        }

        if let Some(session) = inspect_session(&file, &options.context_limits, stats) {
            sessions.push(session);
        }
    }

    rank_by_saturation(&mut sessions, options.session_limit);
    sessions
}

/// Sort by `context_tokens / context_limit` descending, then keep the top `limit`
pub fn rank_by_saturation(sessions: &mut Vec<ActiveSession>, limit: usize) {
    sessions.sort_by(|a, b| b.context_usage().total_cmp(&a.context_usage()));
    sessions.truncate(limit);
}

/// Running totals for one session file, filled newest line first
#[derive(Debug, Default)]
struct SessionAccumulator {
    context_tokens: u64,
    model: Option<String>,
    last_activity: String,
    message_count: usize,
    session_cost: f64,
}

impl SessionAccumulator {
    fn add(&mut self, entry: UsageEntry) {
        self.session_cost += entry.cost;
        self.message_count += 1;

        // Newest line with a non-empty context wins; older lines never overwrite it
        if self.context_tokens == 0 {
            self.context_tokens = entry.input_tokens();
            self.model = Some(entry.model);
            self.last_activity = entry.timestamp;
        }
    }
}

fn inspect_session(
    file: &SessionFile,
    limits: &ContextLimits,
    stats: &mut ScanStats,
) -> Option<ActiveSession> {
    let acc = file.lines().and_then(|lines| {
        accumulate(lines, stats).map_err(|source| ScanError::ReadFile {
            path: file.path.clone(),
            source,
        })
    });
    let acc = match acc {
        Ok(acc) => acc,
        Err(e) => {
            stats.record_scan_error(&e);
            return None;
        }
    };
    stats.files_scanned += 1;

    if acc.context_tokens == 0 {
        return None;
    }

    let id = file.session_id()?;
    let model = acc.model.unwrap_or_else(|| "unknown".to_string());

    Some(ActiveSession {
        id,
        agent: file.agent.clone(),
        context_limit: limits.lookup(&model),
        model,
        context_tokens: acc.context_tokens,
        last_activity: acc.last_activity,
        message_count: acc.message_count,
        session_cost: acc.session_cost,
    })
}

/// Fold a session log newest line first.
///
/// The whole log is read before folding. A read error that ends the file
/// is returned instead, discarding what was read so far.
fn accumulate<I>(lines: I, stats: &mut ScanStats) -> Result<SessionAccumulator, LineError>
where
    I: Iterator<Item = Result<String, LineError>>,
{
    let mut buffered = Vec::new();
    for line in lines {
        match line {
            Err(e) if e.ends_file() => return Err(e),
            line => buffered.push(line),
        }
    }

    let mut acc = SessionAccumulator::default();
    for line in buffered.into_iter().rev() {
        match line.and_then(|l| parse_line(&l)) {
            Ok(Some(entry)) => {
                stats.lines_used += 1;
                acc.add(entry);
            }
            Ok(None) => stats.lines_filtered += 1,
            Err(e) => stats.record_line_error(&e),
        }
    }
    Ok(acc)
}
