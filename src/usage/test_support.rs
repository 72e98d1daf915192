use std::fs::{self, File};
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::scanner::LogLines;

/// The single log line from the `bug-hunter` walkthrough
pub const LINE_BUG_HUNTER: &str = r#"{"timestamp":"2024-06-01T12:00:00Z","message":{"model":"claude-sonnet","usage":{"input":100,"output":50,"cacheRead":10,"cacheWrite":5,"cost":{"total":0.02}}}}"#;

/// Write `<root>/<agent>/sessions/<session>.jsonl` and pin its mtime
pub fn write_session(
    root: &Path,
    agent: &str,
    session: &str,
    lines: &[&str],
    modified: DateTime<Utc>,
) -> PathBuf {
    let dir = root.join(agent).join("sessions");
    fs::create_dir_all(&dir).unwrap();

    let path = dir.join(format!("{session}.jsonl"));
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();

    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(SystemTime::from(modified))
        .unwrap();

    path
}

/// A usage line with the given model, context split and cost
pub fn usage_line(model: &str, input: u64, cache_read: u64, cost: f64, timestamp: &str) -> String {
    serde_json::json!({
        "timestamp": timestamp,
        "message": {
            "model": model,
            "usage": {
                "input": input,
                "output": 10,
                "cacheRead": cache_read,
                "cacheWrite": 0,
                "cost": { "total": cost },
            },
        },
    })
    .to_string()
}

/// Reader that always fails, standing in for a disk error
struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "device gone"))
    }
}

/// Log lines that yield `lines` and then hit a read error
pub fn lines_then_read_error(lines: &[&str]) -> LogLines<impl io::BufRead> {
    let mut content = lines.join("\n");
    content.push('\n');
    LogLines::new(BufReader::new(Cursor::new(content).chain(BrokenReader)))
}
