use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::error::{LineError, ScanError};

/// Where session logs live inside each agent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    /// Nested directory holding one log per session
    pub sessions_dir: String,
    /// Log file extension, without the dot
    pub extension: String,
}

impl Default for SessionLayout {
    fn default() -> Self {
        Self {
            sessions_dir: "sessions".to_string(),
            extension: "jsonl".to_string(),
        }
    }
}

/// A session log file discovered under an agent directory
#[derive(Debug, Clone)]
pub struct SessionFile {
    pub agent: String,
    pub path: PathBuf,
    /// Last modification time; `None` when metadata could not be read
    pub modified: Option<DateTime<Utc>>,
}

impl SessionFile {
    /// Session id: the filename without its extension
    pub fn session_id(&self) -> Option<String> {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
    }

    /// Whether the file was last modified strictly before `cutoff`.
    /// Files with unknown mtime count as stale.
    pub fn is_older_than(&self, cutoff: DateTime<Utc>) -> bool {
        match self.modified {
            Some(modified) => modified < cutoff,
            None => true,
        }
    }

    /// Open the log for streaming line by line
    pub fn lines(&self) -> Result<LogLines, ScanError> {
        let file = File::open(&self.path).map_err(|source| ScanError::OpenFile {
            path: self.path.clone(),
            source,
        })?;

        Ok(LogLines::new(BufReader::new(file)))
    }
}

/// Line iterator over a session log.
///
/// A line that is not valid UTF-8 is reported and skipped; any other read
/// error is reported once (see [`LineError::ends_file`]) and ends the file.
pub struct LogLines<R = BufReader<File>> {
    inner: Lines<R>,
    done: bool,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = Result<String, LineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let err = LineError::Read(match self.inner.next()? {
            Ok(line) => return Some(Ok(line)),
            Err(e) => e,
        });
        self.done = err.ends_file();
        Some(Err(err))
    }
}

/// Turn an agent folder name into a display name: `code-reviewer` -> `Code Reviewer`
pub fn agent_display_name(folder_name: &str) -> String {
    let mut name = String::with_capacity(folder_name.len());
    let mut in_word = false;

    for ch in folder_name.replace('-', " ").chars() {
        if ch.is_alphabetic() {
            if in_word {
                name.extend(ch.to_lowercase());
            } else {
                name.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            name.push(ch);
            in_word = false;
        }
    }

    name
}

/// Enumerate every session log under `root` as `(agent, file)` pairs.
///
/// Agents are walked lazily; a missing root yields nothing. Listing failures
/// come through as `Err` items so the caller can count them and move on.
pub fn session_files<'a>(
    root: &Path,
    layout: &'a SessionLayout,
) -> Box<dyn Iterator<Item = Result<SessionFile, ScanError>> + 'a> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Box::new(std::iter::empty());
        }
        Err(source) => {
            return Box::new(std::iter::once(Err(ScanError::ListDir {
                path: root.to_path_buf(),
                source,
            })));
        }
    };

    let mut agent_dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    agent_dirs.sort();

    Box::new(
        agent_dirs
            .into_iter()
            .flat_map(move |agent_dir| agent_session_files(&agent_dir, layout)),
    )
}

/// List the session logs of a single agent directory
fn agent_session_files(
    agent_dir: &Path,
    layout: &SessionLayout,
) -> Vec<Result<SessionFile, ScanError>> {
    let folder_name = match agent_dir.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return Vec::new(),
    };

    let sessions_path = agent_dir.join(&layout.sessions_dir);
    if !sessions_path.is_dir() {
        return Vec::new();
    }

    let entries = match std::fs::read_dir(&sessions_path) {
        Ok(entries) => entries,
        Err(source) => {
            return vec![Err(ScanError::ListDir {
                path: sessions_path,
                source,
            })];
        }
    };

    let agent = agent_display_name(&folder_name);
    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(layout.extension.as_str())
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let modified = std::fs::metadata(&path)
                .and_then(|m| m.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            Ok(SessionFile {
                agent: agent.clone(),
                path,
                modified,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::test_support::lines_then_read_error;
    use std::fs;
    use tempfile::TempDir;

    fn collect_ok(root: &Path) -> Vec<SessionFile> {
        let layout = SessionLayout::default();
        session_files(root, &layout).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_agent_display_name() {
        assert_eq!(agent_display_name("code-reviewer"), "Code Reviewer");
        assert_eq!(agent_display_name("bug-hunter"), "Bug Hunter");
        assert_eq!(agent_display_name("main"), "Main");
        assert_eq!(agent_display_name("LOUD-agent"), "Loud Agent");
        assert_eq!(agent_display_name("agent2x"), "Agent2X");
        assert_eq!(agent_display_name(""), "");
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let files = collect_ok(&tmp.path().join("does-not-exist"));
        assert!(files.is_empty());
    }

    #[test]
    fn test_session_files_layout() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();

        let sessions = root.join("bug-hunter").join("sessions");
        fs::create_dir_all(&sessions).unwrap();
        fs::write(sessions.join("abc123.jsonl"), "").unwrap();
        fs::write(sessions.join("notes.txt"), "").unwrap();
        fs::create_dir_all(sessions.join("nested.jsonl")).unwrap();

        // Agent without a session store contributes nothing
        fs::create_dir_all(root.join("idle-agent")).unwrap();
        // Stray files at the root are not agents
        fs::write(root.join("stray.jsonl"), "").unwrap();

        let files = collect_ok(root);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].agent, "Bug Hunter");
        assert_eq!(files[0].session_id().as_deref(), Some("abc123"));
        assert!(files[0].modified.is_some());
    }

    #[test]
    fn test_is_older_than() {
        let now = Utc::now();
        let file = SessionFile {
            agent: "Main".to_string(),
            path: PathBuf::from("a.jsonl"),
            modified: Some(now),
        };
        assert!(!file.is_older_than(now));
        assert!(file.is_older_than(now + chrono::Duration::seconds(1)));

        let unknown = SessionFile {
            modified: None,
            ..file
        };
        assert!(unknown.is_older_than(now));
    }

    #[test]
    fn test_log_lines_skip_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("s.jsonl");
        fs::write(&path, b"first\n\xff\xfe\nthird\n").unwrap();

        let file = SessionFile {
            agent: "Main".to_string(),
            path,
            modified: None,
        };
        let lines: Vec<Result<String, LineError>> = file.lines().unwrap().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].as_deref().ok(), Some("first"));
        assert!(lines[1].is_err());
        assert_eq!(lines[2].as_deref().ok(), Some("third"));
    }

    #[test]
    fn test_open_missing_file_is_a_scan_error() {
        let file = SessionFile {
            agent: "Main".to_string(),
            path: PathBuf::from("/definitely/not/here.jsonl"),
            modified: None,
        };
        assert!(matches!(file.lines(), Err(ScanError::OpenFile { .. })));
    }

    #[test]
    fn test_read_error_is_reported_once_and_ends_the_file() {
        let lines: Vec<Result<String, LineError>> =
            lines_then_read_error(&["first", "second"]).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].as_deref().ok(), Some("second"));
        assert!(matches!(&lines[2], Err(e) if e.ends_file()));
    }
}
