use tracing::{debug, warn};

use super::error::{LineError, ScanError};

/// Counters for everything a scan looked at or deliberately dropped.
///
/// Scans never fail because of bad log data; this is where the dropped
/// files and lines become visible instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_stale: usize,
    pub files_failed: usize,
    pub dirs_failed: usize,
    pub lines_filtered: usize,
    pub lines_dropped: usize,
    pub lines_used: usize,
}

impl ScanStats {
    pub fn record_scan_error(&mut self, err: &ScanError) {
        match err {
            ScanError::ListDir { .. } => self.dirs_failed += 1,
            ScanError::OpenFile { .. } | ScanError::ReadFile { .. } => self.files_failed += 1,
        }
        warn!("Skipping: {}", err);
    }

    pub fn record_line_error(&mut self, err: &LineError) {
        self.lines_dropped += 1;
        debug!("Dropping log line: {}", err);
    }

    /// Emit one summary line for a finished pipeline run
    pub fn log_summary(&self, pipeline: &str) {
        debug!(
            pipeline,
            files_scanned = self.files_scanned,
            files_stale = self.files_stale,
            files_failed = self.files_failed,
            dirs_failed = self.dirs_failed,
            lines_filtered = self.lines_filtered,
            lines_dropped = self.lines_dropped,
            lines_used = self.lines_used,
            "Scan finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_errors_are_counted_by_kind() {
        let mut stats = ScanStats::default();
        stats.record_scan_error(&ScanError::ListDir {
            path: "/nope".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        stats.record_scan_error(&ScanError::OpenFile {
            path: "/nope/a.jsonl".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        stats.record_scan_error(&ScanError::ReadFile {
            path: "/nope/b.jsonl".into(),
            source: LineError::Read(std::io::Error::from(std::io::ErrorKind::Other)),
        });
        stats.record_line_error(&LineError::Shape("message"));

        assert_eq!(stats.dirs_failed, 1);
        assert_eq!(stats.files_failed, 2);
        assert_eq!(stats.lines_dropped, 1);
    }
}
