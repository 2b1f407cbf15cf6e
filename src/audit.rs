//! Audit logging of split results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::output::{LineReport, RecordView};

/// An audit log entry.
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
    /// Working directory if the request carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// The input line, truncated.
    pub line: String,
    /// Number of non-empty commands found.
    pub commands: usize,
    /// The split records.
    pub records: Vec<RecordView>,
}

impl AuditEntry {
    /// Create a new audit entry from a line report.
    pub fn new(report: &LineReport, cwd: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now(),
            cwd: cwd.map(String::from),
            line: truncate_string(&report.line, 200),
            commands: report.records.iter().filter(|r| !r.command.is_empty()).count(),
            records: report.records.clone(),
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len - 3;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Audit logger for writing entries to a file.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create an audit log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an audit entry to the log.
    pub fn log(&mut self, entry: &AuditEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log the records of one line.
    pub fn log_report(&mut self, report: &LineReport, cwd: Option<&str>) -> std::io::Result<()> {
        let entry = AuditEntry::new(report, cwd);
        self.log(&entry)
    }
}
