//! Response formatting for front-end output.

use crate::config::OutputFormat;
use crate::shell::{CommandRecord, ControlOperator, RedirectionKind};
use serde::Serialize;

/// Owned, serializable view of one [`CommandRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordView {
    pub command: String,
    pub parameters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirection: Option<RedirectionView>,
    pub operator: ControlOperator,
}

/// Redirection kind and target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectionView {
    pub kind: RedirectionKind,
    pub target: String,
}

impl From<&CommandRecord<'_>> for RecordView {
    fn from(record: &CommandRecord<'_>) -> Self {
        let redirection = record.has_redirection().then(|| RedirectionView {
            kind: record.redirection_kind,
            target: record.redirection_target.as_str().to_string(),
        });
        Self {
            command: record.command.as_str().to_string(),
            parameters: record.parameters.as_str().to_string(),
            redirection,
            operator: record.operator,
        }
    }
}

/// All records split out of one input line.
#[derive(Debug, Clone, Serialize)]
pub struct LineReport {
    pub line: String,
    pub records: Vec<RecordView>,
}

impl LineReport {
    pub fn new(line: &str, records: &[CommandRecord<'_>]) -> Self {
        Self {
            line: line.to_string(),
            records: records.iter().map(RecordView::from).collect(),
        }
    }
}

/// Format reports for stdout.
pub fn format_report(reports: &[LineReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_text(reports),
        OutputFormat::Json => format_json(reports),
    }
}

fn format_text(reports: &[LineReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for record in &report.records {
            out.push_str(&format_record_line(record));
            out.push('\n');
        }
    }
    out
}

fn format_record_line(record: &RecordView) -> String {
    let mut line = format!("command={:?} params={:?}", record.command, record.parameters);
    if let Some(redirection) = &record.redirection {
        line.push_str(&format!(
            " redirect={} target={:?}",
            redirection.kind.as_str(),
            redirection.target
        ));
    }
    if !record.operator.is_none() {
        line.push_str(&format!(" op={}", record.operator.as_str()));
    }
    line
}

fn format_json(reports: &[LineReport]) -> String {
    // Serializing owned strings and unit enums cannot fail.
    let mut json = serde_json::to_string(reports).unwrap_or_else(|_| "[]".to_string());
    json.push('\n');
    json
}
