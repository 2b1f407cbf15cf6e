//! Output formatting for split records.

mod response;

pub use response::{LineReport, RecordView, format_report};
