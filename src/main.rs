//! cmd-split entry point.
//!
//! Reads command lines (or a JSON request) from stdin and prints every
//! command of every chain.

use cmd_split::audit::AuditLogger;
use cmd_split::config::Config;
use cmd_split::input::Request;
use cmd_split::logging;
use cmd_split::output::{LineReport, format_report};
use cmd_split::walk::walk_line;

use log::{debug, warn};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut raw = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut raw) {
        eprintln!("Input error: {}", e);
        return ExitCode::from(1);
    }

    let request = match Request::parse(&raw) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return ExitCode::from(1);
        }
    };

    let cwd = request
        .cwd
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok());
    let config = match Config::load(cwd.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::from(2);
        }
    };
    // Validated by Config::load.
    logging::init(config.log.level_filter().unwrap_or(log::LevelFilter::Warn));

    let mut reports = Vec::new();
    for line in request.lines() {
        match walk_line(line, &config.split) {
            Ok(records) => reports.push(LineReport::new(line, &records)),
            Err(e) => {
                eprintln!("Split error: {}", e);
                return ExitCode::from(1);
            }
        }
    }
    debug!("split {} line(s)", reports.len());

    if config.audit.enabled() {
        match &config.audit.path {
            Some(path) => audit(Path::new(path), &reports, request.cwd.as_deref()),
            None => warn!("audit enabled without a path"),
        }
    }

    let out = format_report(&reports, config.output.format());
    if io::stdout().write_all(out.as_bytes()).is_err() {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

/// Best-effort: audit failures never change the exit code.
fn audit(path: &Path, reports: &[LineReport], cwd: Option<&str>) {
    let mut logger = match AuditLogger::open(path) {
        Ok(l) => l,
        Err(e) => {
            warn!("cannot open audit log {}: {}", path.display(), e);
            return;
        }
    };
    for report in reports {
        if let Err(e) = logger.log_report(report, cwd) {
            warn!("cannot write audit log {}: {}", path.display(), e);
            return;
        }
    }
}
