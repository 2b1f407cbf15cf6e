//! Input parsing for the front-end.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when parsing input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// A JSON request: `{"command": "...", "cwd": "..."}`.
#[derive(Debug, Clone, Deserialize)]
struct JsonRequest {
    command: Option<String>,
    #[serde(default)]
    cwd: Option<String>,
}

/// Command text to split, one buffer per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// The raw command text.
    pub text: String,
    /// Working directory supplied with a JSON request.
    pub cwd: Option<String>,
}

impl Request {
    /// Parse raw stdin contents.
    ///
    /// Text starting with `{` is read as a JSON request; anything else is
    /// taken as plain command lines.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        if raw.trim_start().starts_with('{') {
            let json: JsonRequest = serde_json::from_str(raw)?;
            let text = json.command.ok_or(InputError::MissingField("command"))?;
            return Ok(Self { text, cwd: json.cwd });
        }
        Ok(Self {
            text: raw.to_string(),
            cwd: None,
        })
    }

    /// Lines to split independently, skipping blank ones.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
    }
}
