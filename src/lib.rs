//! cmd-split - resumable shell command-line splitter.
//!
//! Splits a command line such as `make && ./run > out.log ; echo done` one
//! command at a time into command name, parameters, redirection and control
//! operator, without copying or allocating.

pub mod audit;
pub mod config;
pub mod input;
pub mod logging;
pub mod output;
pub mod shell;
pub mod walk;

pub use config::{Config, OutputFormat};
pub use input::Request;
pub use output::format_report;
pub use shell::{
    CommandRecord, ControlOperator, Cursor, RedirectionKind, Span, SplitError, split_commands,
    split_next_command,
};
pub use walk::walk_line;
