//! Shell command-line splitting.

mod cursor;
mod scanner;
mod span;
mod splitter;

pub use cursor::{Cursor, SplitError};
pub use scanner::{is_separator, next_token, scan};
pub use span::Span;
pub use splitter::{
    CommandRecord, Commands, ControlOperator, RedirectionKind, split_commands, split_next_command,
};
