//! Split a command line into commands, one call at a time.
//!
//! Each call to [`split_next_command`] consumes one command together with its
//! parameters, an optional redirection and the control operator that follows
//! it, then saves the cursor so the next call picks up the following command.

use std::fmt;

use serde::Serialize;

use super::cursor::{Cursor, SplitError};
use super::scanner::{at_end, byte_at, is_blank, scan, skip_blanks};
use super::span::Span;

/// I/O redirection attached to a command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectionKind {
    #[default]
    None,
    /// `>` - truncate and write
    OutTruncate,
    /// `>>` - append
    OutAppend,
    /// `<` - read
    In,
    /// `<>` - read and write
    InOut,
}

impl RedirectionKind {
    /// The operator's shell syntax (empty for `None`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectionKind::None => "",
            RedirectionKind::OutTruncate => ">",
            RedirectionKind::OutAppend => ">>",
            RedirectionKind::In => "<",
            RedirectionKind::InOut => "<>",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == RedirectionKind::None
    }
}

impl fmt::Display for RedirectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control operator separating a command from the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlOperator {
    /// End of the chain.
    #[default]
    None,
    /// && - run next if previous succeeds
    And,
    /// || - run next if previous fails
    Or,
    /// & - run in background
    Background,
    /// | - pipe stdout to next command
    Pipe,
    /// ; - run sequentially
    Sequence,
}

impl ControlOperator {
    /// The operator's shell syntax (empty for `None`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlOperator::None => "",
            ControlOperator::And => "&&",
            ControlOperator::Or => "||",
            ControlOperator::Background => "&",
            ControlOperator::Pipe => "|",
            ControlOperator::Sequence => ";",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == ControlOperator::None
    }
}

impl fmt::Display for ControlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command split out of a buffer.
///
/// All spans borrow the buffer passed to the first call of the sequence.
/// When `redirection_kind` is `None` the target is empty, and when `command`
/// is empty so are `parameters` and `redirection_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRecord<'a> {
    pub command: Span<'a>,
    /// Parameter text from the first to the last parameter word, inner
    /// blanks included.
    pub parameters: Span<'a>,
    pub redirection_kind: RedirectionKind,
    pub redirection_target: Span<'a>,
    pub operator: ControlOperator,
}

impl<'a> CommandRecord<'a> {
    fn empty(buffer: &'a str, at: usize) -> Self {
        let span = Span::empty(buffer, at);
        Self {
            command: span,
            parameters: span,
            redirection_kind: RedirectionKind::None,
            redirection_target: span,
            operator: ControlOperator::None,
        }
    }

    /// True when no command was found (a bare operator or end of input).
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    pub fn has_redirection(&self) -> bool {
        !self.redirection_kind.is_none()
    }
}

/// Split the next command.
///
/// `Some(buffer)` starts a new sequence at the beginning of `buffer`; `None`
/// resumes from `cursor`. The cursor is left just past the consumed control
/// operator (or wherever scanning stopped when there was none).
///
/// # Errors
///
/// Returns [`SplitError::UninitializedCursor`] when called with `None` on a
/// cursor that no previous call bound to a buffer. Any input text, however
/// malformed, produces a record.
pub fn split_next_command<'a>(
    input: Option<&'a str>,
    cursor: &mut Cursor<'a>,
) -> Result<CommandRecord<'a>, SplitError> {
    let (buffer, start) = cursor.resolve(input)?;
    let (record, next) = split_at(buffer, start);
    cursor.save(next);
    log::trace!(
        "split {:?}..{}: command={:?} params={:?} redirect={:?} {:?} op={:?}",
        start,
        next,
        record.command.as_str(),
        record.parameters.as_str(),
        record.redirection_kind,
        record.redirection_target.as_str(),
        record.operator,
    );
    Ok(record)
}

/// Split one command starting at `start`, returning it with the next cursor.
fn split_at(buffer: &str, start: usize) -> (CommandRecord<'_>, usize) {
    let mut pos = skip_blanks(buffer, start);
    let mut record = CommandRecord::empty(buffer, pos);
    if at_end(buffer, pos) {
        return (record, pos);
    }

    let (command, next) = scan(buffer, pos);
    record.command = command;
    pos = next;

    if !command.is_empty() {
        record.parameters = Span::empty(buffer, pos);
        record.redirection_target = Span::empty(buffer, pos);

        if is_blank(byte_at(buffer, pos)) {
            let (first, next) = scan(buffer, pos);
            record.parameters = first;
            pos = next;
            // Join further words separated by blanks; stop at the first
            // operator character or end of input.
            while is_blank(byte_at(buffer, pos)) {
                let (word, next) = scan(buffer, pos);
                pos = next;
                if !word.is_empty() {
                    record.parameters = record.parameters.extend_to(word.end());
                }
            }
        }

        let (kind, next) = redirection_at(buffer, pos);
        pos = next;
        if !kind.is_none() {
            let (target, next) = scan(buffer, pos);
            record.redirection_kind = kind;
            record.redirection_target = target;
            pos = next;
        }
    } else {
        record.parameters = Span::empty(buffer, pos);
        record.redirection_target = Span::empty(buffer, pos);
    }

    pos = skip_blanks(buffer, pos);
    let (operator, next) = operator_at(buffer, pos);
    record.operator = operator;
    (record, next)
}

/// Classify a redirection operator at `pos`, returning the position past it.
fn redirection_at(buffer: &str, pos: usize) -> (RedirectionKind, usize) {
    let (single, double) = match byte_at(buffer, pos) {
        b'>' => (RedirectionKind::OutTruncate, RedirectionKind::OutAppend),
        b'<' => (RedirectionKind::In, RedirectionKind::InOut),
        _ => return (RedirectionKind::None, pos),
    };
    if byte_at(buffer, pos + 1) == b'>' {
        (double, pos + 2)
    } else {
        (single, pos + 1)
    }
}

/// Classify a control operator at `pos`, returning the position past it.
fn operator_at(buffer: &str, pos: usize) -> (ControlOperator, usize) {
    let doubled = |b: u8| byte_at(buffer, pos + 1) == b;
    match byte_at(buffer, pos) {
        b'&' if doubled(b'&') => (ControlOperator::And, pos + 2),
        b'&' => (ControlOperator::Background, pos + 1),
        b'|' if doubled(b'|') => (ControlOperator::Or, pos + 2),
        b'|' => (ControlOperator::Pipe, pos + 1),
        b';' => (ControlOperator::Sequence, pos + 1),
        _ => (ControlOperator::None, pos),
    }
}

/// Iterator over the commands of one buffer.
///
/// Yields records in order and stops after the first record whose operator
/// is [`ControlOperator::None`].
#[derive(Debug, Clone)]
pub struct Commands<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Commands<'a> {
    pub fn new(buffer: &'a str) -> Self {
        Self {
            cursor: Cursor::at_start(buffer),
            done: false,
        }
    }

    /// Position the next record will be split from.
    pub fn cursor(&self) -> &Cursor<'a> {
        &self.cursor
    }
}

impl<'a> Iterator for Commands<'a> {
    type Item = CommandRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let record = split_next_command(None, &mut self.cursor).ok()?;
        self.done = record.operator.is_none();
        Some(record)
    }
}

/// Split a whole chain into records.
///
/// Every command is visited once, left to right. The last record has
/// operator `None`; its command is empty when the chain ends on an operator.
pub fn split_commands(input: &str) -> Vec<CommandRecord<'_>> {
    Commands::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> CommandRecord<'_> {
        let mut cursor = Cursor::new();
        split_next_command(Some(input), &mut cursor).unwrap()
    }

    #[track_caller]
    fn check(
        record: &CommandRecord<'_>,
        command: &str,
        parameters: &str,
        kind: RedirectionKind,
        target: &str,
        operator: ControlOperator,
    ) {
        assert_eq!(record.command, command, "command");
        assert_eq!(record.parameters, parameters, "parameters");
        assert_eq!(record.redirection_kind, kind, "redirection kind");
        assert_eq!(record.redirection_target, target, "redirection target");
        assert_eq!(record.operator, operator, "operator");
    }

    #[test]
    fn test_empty_input() {
        check(&split(""), "", "", RedirectionKind::None, "", ControlOperator::None);
        check(&split(" "), "", "", RedirectionKind::None, "", ControlOperator::None);
    }

    #[test]
    fn test_single_word() {
        check(&split("   z"), "z", "", RedirectionKind::None, "", ControlOperator::None);
        check(&split("   zzz  "), "zzz", "", RedirectionKind::None, "", ControlOperator::None);
        check(&split("   zzz z+ "), "zzz", "z+", RedirectionKind::None, "", ControlOperator::None);
    }

    #[test]
    fn test_parameters_collapse_into_one_span() {
        check(
            &split("   [ hello there ] "),
            "[",
            "hello there ]",
            RedirectionKind::None,
            "",
            ControlOperator::None,
        );
        check(
            &split("   echo hello there  "),
            "echo",
            "hello there",
            RedirectionKind::None,
            "",
            ControlOperator::None,
        );
        check(
            &split(" echo   -ne  hello > 1 "),
            "echo",
            "-ne  hello",
            RedirectionKind::OutTruncate,
            "1",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_parameters_stop_before_operator() {
        check(
            &split("\t echo hello - the=;  "),
            "echo",
            "hello - the=",
            RedirectionKind::None,
            "",
            ControlOperator::Sequence,
        );
        check(
            &split("echo hello there>out"),
            "echo",
            "hello there",
            RedirectionKind::OutTruncate,
            "out",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_quoted_parameters() {
        check(
            &split("\t echo hello - \"the=; \" "),
            "echo",
            "hello - \"the=; \"",
            RedirectionKind::None,
            "",
            ControlOperator::None,
        );
        check(
            &split(" echo \"hello there\" >foo.txt & "),
            "echo",
            "\"hello there\"",
            RedirectionKind::OutTruncate,
            "foo.txt",
            ControlOperator::Background,
        );
    }

    #[test]
    fn test_quote_hides_operators() {
        check(
            &split(" echo \"; echo he>l\" >foo.txt 1"),
            "echo",
            "\"; echo he>l\"",
            RedirectionKind::OutTruncate,
            "foo.txt",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_redirect_out() {
        check(
            &split("   echo hello there > foo.txt "),
            "echo",
            "hello there",
            RedirectionKind::OutTruncate,
            "foo.txt",
            ControlOperator::None,
        );
        check(
            &split(" echo ttha> foo.txt d "),
            "echo",
            "ttha",
            RedirectionKind::OutTruncate,
            "foo.txt",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_redirect_without_space() {
        check(
            &split("echo>/dev/null"),
            "echo",
            "",
            RedirectionKind::OutTruncate,
            "/dev/null",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_redirect_without_target() {
        check(&split(" echo >"), "echo", "", RedirectionKind::OutTruncate, "", ControlOperator::None);
        check(&split("echo>"), "echo", "", RedirectionKind::OutTruncate, "", ControlOperator::None);
        check(
            &split(" echo \"\" >"),
            "echo",
            "\"\"",
            RedirectionKind::OutTruncate,
            "",
            ControlOperator::None,
        );
    }

    #[test]
    fn test_redirect_kinds() {
        check(
            &split("echo >> /dev/null && cat foo"),
            "echo",
            "",
            RedirectionKind::OutAppend,
            "/dev/null",
            ControlOperator::And,
        );
        check(
            &split("more < /dev/null && cat foo"),
            "more",
            "",
            RedirectionKind::In,
            "/dev/null",
            ControlOperator::And,
        );
        check(
            &split("more <> /dev/null && cat foo"),
            "more",
            "",
            RedirectionKind::InOut,
            "/dev/null",
            ControlOperator::And,
        );
    }

    #[test]
    fn test_second_redirection_is_not_parsed() {
        let mut cursor = Cursor::new();
        let record = split_next_command(Some("cat < in > out"), &mut cursor).unwrap();
        check(&record, "cat", "", RedirectionKind::In, "in", ControlOperator::None);
        assert_eq!(cursor.remaining(), "> out");
    }

    #[test]
    fn test_lone_operator() {
        check(&split("|"), "", "", RedirectionKind::None, "", ControlOperator::Pipe);
        check(&split(" ; "), "", "", RedirectionKind::None, "", ControlOperator::Sequence);
        check(&split("&&"), "", "", RedirectionKind::None, "", ControlOperator::And);
    }

    #[test]
    fn test_empty_command_ignores_redirection() {
        let mut cursor = Cursor::new();
        let record = split_next_command(Some(">out"), &mut cursor).unwrap();
        check(&record, "", "", RedirectionKind::None, "", ControlOperator::None);
        assert_eq!(cursor.remaining(), ">out");
    }

    #[test]
    fn test_all_operators() {
        let cases = [
            ("a & b", ControlOperator::Background),
            ("a && b", ControlOperator::And),
            ("a | b", ControlOperator::Pipe),
            ("a || b", ControlOperator::Or),
            ("a ; b", ControlOperator::Sequence),
            ("a;b", ControlOperator::Sequence),
        ];
        for (input, operator) in cases {
            assert_eq!(split(input).operator, operator, "input {:?}", input);
        }
    }

    #[test]
    fn test_resume_walks_chain() {
        let mut cursor = Cursor::new();
        let first = split_next_command(Some("more <> /dev/null && cat foo"), &mut cursor).unwrap();
        check(&first, "more", "", RedirectionKind::InOut, "/dev/null", ControlOperator::And);
        let second = split_next_command(None, &mut cursor).unwrap();
        check(&second, "cat", "foo", RedirectionKind::None, "", ControlOperator::None);
    }

    #[test]
    fn test_resume_requires_initialized_cursor() {
        let mut cursor = Cursor::new();
        assert_eq!(
            split_next_command(None, &mut cursor),
            Err(SplitError::UninitializedCursor)
        );
    }

    // The target ends at the blank, so the fragment after it is split as
    // its own command on the next call.
    #[test]
    fn test_orphan_fragment_after_target() {
        let mut cursor = Cursor::new();
        let first = split_next_command(Some(" echo hello > foo .txt ; "), &mut cursor).unwrap();
        check(&first, "echo", "hello", RedirectionKind::OutTruncate, "foo", ControlOperator::None);
        let orphan = split_next_command(None, &mut cursor).unwrap();
        check(&orphan, ".txt", "", RedirectionKind::None, "", ControlOperator::Sequence);
        let last = split_next_command(None, &mut cursor).unwrap();
        assert!(last.is_empty());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_spans_point_into_buffer() {
        let input = "  ls -la > out";
        let record = split(input);
        assert_eq!(record.command.range(), 2..4);
        assert_eq!(record.parameters.range(), 5..8);
        assert_eq!(record.redirection_target.range(), 11..14);
        assert_eq!(&input[record.parameters.range()], "-la");
    }

    #[test]
    fn test_iterator_cursor_tracks_resume_calls() {
        let input = "a | b > out .x ; c";
        let mut commands = Commands::new(input);
        let mut cursor = Cursor::new();
        let first = split_next_command(Some(input), &mut cursor).unwrap();
        assert_eq!(commands.next(), Some(first));
        assert_eq!(commands.cursor(), &cursor);

        let second = split_next_command(None, &mut cursor).unwrap();
        assert_eq!(commands.next(), Some(second));
        assert_eq!(commands.cursor(), &cursor);
        assert_eq!(commands.cursor().remaining(), ".x ; c");
        assert_eq!(commands.next(), None);
    }

    #[test]
    fn test_split_commands_chain() {
        let records = split_commands("cmd1 && cmd2 > f ; cmd3");
        assert_eq!(records.len(), 3);
        check(&records[0], "cmd1", "", RedirectionKind::None, "", ControlOperator::And);
        check(&records[1], "cmd2", "", RedirectionKind::OutTruncate, "f", ControlOperator::Sequence);
        check(&records[2], "cmd3", "", RedirectionKind::None, "", ControlOperator::None);
    }

    #[test]
    fn test_split_commands_trailing_operator() {
        let records = split_commands("a | b ;");
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].operator, ControlOperator::Sequence);
        assert!(records[2].is_empty());
        assert!(records[2].operator.is_none());
    }

    #[test]
    fn test_split_commands_quoted_operators() {
        let records = split_commands("echo \"a && b\" && ls");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].parameters, "\"a && b\"");
        assert_eq!(records[1].command, "ls");
    }

    #[test]
    fn test_split_commands_complex_chain() {
        let records = split_commands("a && b || c; d | e & f");
        let commands: Vec<&str> = records.iter().map(|r| r.command.as_str()).collect();
        assert_eq!(commands, vec!["a", "b", "c", "d", "e", "f"]);
        let operators: Vec<ControlOperator> = records.iter().map(|r| r.operator).collect();
        assert_eq!(
            operators,
            vec![
                ControlOperator::And,
                ControlOperator::Or,
                ControlOperator::Sequence,
                ControlOperator::Pipe,
                ControlOperator::Background,
                ControlOperator::None,
            ]
        );
    }

    #[test]
    fn test_operator_syntax() {
        assert_eq!(ControlOperator::Or.to_string(), "||");
        assert_eq!(RedirectionKind::InOut.to_string(), "<>");
        assert_eq!(ControlOperator::None.as_str(), "");
    }
}
