//! Walk every command chain of an input line.

use log::{debug, warn};

use crate::config::SplitConfig;
use crate::shell::{CommandRecord, Cursor, SplitError, split_next_command};

/// Split `line` into records, calling the splitter until the chain ends.
///
/// The chain ends at the first record without a control operator. With
/// `resume_after_end` set, splitting continues past such a record while
/// unconsumed text remains, stopping early if the splitter makes no
/// progress (text such as a bare `>` that starts no command).
pub fn walk_line<'a>(line: &'a str, config: &SplitConfig) -> Result<Vec<CommandRecord<'a>>, SplitError> {
    let mut cursor = Cursor::new();
    let mut records = vec![split_next_command(Some(line), &mut cursor)?];

    loop {
        let last = records[records.len() - 1];
        if !last.operator.is_none() {
            records.push(split_next_command(None, &mut cursor)?);
            continue;
        }
        if cursor.is_exhausted() {
            break;
        }
        if !config.resume_after_end() {
            debug!("chain ended with unsplit text {:?}", cursor.remaining());
            break;
        }

        let before = cursor.offset();
        let record = split_next_command(None, &mut cursor)?;
        if cursor.offset() == before {
            warn!("cannot split remaining text {:?}", cursor.remaining());
            break;
        }
        records.push(record);
    }

    debug!("split {} record(s) from {:?}", records.len(), line);
    Ok(records)
}
