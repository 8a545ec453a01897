//! Update engine: re-parse changed source files and write values through
//!
//! Driven by [`TuneRegistry::update`](crate::TuneRegistry::update) (whole
//! registry, mtime-gated) and
//! [`TuneRegistry::update_file`](crate::TuneRegistry::update_file) (one
//! file, unconditional). A rescan streams the file once, top to bottom:
//! entries are sorted by line, so the reader never seeks backwards.
//!
//! A malformed line is a diagnostic, not a crash. The entry keeps its
//! previous value, the diagnostic lands in [`UpdateOutcome::skipped`], and
//! the pass moves on - saving a half-edited file must never take the game
//! down.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::TuneError;
use crate::registry::{FileRecord, ValueEntry};
use crate::scan;
use crate::value::Slot;

/// What one update pass did
#[derive(Debug, Default)]
pub struct UpdateOutcome {
    /// Registered files visited
    pub files_checked: usize,
    /// Files re-opened and re-parsed
    pub files_rescanned: usize,
    /// Entries whose value actually changed
    pub values_written: usize,
    /// Per-entry diagnostics; the affected entries kept their previous values
    pub skipped: Vec<TuneError>,
}

/// Call-site keywords whose literal follows the first comma on the line.
const DECLARATION_KEYWORDS: &[&str] = &[
    "tune_f32!(",
    "tune_i32!(",
    "tune_bool!(",
    "tune_char!(",
    "tune_str!(",
    "tune_global_",
];

/// Call-site keywords whose literal follows the first parenthesis.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "tune_lit_f32!(",
    "tune_lit_i32!(",
    "tune_lit_bool!(",
    "tune_lit_char!(",
    "tune_lit_str!(",
];

/// Re-parse every entry of one file, writing new values through the slots.
pub(crate) fn rescan(record: &FileRecord, outcome: &mut UpdateOutcome) {
    outcome.files_rescanned += 1;

    let file = match File::open(&record.path) {
        Ok(file) => file,
        Err(source) => {
            let error = TuneError::FileOpen {
                path: record.path.clone(),
                source,
            };
            log::warn!("{error}");
            outcome.skipped.push(error);
            return;
        }
    };

    log::debug!(
        "re-parsing {} ({} sites)",
        record.path.display(),
        record.entries.len()
    );

    let mut lines = BufReader::new(file).lines();
    let mut current = 0u32;
    let mut text = String::new();
    for entry in &record.entries {
        while current < entry.line {
            match lines.next() {
                Some(Ok(line)) => {
                    text = line;
                    current += 1;
                }
                Some(Err(source)) => {
                    let error = TuneError::Read {
                        path: record.path.clone(),
                        line: current + 1,
                        source,
                    };
                    log::warn!("{error}");
                    outcome.skipped.push(error);
                    return;
                }
                None => {
                    let error = TuneError::UnexpectedEof {
                        path: record.path.clone(),
                        line: entry.line,
                    };
                    log::warn!("{error}");
                    outcome.skipped.push(error);
                    return;
                }
            }
        }

        match apply(&text, entry, &record.path) {
            Ok(true) => outcome.values_written += 1,
            Ok(false) => {}
            Err(error) => {
                log::warn!("{error}");
                outcome.skipped.push(error);
            }
        }
    }
}

/// Extract the literal argument text from a registered line.
///
/// Declaration-family calls carry the literal after their first comma,
/// expression-family calls directly after their first parenthesis. Leading
/// spaces and tabs are skipped either way.
fn locate_literal(text: &str) -> Option<&str> {
    let rest = if DECLARATION_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        &text[text.find(',')? + 1..]
    } else if EXPRESSION_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        &text[text.find('(')? + 1..]
    } else {
        return None;
    };
    Some(rest.trim_start_matches([' ', '\t']))
}

/// Re-parse one entry from its line; returns whether the value changed.
fn apply(text: &str, entry: &ValueEntry, path: &Path) -> Result<bool, TuneError> {
    let Some(literal) = locate_literal(text) else {
        return Err(TuneError::UnrecognizedCallSite {
            path: path.to_owned(),
            line: entry.line,
        });
    };

    let bad_literal = || TuneError::BadLiteral {
        path: path.to_owned(),
        line: entry.line,
        ty: entry.slot.value_type(),
    };

    match &entry.slot {
        Slot::F32(cell) => {
            let value = scan::scan_f32(literal).ok_or_else(bad_literal)?;
            Ok(cell.replace(value) != value)
        }
        Slot::I32(cell) => {
            let value = scan::scan_i32(literal).ok_or_else(bad_literal)?;
            Ok(cell.replace(value) != value)
        }
        Slot::Bool(cell) => {
            let value = scan::scan_bool(literal).ok_or_else(bad_literal)?;
            Ok(cell.replace(value) != value)
        }
        Slot::Char(cell) => {
            let value = scan::scan_char(literal).ok_or_else(bad_literal)?;
            Ok(cell.replace(value) != value)
        }
        Slot::Str(cell) => {
            let value = scan::scan_str(literal).ok_or_else(bad_literal)?;
            if *cell.borrow() == value {
                return Ok(false);
            }
            *cell.borrow_mut() = value;
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_literal_declaration_family() {
        assert_eq!(
            locate_literal("    let gravity = tune_f32!(reg, -9.81);"),
            Some("-9.81);")
        );
        assert_eq!(
            locate_literal("let title = tune_str!(reg, \"pong\");"),
            Some("\"pong\");")
        );
        assert_eq!(
            locate_literal("let speed = tune_global_f32!(speed, 5.0);"),
            Some("5.0);")
        );
        // tabs after the comma are skipped too
        assert_eq!(
            locate_literal("let n = tune_i32!(reg,\t\t16);"),
            Some("16);")
        );
    }

    #[test]
    fn test_locate_literal_expression_family() {
        assert_eq!(
            locate_literal("    let x = tune_lit_f32!(0.5, reg);"),
            Some("0.5, reg);")
        );
        assert_eq!(
            locate_literal("let c = tune_lit_char!('x', reg);"),
            Some("'x', reg);")
        );
    }

    #[test]
    fn test_locate_literal_unrecognized() {
        assert_eq!(locate_literal("let gravity = -9.81;"), None);
        assert_eq!(locate_literal(""), None);
        // declaration keyword but the comma was edited away
        assert_eq!(locate_literal("let g = tune_f32!(reg -9.81);"), None);
    }
}
