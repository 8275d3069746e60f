//! Line-oriented `/begin` .. `/end` block scanner.
//!
//! Exactly one block context is open at a time; there is no nesting stack.
//! A `/begin` while a block is still open discards the open block (implicit
//! close-on-reopen), a mismatched or stray `/end` is ignored with a warning,
//! and blank lines are always skipped.

use crate::observer::ParseObserver;

/// Block kinds the extractor produces records for. Every other keyword is
/// still scanned, to keep the single-context state machine correct, but
/// yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKeyword {
    Characteristic,
    Measurement,
    MeasurementArray,
}

impl BlockKeyword {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "CHARACTERISTIC" => Some(BlockKeyword::Characteristic),
            "MEASUREMENT" => Some(BlockKeyword::Measurement),
            "MEASUREMENT_ARRAY" => Some(BlockKeyword::MeasurementArray),
            _ => None,
        }
    }
}

/// A closed `/begin` .. `/end` section, ready for the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Upper-cased block keyword.
    pub keyword: String,
    pub name: String,
    /// Raw description text between double quotes, not yet normalized.
    pub description: String,
    /// Trimmed non-blank content lines, verbatim.
    pub lines: Vec<String>,
}

enum State {
    Idle,
    InBlock(Block),
}

pub struct Scanner<'a> {
    state: State,
    observer: &'a dyn ParseObserver,
}

impl<'a> Scanner<'a> {
    pub fn new(observer: &'a dyn ParseObserver) -> Self {
        Self {
            state: State::Idle,
            observer,
        }
    }

    /// Feeds one raw input line; returns a block when this line closes one.
    pub fn push_line(&mut self, raw: &str) -> Option<Block> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }

        if let Some(block) = parse_begin(line) {
            if let State::InBlock(open) = &self.state {
                self.observer.warning(&format!(
                    "unterminated {} block '{}' discarded by new /begin",
                    open.keyword, open.name
                ));
            }
            self.state = State::InBlock(block);
            return None;
        }

        if let Some(keyword) = parse_end(line) {
            match std::mem::replace(&mut self.state, State::Idle) {
                State::InBlock(block) if block.keyword == keyword => return Some(block),
                State::InBlock(block) => {
                    self.observer.warning(&format!(
                        "/end {} does not close open {} block '{}'",
                        keyword, block.keyword, block.name
                    ));
                    self.state = State::InBlock(block);
                }
                State::Idle => {
                    self.observer
                        .warning(&format!("stray /end {} outside any block", keyword));
                }
            }
            return None;
        }

        if let State::InBlock(open) = &mut self.state {
            open.lines.push(line.to_string());
        }
        None
    }
}

/// `/begin KEYWORD NAME ["DESCRIPTION"]`, keyword match case-insensitive.
fn parse_begin(line: &str) -> Option<Block> {
    let rest = strip_directive(line, "/begin")?;
    let (keyword, rest) = next_token(rest)?;
    let (name, rest) = next_token(rest)?;
    let description = leading_quoted(rest).unwrap_or_default();
    Some(Block {
        keyword: keyword.to_ascii_uppercase(),
        name: name.to_string(),
        description: description.to_string(),
        lines: Vec::new(),
    })
}

/// `/end KEYWORD`, returns the upper-cased keyword.
fn parse_end(line: &str) -> Option<String> {
    let rest = strip_directive(line, "/end")?;
    let (keyword, _) = next_token(rest)?;
    Some(keyword.to_ascii_uppercase())
}

fn strip_directive<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let (token, rest) = next_token(line)?;
    token.eq_ignore_ascii_case(directive).then_some(rest)
}

/// Splits off the next whitespace-delimited token.
pub(crate) fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(split) => Some((&s[..split], &s[split..])),
        None => Some((s, "")),
    }
}

/// A double-quoted string starting at the first non-space character, if any.
fn leading_quoted(s: &str) -> Option<&str> {
    let inner = s.trim_start().strip_prefix('"')?;
    let end = inner.find('"')?;
    Some(&inner[..end])
}

/// The first double-quoted substring anywhere in the text, if any.
pub(crate) fn first_quoted(s: &str) -> Option<&str> {
    let start = s.find('"')? + 1;
    let end = s[start..].find('"')?;
    Some(&s[start..start + end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Captures warnings so the tests can assert diagnostics are emitted.
    #[derive(Default)]
    struct RecordingObserver {
        warnings: RefCell<Vec<String>>,
    }

    impl ParseObserver for RecordingObserver {
        fn info(&self, _message: &str) {}

        fn warning(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }
    }

    fn feed(observer: &RecordingObserver, lines: &[&str]) -> Vec<Block> {
        let mut scanner = Scanner::new(observer);
        lines.iter().filter_map(|l| scanner.push_line(l)).collect()
    }

    #[test]
    fn closes_block_and_buffers_trimmed_lines() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &[
                "/begin CHARACTERISTIC KL_Spark \"Spark advance\"",
                "  VALUE 0x4000A1  ",
                "",
                "/end CHARACTERISTIC",
            ],
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].keyword, "CHARACTERISTIC");
        assert_eq!(blocks[0].name, "KL_Spark");
        assert_eq!(blocks[0].description, "Spark advance");
        assert_eq!(blocks[0].lines, ["VALUE 0x4000A1"]);
        assert!(observer.warnings.borrow().is_empty());
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &["/BEGIN measurement KL_RPM", "UWORD RPM_CONV", "/End MEASUREMENT"],
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].keyword, "MEASUREMENT");
    }

    #[test]
    fn description_is_optional() {
        let observer = RecordingObserver::default();
        let blocks = feed(&observer, &["/begin MEASUREMENT KL_RPM", "/end MEASUREMENT"]);
        assert_eq!(blocks[0].description, "");
    }

    #[test]
    fn unterminated_quote_means_no_description() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &["/begin MEASUREMENT KL_RPM \"half open", "/end MEASUREMENT"],
        );
        assert_eq!(blocks[0].description, "");
    }

    #[test]
    fn reopen_discards_open_block_with_warning() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &[
                "/begin CHARACTERISTIC First \"lost\"",
                "VALUE 0x1",
                "/begin CHARACTERISTIC Second \"kept\"",
                "VALUE 0x2",
                "/end CHARACTERISTIC",
            ],
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "Second");
        assert_eq!(observer.warnings.borrow().len(), 1);
    }

    #[test]
    fn mismatched_end_is_ignored_with_warning() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &[
                "/begin MEASUREMENT KL_RPM",
                "/end CHARACTERISTIC",
                "UWORD RPM_CONV",
                "/end MEASUREMENT",
            ],
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines, ["UWORD RPM_CONV"]);
        assert_eq!(observer.warnings.borrow().len(), 1);
    }

    #[test]
    fn stray_end_outside_block_is_ignored_with_warning() {
        let observer = RecordingObserver::default();
        let blocks = feed(&observer, &["/end MODULE"]);
        assert!(blocks.is_empty());
        assert_eq!(observer.warnings.borrow().len(), 1);
    }

    #[test]
    fn quote_not_directly_after_name_is_not_a_description() {
        let observer = RecordingObserver::default();
        let blocks = feed(
            &observer,
            &["/begin CHARACTERISTIC KL_X extra \"late quote\"", "/end CHARACTERISTIC"],
        );
        assert_eq!(blocks[0].description, "");
    }
}
