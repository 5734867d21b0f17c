// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! CDL Lexer
//!
//! Streams file text into classified logical lines:
//! - Joins `+` continuation lines onto the previous logical line
//! - Strips `*` comments (full-line and inline)
//! - Classifies each logical line (blank, comment, .SUBCKT, .ENDS,
//!   instance, transistor, unknown)
//! - Preserves original line numbers for error reporting

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use super::{LineType, LogicalLine, INSTANCE_PREFIX, TRANSISTOR_PREFIX};

/// Lazy iterator over the logical lines of a CDL source.
///
/// Each call to [`Lexer::new`] restarts at the top of the text; both LF
/// and CRLF line endings are accepted, and a missing trailing newline
/// does not drop the final line.
pub struct Lexer<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.lines().enumerate().peekable(),
        }
    }

    /// Collect every logical line of `source` into a buffer.
    pub fn tokenize(source: &'a str) -> Vec<LogicalLine> {
        Lexer::new(source).collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let (index, first) = self.lines.next()?;

        let mut raw = String::from(first);
        let mut pieces: Vec<&str> = vec![first.trim()];

        // Continuation lines are collected greedily until a
        // non-continuation line is found.
        while let Some((_, next)) = self.lines.peek() {
            let trimmed = next.trim();
            if !trimmed.starts_with('+') {
                break;
            }
            let (_, cont) = self.lines.next().expect("peeked line");
            raw.push('\n');
            raw.push_str(cont);
            let stripped = cont.trim().trim_start_matches('+').trim_start();
            if !stripped.is_empty() {
                pieces.push(stripped);
            }
        }

        let joined = pieces
            .iter()
            .filter(|p| !p.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let line_type = classify(&joined);
        let content = match line_type {
            LineType::Comment => joined,
            LineType::Blank => String::new(),
            _ => strip_inline_comment(&joined).trim_end().to_string(),
        };

        Some(LogicalLine {
            line_num: index + 1,
            line_type,
            content,
            raw,
        })
    }
}

/// Classify a joined, leading-trimmed logical line.
fn classify(content: &str) -> LineType {
    if content.is_empty() {
        return LineType::Blank;
    }
    if content.starts_with('*') {
        return LineType::Comment;
    }
    let upper = content.to_ascii_uppercase();
    if upper.starts_with(".SUBCKT") {
        return LineType::Subckt;
    }
    if upper.starts_with(".ENDS") {
        return LineType::Ends;
    }
    let first = content.chars().next().expect("non-empty content");
    if first.eq_ignore_ascii_case(&INSTANCE_PREFIX) {
        return LineType::Instance;
    }
    if first.eq_ignore_ascii_case(&TRANSISTOR_PREFIX) {
        return LineType::Transistor;
    }
    LineType::Unknown
}

/// Truncate at the first `*` not at the start of the line.
fn strip_inline_comment(content: &str) -> &str {
    match content.find('*') {
        Some(pos) if pos > 0 => &content[..pos],
        _ => content,
    }
}
