// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Pin direction file parser
//!
//! Companion format to CDL: one `PIN_NAME DIRECTION` pair per line,
//! direction case-insensitive, `*` comment lines. The resulting map
//! feeds pin directions into aggregate population; pins not present in
//! the map default to [`DEFAULT_PIN_DIRECTION`].

use std::collections::HashMap;

use nom::bytes::complete::take_while1;
use nom::character::complete::{multispace0, space1};
use nom::IResult;

use crate::netlist::Direction;

/// Direction assumed for pins absent from the map.
pub const DEFAULT_PIN_DIRECTION: Direction = Direction::Inout;

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        c.is_alphanumeric()
            || c == '_'
            || c == '<'
            || c == '>'
            || c == '['
            || c == ']'
            || c == '.'
            || c == '/'
    })(input)
}

fn direction(input: &str) -> IResult<&str, Direction> {
    let (rest, word) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    let dir = match word.to_ascii_uppercase().as_str() {
        "INPUT" | "IN" => Direction::Input,
        "OUTPUT" | "OUT" => Direction::Output,
        "INOUT" | "BIDIR" => Direction::Inout,
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            )))
        }
    };
    Ok((rest, dir))
}

fn pin_direction_line(input: &str) -> IResult<&str, (&str, Direction)> {
    let (input, _) = multispace0(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = space1(input)?;
    let (input, dir) = direction(input)?;
    Ok((input, (name, dir)))
}

/// Parse pin-direction file content into a name → direction map.
///
/// Blank lines and `*` comments are ignored; malformed lines are
/// skipped with a warning (graceful degradation, matching the instance
/// parser's policy). A repeated pin name keeps the last direction.
pub fn parse_pin_directions(content: &str) -> HashMap<String, Direction> {
    let mut map = HashMap::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        match pin_direction_line(trimmed) {
            Ok((_, (name, dir))) => {
                map.insert(name.to_string(), dir);
            }
            Err(_) => {
                log::warn!("line {}: skipping malformed pin-direction line: '{trimmed}'", i + 1);
            }
        }
    }
    map
}

/// Look up a pin direction, falling back to [`DEFAULT_PIN_DIRECTION`].
pub fn direction_for(map: &HashMap<String, Direction>, pin_name: &str) -> Direction {
    map.get(pin_name).copied().unwrap_or(DEFAULT_PIN_DIRECTION)
}
