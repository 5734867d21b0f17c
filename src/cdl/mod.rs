// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! CDL netlist format support.
//!
//! CDL is a SPICE-like, line-oriented text format describing subcircuit
//! definitions (`.SUBCKT`/`.ENDS`), instances (`X`-prefixed lines) and
//! the nets binding them together. This module holds the data model
//! shared by the lexer, the block/instance parsers and the two-pass
//! orchestrator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// First letter of a subcircuit instance line (case-insensitive).
pub const INSTANCE_PREFIX: char = 'X';

/// First letter of a transistor line (case-insensitive).
pub const TRANSISTOR_PREFIX: char = 'M';

/// Classification of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineType {
    Blank,
    Comment,
    Subckt,
    Ends,
    Instance,
    Transistor,
    Unknown,
}

/// A logical line produced by the lexer.
///
/// Continuation lines (`+` prefix) are already joined into their parent
/// line; `line_num` is the 1-indexed number of the first physical line
/// of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalLine {
    pub line_num: usize,
    pub line_type: LineType,
    /// Comment-stripped, continuation-joined, trailing-whitespace-trimmed
    /// text. For `Comment` lines this is the trimmed original text.
    pub content: String,
    /// Original physical lines, newline-joined.
    pub raw: String,
}

/// A named subcircuit with its ordered port list.
///
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcircuitDefinition {
    name: String,
    ports: Vec<String>,
}

impl SubcircuitDefinition {
    pub fn new(name: impl Into<String>, ports: Vec<String>) -> Self {
        Self {
            name: name.into(),
            ports,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered port names.
    pub fn ports(&self) -> &[String] {
        &self.ports
    }
}

/// How an instance's positional nets were mapped to port names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortMapping {
    /// Ports taken from a known subcircuit definition.
    Known(Vec<String>),
    /// Generic `port0, port1, ...` names synthesized for an unknown
    /// cell type; the payload is the number of synthesized ports.
    Synthesized(usize),
}

impl PortMapping {
    pub fn is_synthesized(&self) -> bool {
        matches!(self, PortMapping::Synthesized(_))
    }
}

/// A parsed cell instantiation.
///
/// Immutable after construction; the connection map is owned by the
/// instance and independent of anything the caller keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellInstance {
    name: String,
    cell_type: String,
    connections: IndexMap<String, String>,
    mapping: PortMapping,
}

impl CellInstance {
    pub fn new(
        name: impl Into<String>,
        cell_type: impl Into<String>,
        connections: IndexMap<String, String>,
        mapping: PortMapping,
    ) -> Self {
        Self {
            name: name.into(),
            cell_type: cell_type.into(),
            connections,
            mapping,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_type(&self) -> &str {
        &self.cell_type
    }

    /// Ordered port name → net name map.
    pub fn connections(&self) -> &IndexMap<String, String> {
        &self.connections
    }

    pub fn mapping(&self) -> &PortMapping {
        &self.mapping
    }
}

/// Electrical classification of a net name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetType {
    Power,
    Ground,
    Signal,
}

/// Canonicalized form of a net name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInfo {
    pub original_name: String,
    pub normalized_name: String,
    pub net_type: NetType,
    pub is_bus: bool,
    pub bus_index: Option<u32>,
}

/// Severity of a collected parse issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A line-tagged problem collected during parsing.
///
/// `line` is `None` for issues with no specific source line (e.g. an
/// unclosed block detected at end of input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseIssue {
    pub line: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl ParseIssue {
    pub fn error(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Errors produced by the CDL parsing layers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CdlError {
    #[error(".SUBCKT is missing a subcircuit name")]
    MissingSubcktName { line: usize },

    #[error("subcircuit '{name}' declares no ports")]
    MissingPorts { name: String, line: usize },

    #[error("duplicate port '{port}' in subcircuit '{name}'")]
    DuplicatePort {
        name: String,
        port: String,
        line: usize,
    },

    #[error(".ENDS names '{found}' but innermost open subcircuit is '{expected}'")]
    EndsMismatch {
        expected: String,
        found: String,
        line: usize,
    },

    #[error(".ENDS without a matching .SUBCKT")]
    UnmatchedEnds { line: usize },

    #[error("unclosed subcircuit block(s): {names}")]
    UnclosedSubckt { names: String },

    #[error("instance line has no instance name")]
    MissingInstanceName { line: usize },

    #[error("instance name '{name}' does not start with 'X'")]
    InvalidInstancePrefix { name: String, line: usize },

    #[error("instance '{name}' is missing a cell type")]
    MissingCellType { name: String, line: usize },

    #[error("CDL parse failed with {errors} error(s):\n{details}")]
    ParseFailed { errors: usize, details: String },
}

impl CdlError {
    /// Source line of the error, when one applies.
    pub fn line(&self) -> Option<usize> {
        match self {
            CdlError::MissingSubcktName { line }
            | CdlError::MissingPorts { line, .. }
            | CdlError::DuplicatePort { line, .. }
            | CdlError::EndsMismatch { line, .. }
            | CdlError::UnmatchedEnds { line }
            | CdlError::MissingInstanceName { line }
            | CdlError::InvalidInstancePrefix { line, .. }
            | CdlError::MissingCellType { line, .. } => Some(*line),
            CdlError::UnclosedSubckt { .. } | CdlError::ParseFailed { .. } => None,
        }
    }
}

pub mod instance;
pub mod lexer;
pub mod netname;
pub mod parser;
pub mod pindir;
pub mod reader;
pub mod subckt;
