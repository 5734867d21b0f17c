// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Subcircuit block parser
//!
//! Matches nested `.SUBCKT`/`.ENDS` pairs with an explicit stack of open
//! block names, and collects the port list declared by each definition.
//! Re-defining a name overwrites the stored definition; rejecting
//! duplicate names is the aggregate's job, not this layer's.

use std::collections::{HashMap, HashSet};

use super::{CdlError, LogicalLine, SubcircuitDefinition};

/// Stack-based matcher for `.SUBCKT`/`.ENDS` blocks.
#[derive(Debug, Default)]
pub struct SubcktBlockParser {
    stack: Vec<String>,
    definitions: HashMap<String, SubcircuitDefinition>,
}

impl SubcktBlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.SUBCKT <name> <port>+` line and open a block.
    ///
    /// Fails if the name is missing, no ports are declared, or a port
    /// name repeats within the same definition. Names are
    /// case-sensitive.
    pub fn parse_subckt_line(&mut self, token: &LogicalLine) -> Result<(), CdlError> {
        let line = token.line_num;
        let mut fields = token.content.split_whitespace();
        let _keyword = fields.next();

        let name = fields
            .next()
            .ok_or(CdlError::MissingSubcktName { line })?
            .to_string();

        let ports: Vec<String> = fields.map(str::to_string).collect();
        if ports.is_empty() {
            return Err(CdlError::MissingPorts { name, line });
        }

        let mut seen = HashSet::new();
        for port in &ports {
            if !seen.insert(port.as_str()) {
                return Err(CdlError::DuplicatePort {
                    name,
                    port: port.clone(),
                    line,
                });
            }
        }

        self.stack.push(name.clone());
        self.definitions
            .insert(name.clone(), SubcircuitDefinition::new(name, ports));
        Ok(())
    }

    /// Parse a `.ENDS [<name>]` line and close the innermost block.
    ///
    /// A supplied name must match the name being closed.
    pub fn parse_ends_line(&mut self, token: &LogicalLine) -> Result<(), CdlError> {
        let line = token.line_num;
        let mut fields = token.content.split_whitespace();
        let _keyword = fields.next();
        let closed = fields.next();

        let open = self
            .stack
            .pop()
            .ok_or(CdlError::UnmatchedEnds { line })?;

        if let Some(found) = closed {
            if found != open {
                return Err(CdlError::EndsMismatch {
                    expected: open,
                    found: found.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    /// Check that every opened block has been closed.
    pub fn validate_complete(&self) -> Result<(), CdlError> {
        if self.stack.is_empty() {
            return Ok(());
        }
        Err(CdlError::UnclosedSubckt {
            names: self.stack.join(", "),
        })
    }

    pub fn definitions(&self) -> &HashMap<String, SubcircuitDefinition> {
        &self.definitions
    }

    pub fn into_definitions(self) -> HashMap<String, SubcircuitDefinition> {
        self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdl::lexer::Lexer;
    use crate::cdl::LineType;

    fn token(src: &str) -> LogicalLine {
        Lexer::tokenize(src).remove(0)
    }

    #[test]
    fn test_parse_simple_block() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT INV A Y")).unwrap();
        parser.parse_ends_line(&token(".ENDS INV")).unwrap();
        parser.validate_complete().unwrap();

        let def = &parser.definitions()["INV"];
        assert_eq!(def.name(), "INV");
        assert_eq!(def.ports(), ["A".to_string(), "Y".to_string()]);
    }

    #[test]
    fn test_ends_without_name_closes_innermost() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT OUTER A")).unwrap();
        parser.parse_subckt_line(&token(".SUBCKT INNER B")).unwrap();
        parser.parse_ends_line(&token(".ENDS")).unwrap();
        parser.parse_ends_line(&token(".ENDS OUTER")).unwrap();
        parser.validate_complete().unwrap();
    }

    #[test]
    fn test_missing_name_fails() {
        let mut parser = SubcktBlockParser::new();
        let err = parser.parse_subckt_line(&token(".SUBCKT")).unwrap_err();
        assert_eq!(err, CdlError::MissingSubcktName { line: 1 });
    }

    #[test]
    fn test_missing_ports_fails() {
        let mut parser = SubcktBlockParser::new();
        let err = parser.parse_subckt_line(&token(".SUBCKT INV")).unwrap_err();
        assert!(matches!(err, CdlError::MissingPorts { .. }));
    }

    #[test]
    fn test_duplicate_port_fails() {
        let mut parser = SubcktBlockParser::new();
        let err = parser
            .parse_subckt_line(&token(".SUBCKT INV A A"))
            .unwrap_err();
        match err {
            CdlError::DuplicatePort { name, port, line } => {
                assert_eq!(name, "INV");
                assert_eq!(port, "A");
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ends_name_mismatch_fails() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT INV A Y")).unwrap();
        let err = parser.parse_ends_line(&token(".ENDS BUF")).unwrap_err();
        assert!(matches!(err, CdlError::EndsMismatch { .. }));
    }

    #[test]
    fn test_unmatched_ends_fails() {
        let mut parser = SubcktBlockParser::new();
        let err = parser.parse_ends_line(&token(".ENDS INV")).unwrap_err();
        assert_eq!(err, CdlError::UnmatchedEnds { line: 1 });
    }

    #[test]
    fn test_unclosed_blocks_reported() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT INV A Y")).unwrap();
        let err = parser.validate_complete().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("unclosed"));
        assert!(message.contains("INV"));
    }

    #[test]
    fn test_redefinition_overwrites() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT INV A Y")).unwrap();
        parser.parse_ends_line(&token(".ENDS")).unwrap();
        parser
            .parse_subckt_line(&token(".SUBCKT INV IN OUT"))
            .unwrap();
        parser.parse_ends_line(&token(".ENDS")).unwrap();

        let def = &parser.definitions()["INV"];
        assert_eq!(def.ports(), ["IN".to_string(), "OUT".to_string()]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&token(".SUBCKT inv A Y")).unwrap();
        let err = parser.parse_ends_line(&token(".ENDS INV")).unwrap_err();
        assert!(matches!(err, CdlError::EndsMismatch { .. }));
    }

    #[test]
    fn test_lowercase_keyword_accepted() {
        let tok = token(".subckt INV A Y");
        assert_eq!(tok.line_type, LineType::Subckt);
        let mut parser = SubcktBlockParser::new();
        parser.parse_subckt_line(&tok).unwrap();
        assert!(parser.definitions().contains_key("INV"));
    }
}
