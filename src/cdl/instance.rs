// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Instance line parser
//!
//! An instance line is `<X-name> <net>* <cell-type>`: the first field is
//! the instance name, the last is the cell type, everything between is a
//! positional net list. Positional nets are zipped against the port
//! names of a known subcircuit definition; unknown cell types degrade to
//! synthesized `port0, port1, ...` names with a warning rather than an
//! error.

use std::collections::HashMap;

use indexmap::IndexMap;

use super::{
    CdlError, CellInstance, LogicalLine, ParseIssue, PortMapping, SubcircuitDefinition,
    INSTANCE_PREFIX,
};

/// Parser for instance lines, accumulating non-fatal warnings.
#[derive(Debug, Default)]
pub struct InstanceParser {
    warnings: Vec<ParseIssue>,
}

impl InstanceParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one instance token against the subcircuit definitions
    /// collected in pass 1.
    ///
    /// Unknown cell types and connection-count mismatches produce
    /// warnings and a best-effort instance; only a missing or malformed
    /// name/cell-type fails.
    pub fn parse_instance_line(
        &mut self,
        token: &LogicalLine,
        definitions: &HashMap<String, SubcircuitDefinition>,
    ) -> Result<CellInstance, CdlError> {
        let line = token.line_num;
        let fields: Vec<&str> = token.content.split_whitespace().collect();

        let name = *fields
            .first()
            .ok_or(CdlError::MissingInstanceName { line })?;
        if !name
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&INSTANCE_PREFIX))
        {
            return Err(CdlError::InvalidInstancePrefix {
                name: name.to_string(),
                line,
            });
        }

        if fields.len() < 2 {
            return Err(CdlError::MissingCellType {
                name: name.to_string(),
                line,
            });
        }
        let cell_type = fields[fields.len() - 1];
        let nets = &fields[1..fields.len() - 1];

        let mapping = match definitions.get(cell_type) {
            Some(def) => {
                if nets.len() != def.ports().len() {
                    let kind = if nets.len() < def.ports().len() {
                        "too few"
                    } else {
                        "too many"
                    };
                    self.warnings.push(ParseIssue::warning(
                        Some(line),
                        format!(
                            "instance '{}' has {} connections ({} given, '{}' declares {} ports)",
                            name,
                            kind,
                            nets.len(),
                            cell_type,
                            def.ports().len()
                        ),
                    ));
                }
                PortMapping::Known(def.ports().to_vec())
            }
            None => {
                self.warnings.push(ParseIssue::warning(
                    Some(line),
                    format!(
                        "instance '{}' references unknown cell type '{}'",
                        name, cell_type
                    ),
                ));
                PortMapping::Synthesized(nets.len())
            }
        };

        let connections: IndexMap<String, String> = match &mapping {
            PortMapping::Known(ports) => ports
                .iter()
                .zip(nets.iter())
                .map(|(port, net)| (port.clone(), net.to_string()))
                .collect(),
            PortMapping::Synthesized(count) => (0..*count)
                .map(|i| (format!("port{i}"), nets[i].to_string()))
                .collect(),
        };

        Ok(CellInstance::new(name, cell_type, connections, mapping))
    }

    /// Copy of the warnings accumulated so far.
    pub fn warnings(&self) -> Vec<ParseIssue> {
        self.warnings.clone()
    }

    /// Drain the accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdl::lexer::Lexer;
    use crate::cdl::Severity;

    fn token(src: &str) -> LogicalLine {
        Lexer::tokenize(src).remove(0)
    }

    fn inv_defs() -> HashMap<String, SubcircuitDefinition> {
        let mut defs = HashMap::new();
        defs.insert(
            "INV".to_string(),
            SubcircuitDefinition::new("INV", vec!["A".to_string(), "Y".to_string()]),
        );
        defs
    }

    #[test]
    fn test_known_cell_maps_ports_in_order() {
        let mut parser = InstanceParser::new();
        let inst = parser
            .parse_instance_line(&token("XI1 IN n1 INV"), &inv_defs())
            .unwrap();

        assert_eq!(inst.name(), "XI1");
        assert_eq!(inst.cell_type(), "INV");
        assert_eq!(inst.connections()["A"], "IN");
        assert_eq!(inst.connections()["Y"], "n1");
        assert!(!inst.mapping().is_synthesized());
        assert!(parser.warnings().is_empty());
    }

    #[test]
    fn test_unknown_cell_synthesizes_generic_ports() {
        let mut parser = InstanceParser::new();
        let inst = parser
            .parse_instance_line(&token("XI1 A B C FOO"), &HashMap::new())
            .unwrap();

        assert_eq!(inst.cell_type(), "FOO");
        assert!(inst.mapping().is_synthesized());
        let ports: Vec<&String> = inst.connections().keys().collect();
        assert_eq!(ports, ["port0", "port1", "port2"]);

        let warnings = parser.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Warning);
        assert!(warnings[0].message.contains("FOO"));
    }

    #[test]
    fn test_too_few_nets_maps_prefix_with_warning() {
        let mut parser = InstanceParser::new();
        let inst = parser
            .parse_instance_line(&token("XI1 IN INV"), &inv_defs())
            .unwrap();

        assert_eq!(inst.connections().len(), 1);
        assert_eq!(inst.connections()["A"], "IN");
        let warnings = parser.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("too few"));
        assert!(warnings[0].message.contains("XI1"));
    }

    #[test]
    fn test_too_many_nets_maps_prefix_with_warning() {
        let mut parser = InstanceParser::new();
        let inst = parser
            .parse_instance_line(&token("XI1 IN n1 n2 INV"), &inv_defs())
            .unwrap();

        assert_eq!(inst.connections().len(), 2);
        assert_eq!(inst.connections()["A"], "IN");
        assert_eq!(inst.connections()["Y"], "n1");
        assert!(parser.warnings()[0].message.contains("too many"));
    }

    #[test]
    fn test_bad_prefix_fails() {
        let mut parser = InstanceParser::new();
        let err = parser
            .parse_instance_line(
                &LogicalLine {
                    line_num: 7,
                    line_type: crate::cdl::LineType::Unknown,
                    content: "I1 A Y INV".to_string(),
                    raw: "I1 A Y INV".to_string(),
                },
                &inv_defs(),
            )
            .unwrap_err();
        assert!(matches!(err, CdlError::InvalidInstancePrefix { .. }));
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_missing_cell_type_fails() {
        let mut parser = InstanceParser::new();
        let err = parser
            .parse_instance_line(&token("XI1"), &inv_defs())
            .unwrap_err();
        assert!(matches!(err, CdlError::MissingCellType { .. }));
    }

    #[test]
    fn test_zero_net_instance_is_valid() {
        let mut parser = InstanceParser::new();
        let inst = parser
            .parse_instance_line(&token("XI1 FOO"), &HashMap::new())
            .unwrap();
        assert!(inst.connections().is_empty());
    }

    #[test]
    fn test_warnings_accessor_returns_copy() {
        let mut parser = InstanceParser::new();
        parser
            .parse_instance_line(&token("XI1 A FOO"), &HashMap::new())
            .unwrap();
        let mut copy = parser.warnings();
        copy.clear();
        assert_eq!(parser.warnings().len(), 1);
    }

    #[test]
    fn test_connection_count_invariant() {
        let mut parser = InstanceParser::new();
        let defs = inv_defs();

        let known = parser
            .parse_instance_line(&token("XI1 IN n1 n2 INV"), &defs)
            .unwrap();
        assert_eq!(known.connections().len(), 2);

        let unknown = parser
            .parse_instance_line(&token("XI2 a b c d FOO"), &defs)
            .unwrap();
        assert_eq!(unknown.connections().len(), 4);
    }
}
