// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Parser orchestrator
//!
//! Drives the two-pass CDL pipeline over a buffered token list:
//!
//! Pass 1 feeds `.SUBCKT`/`.ENDS` tokens to the block parser so every
//! definition is known before any instance is resolved, regardless of
//! file order. Pass 2 resolves instance lines against those definitions.
//! Per-line failures are collected as line-tagged issues and parsing
//! continues; the overall parse fails only if any error-severity issue
//! exists once all recoverable work has been attempted.

use std::collections::HashMap;
use std::sync::Arc;

use super::instance::InstanceParser;
use super::lexer::Lexer;
use super::netname::NetNormalizer;
use super::subckt::SubcktBlockParser;
use super::{
    CdlError, CellInstance, LineType, NetInfo, ParseIssue, Severity, SubcircuitDefinition,
};
use indexmap::IndexMap;

/// Tokens between progress callback invocations.
const PROGRESS_INTERVAL: usize = 1000;

/// Everything a successful parse produces.
#[derive(Debug)]
pub struct CdlDesign {
    /// Subcircuit definitions by name.
    pub definitions: HashMap<String, SubcircuitDefinition>,
    /// Instances by instance name, in file order.
    pub instances: IndexMap<String, CellInstance>,
    /// Normalized info for every unique net name, keyed by original name.
    pub nets: HashMap<String, Arc<NetInfo>>,
    /// Non-fatal issues collected during the parse.
    pub issues: Vec<ParseIssue>,
}

/// Progress callback invoked with `(tokens processed, total tokens)`.
pub type ProgressCallback = Box<dyn FnMut(usize, usize)>;

/// Two-pass CDL parser.
#[derive(Default)]
pub struct CdlParser {
    normalizer: NetNormalizer,
    progress: Option<ProgressCallback>,
}

impl CdlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom net normalizer (e.g. with project-specific
    /// power/ground name sets).
    pub fn with_normalizer(normalizer: NetNormalizer) -> Self {
        Self {
            normalizer,
            progress: None,
        }
    }

    /// Install a coarse-grained progress callback.
    ///
    /// The callback is a plain synchronous call; a panic inside it
    /// propagates and aborts parsing.
    pub fn set_progress_callback(&mut self, callback: impl FnMut(usize, usize) + 'static) {
        self.progress = Some(Box::new(callback));
    }

    /// Parse CDL source text.
    ///
    /// Returns the assembled artifacts (with warning-severity issues
    /// attached) or a single aggregated error listing every line-tagged
    /// problem.
    pub fn parse(&mut self, source: &str) -> Result<CdlDesign, CdlError> {
        let tokens = Lexer::tokenize(source);
        let total = tokens.len();
        let mut issues: Vec<ParseIssue> = Vec::new();

        // Pass 1: collect subcircuit definitions.
        let mut blocks = SubcktBlockParser::new();
        for (i, token) in tokens.iter().enumerate() {
            self.report_progress(i, total);
            let result = match token.line_type {
                LineType::Subckt => blocks.parse_subckt_line(token),
                LineType::Ends => blocks.parse_ends_line(token),
                _ => Ok(()),
            };
            if let Err(err) = result {
                issues.push(ParseIssue::error(err.line(), err.to_string()));
            }
        }
        if let Err(err) = blocks.validate_complete() {
            issues.push(ParseIssue::error(None, err.to_string()));
        }
        let definitions = blocks.into_definitions();

        // Pass 2: resolve instances against pass-1 definitions.
        let mut instance_parser = InstanceParser::new();
        let mut instances: IndexMap<String, CellInstance> = IndexMap::new();
        for (i, token) in tokens.iter().enumerate() {
            self.report_progress(i, total);
            if token.line_type != LineType::Instance {
                continue;
            }
            match instance_parser.parse_instance_line(token, &definitions) {
                Ok(inst) => {
                    instances.insert(inst.name().to_string(), inst);
                }
                Err(err) => {
                    issues.push(ParseIssue::error(err.line(), err.to_string()));
                }
            }
        }
        issues.extend(instance_parser.take_warnings());

        // Normalize every unique net name exactly once.
        let mut nets: HashMap<String, Arc<NetInfo>> = HashMap::new();
        for inst in instances.values() {
            for net in inst.connections().values() {
                if !nets.contains_key(net) {
                    nets.insert(net.clone(), self.normalizer.normalize(net));
                }
            }
        }

        let errors: Vec<&ParseIssue> = issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
            .collect();
        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|issue| issue.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            log::warn!("CDL parse failed with {} error(s)", errors.len());
            return Err(CdlError::ParseFailed {
                errors: errors.len(),
                details,
            });
        }

        log::debug!(
            "parsed {} definitions, {} instances, {} nets ({} warnings)",
            definitions.len(),
            instances.len(),
            nets.len(),
            issues.len()
        );

        Ok(CdlDesign {
            definitions,
            instances,
            nets,
            issues,
        })
    }

    fn report_progress(&mut self, processed: usize, total: usize) {
        if let Some(callback) = self.progress.as_mut() {
            if processed % PROGRESS_INTERVAL == 0 {
                callback(processed, total);
            }
        }
    }
}
