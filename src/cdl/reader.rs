// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use std::fs;
use std::path::Path;

use super::parser::{CdlDesign, CdlParser};

/// File-level entry point for CDL parsing.
pub struct CdlReader {
    parser: CdlParser,
}

impl CdlReader {
    pub fn new() -> Self {
        Self {
            parser: CdlParser::new(),
        }
    }

    /// Build a reader around a pre-configured parser (custom normalizer
    /// or progress callback).
    pub fn with_parser(parser: CdlParser) -> Self {
        Self { parser }
    }

    /// Read and parse a CDL file.
    pub fn read<P: AsRef<Path>>(&mut self, path: P) -> Result<CdlDesign, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        log::info!("loading CDL file: {}", path.display());

        let content = fs::read_to_string(path)?;
        log::debug!("CDL file size: {} bytes", content.len());

        let design = self.parser.parse(&content)?;
        log::info!(
            "parsed {} definitions, {} instances, {} nets",
            design.definitions.len(),
            design.instances.len(),
            design.nets.len()
        );
        for issue in &design.issues {
            log::warn!("{issue}");
        }
        Ok(design)
    }
}

impl Default for CdlReader {
    fn default() -> Self {
        Self::new()
    }
}
