// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! CDL Netlist Library
//!
//! This library provides parsing, validation and connectivity analysis for
//! CDL (Circuit Description Language) netlists used in Electronic Design
//! Automation (EDA) workflows: a tolerant line-oriented parser, a validated
//! netlist aggregate, and a bounded-query connectivity graph.

pub mod cdl;
pub mod export;
pub mod graph;
pub mod netlist;

// Re-export commonly used types
pub use cdl::parser::{CdlDesign, CdlParser};
pub use cdl::reader::CdlReader;
pub use cdl::{CdlError, CellInstance, NetInfo, NetType, ParseIssue, Severity, SubcircuitDefinition};
pub use graph::builder::GraphBuilder;
pub use graph::traverse::ConnectivityTraverser;
pub use graph::{ConnectivityGraph, EdgeKind, GraphNode};
pub use netlist::aggregate::{Netlist, NetlistError};
pub use netlist::populate::populate_netlist;
pub use netlist::{Cell, CellId, Direction, Net, NetId, Pin, PinId, Port, PortId};
