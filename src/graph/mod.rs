// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Connectivity graph
//!
//! A directed multigraph projected from the netlist aggregate. Nodes are
//! typed ids resolving back to aggregate entities (no duplicated state);
//! edges encode containment (cell → pin) and signal flow ("drives").
//! Parallel edges between the same node pair are allowed (bus signals
//! create multiple same-direction connections).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::netlist::{CellId, NetId, PinId, PortId};

pub mod builder;
pub mod traverse;

/// A typed node of the connectivity graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphNode {
    Cell(CellId),
    Pin(PinId),
    Net(NetId),
    Port(PortId),
}

/// Kind of a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Cell → pin containment.
    Contains,
    /// Signal flow: driver → receiver.
    Drives,
}

/// Adjacency-list directed multigraph.
#[derive(Debug, Default)]
pub struct ConnectivityGraph {
    nodes: HashSet<GraphNode>,
    outgoing: HashMap<GraphNode, Vec<(GraphNode, EdgeKind)>>,
    incoming: HashMap<GraphNode, Vec<(GraphNode, EdgeKind)>>,
    edge_count: usize,
}

impl ConnectivityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.insert(node);
    }

    /// Add a directed edge; endpoints are added implicitly. Parallel
    /// edges are kept.
    pub fn add_edge(&mut self, from: GraphNode, to: GraphNode, kind: EdgeKind) {
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());
        self.outgoing
            .entry(from.clone())
            .or_default()
            .push((to.clone(), kind));
        self.incoming.entry(to).or_default().push((from, kind));
        self.edge_count += 1;
    }

    pub fn contains(&self, node: &GraphNode) -> bool {
        self.nodes.contains(node)
    }

    /// Outgoing edges of `node` (empty for unknown nodes).
    pub fn outgoing(&self, node: &GraphNode) -> &[(GraphNode, EdgeKind)] {
        self.outgoing.get(node).map_or(&[], Vec::as_slice)
    }

    /// Incoming edges of `node` (empty for unknown nodes).
    pub fn incoming(&self, node: &GraphNode) -> &[(GraphNode, EdgeKind)] {
        self.incoming.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
