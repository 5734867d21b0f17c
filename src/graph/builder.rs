// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Graph builder
//!
//! Projects a netlist aggregate into a [`ConnectivityGraph`]. The graph
//! is a derived index, not the source of truth: every build starts from
//! a fresh graph, so the builder is reusable across aggregates.
//!
//! Signal-flow direction rules:
//! - OUTPUT pin → its net; net → INPUT pin.
//! - An INOUT pin is treated as a receiver (net → pin), a deliberate
//!   simplification for fanout/fanin traversal, not a modeling
//!   limitation.
//! - INPUT port → its net (external drives internal); net → OUTPUT
//!   port. An INOUT port is treated as a driver (port → net), the
//!   mirror simplification of the pin case.
//!
//! Floating pins/ports get no signal-flow edge.

use crate::netlist::aggregate::Netlist;
use crate::netlist::Direction;

use super::{ConnectivityGraph, EdgeKind, GraphNode};

/// Builds connectivity graphs from netlist aggregates.
#[derive(Debug, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Project `netlist` into a fresh connectivity graph.
    pub fn build(&self, netlist: &Netlist) -> ConnectivityGraph {
        let mut graph = ConnectivityGraph::new();

        for cell in netlist.get_all_cells() {
            graph.add_node(GraphNode::Cell(cell.id().clone()));
            for pin in cell.pins() {
                graph.add_edge(
                    GraphNode::Cell(cell.id().clone()),
                    GraphNode::Pin(pin.clone()),
                    EdgeKind::Contains,
                );
            }
        }

        for net in netlist.get_all_nets() {
            graph.add_node(GraphNode::Net(net.id().clone()));
        }

        for pin in netlist.get_all_pins() {
            graph.add_node(GraphNode::Pin(pin.id().clone()));
            let net = match pin.net() {
                Some(net) if netlist.get_net(net).is_some() => net.clone(),
                _ => continue,
            };
            let pin_node = GraphNode::Pin(pin.id().clone());
            let net_node = GraphNode::Net(net);
            match pin.direction() {
                Direction::Output => graph.add_edge(pin_node, net_node, EdgeKind::Drives),
                Direction::Input | Direction::Inout => {
                    graph.add_edge(net_node, pin_node, EdgeKind::Drives)
                }
            }
        }

        for port in netlist.get_all_ports() {
            graph.add_node(GraphNode::Port(port.id().clone()));
            let net = match port.net() {
                Some(net) if netlist.get_net(net).is_some() => net.clone(),
                _ => continue,
            };
            let port_node = GraphNode::Port(port.id().clone());
            let net_node = GraphNode::Net(net);
            match port.direction() {
                Direction::Input | Direction::Inout => {
                    graph.add_edge(port_node, net_node, EdgeKind::Drives)
                }
                Direction::Output => graph.add_edge(net_node, port_node, EdgeKind::Drives),
            }
        }

        log::debug!(
            "built connectivity graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }
}
