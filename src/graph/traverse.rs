// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Connectivity traverser
//!
//! Bounded-hop fanout/fanin, pin-level lookups and shortest-path queries
//! over the connectivity graph. All queries resolve back to aggregate
//! entities and never fail for "not found": unknown ids yield empty
//! results. Cost is O(visited), bounded by the caller-chosen hop limits,
//! and visited-set tracking guarantees termination on feedback cycles.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::netlist::aggregate::Netlist;
use crate::netlist::{Cell, CellId, Net, NetId, Pin, PinId};

use super::{ConnectivityGraph, EdgeKind, GraphNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Fanout,
    Fanin,
}

/// Query engine over a connectivity graph and its source aggregate.
pub struct ConnectivityTraverser<'a> {
    graph: &'a ConnectivityGraph,
    netlist: &'a Netlist,
}

impl<'a> ConnectivityTraverser<'a> {
    pub fn new(graph: &'a ConnectivityGraph, netlist: &'a Netlist) -> Self {
        Self { graph, netlist }
    }

    /// Cells whose pins attach to `net` via a signal-flow edge in either
    /// direction, deduplicated by cell id.
    pub fn get_connected_cells(&self, net: &NetId) -> Vec<Cell> {
        let node = GraphNode::Net(net.clone());
        let mut seen: HashSet<CellId> = HashSet::new();
        let mut cells = Vec::new();

        let attached = self
            .graph
            .outgoing(&node)
            .iter()
            .chain(self.graph.incoming(&node).iter())
            .filter(|(_, kind)| *kind == EdgeKind::Drives);
        for (neighbor, _) in attached {
            if let GraphNode::Pin(pin) = neighbor {
                for cell_id in self.parent_cells(pin) {
                    if seen.insert(cell_id.clone()) {
                        if let Some(cell) = self.netlist.get_cell(&cell_id) {
                            cells.push(cell.clone());
                        }
                    }
                }
            }
        }
        cells
    }

    /// Pins reached via containment edges from `cell`.
    pub fn get_cell_pins(&self, cell: &CellId) -> Vec<Pin> {
        self.pin_ids_of(cell)
            .into_iter()
            .filter_map(|pin| self.netlist.get_pin(&pin).cloned())
            .collect()
    }

    /// The net a pin is attached to, or `None` if floating/unknown.
    pub fn get_pin_net(&self, pin: &PinId) -> Option<Net> {
        let node = GraphNode::Pin(pin.clone());
        let attached = self
            .graph
            .outgoing(&node)
            .iter()
            .chain(self.graph.incoming(&node).iter())
            .filter(|(_, kind)| *kind == EdgeKind::Drives)
            .find_map(|(neighbor, _)| match neighbor {
                GraphNode::Net(net) => Some(net.clone()),
                _ => None,
            })?;
        self.netlist.get_net(&attached).cloned()
    }

    /// Cells reachable within `hops` downstream of `cell`.
    ///
    /// The starting cell is excluded. With `stop_at_sequential`, a
    /// sequential cell is included in the result but not expanded
    /// further (register/latch isolation for incremental exploration).
    /// `hops == 0` yields an empty result.
    pub fn get_fanout_cells(
        &self,
        cell: &CellId,
        hops: usize,
        stop_at_sequential: bool,
    ) -> Vec<Cell> {
        self.bounded_cells(cell, hops, stop_at_sequential, Flow::Fanout)
    }

    /// Cells reachable within `hops` upstream of `cell`.
    pub fn get_fanin_cells(
        &self,
        cell: &CellId,
        hops: usize,
        stop_at_sequential: bool,
    ) -> Vec<Cell> {
        self.bounded_cells(cell, hops, stop_at_sequential, Flow::Fanin)
    }

    /// Fanout from a pin, at cell granularity: resolves the pin's parent
    /// cell(s) and delegates to the cell-level query.
    pub fn get_fanout_from_pin(
        &self,
        pin: &PinId,
        hops: usize,
        stop_at_sequential: bool,
    ) -> Vec<Cell> {
        self.from_pin(pin, hops, stop_at_sequential, Flow::Fanout)
    }

    /// Fanin to a pin, at cell granularity.
    pub fn get_fanin_to_pin(
        &self,
        pin: &PinId,
        hops: usize,
        stop_at_sequential: bool,
    ) -> Vec<Cell> {
        self.from_pin(pin, hops, stop_at_sequential, Flow::Fanin)
    }

    /// Shortest path by hop count between two cells over an undirected
    /// view of the graph, filtered down to cell nodes, start-to-end
    /// inclusive.
    ///
    /// `None` if either cell is unknown, no path exists, or the shortest
    /// path needs more than `max_hops` cell-to-cell steps.
    pub fn find_path(&self, from: &CellId, to: &CellId, max_hops: usize) -> Option<Vec<Cell>> {
        let start = GraphNode::Cell(from.clone());
        let goal = GraphNode::Cell(to.clone());
        if !self.graph.contains(&start) || !self.graph.contains(&goal) {
            return None;
        }
        if from == to {
            return self.netlist.get_cell(from).map(|cell| vec![cell.clone()]);
        }

        // One cell-to-cell hop spans four graph edges
        // (cell→pin, pin→net, net→pin, pin→cell).
        let max_depth = max_hops.saturating_mul(4);
        let mut visited: HashSet<GraphNode> = HashSet::from([start.clone()]);
        let mut pred: HashMap<GraphNode, GraphNode> = HashMap::new();
        let mut queue: VecDeque<(GraphNode, usize)> = VecDeque::from([(start.clone(), 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let neighbors = self
                .graph
                .outgoing(&node)
                .iter()
                .chain(self.graph.incoming(&node).iter());
            for (next, _) in neighbors {
                if !visited.insert(next.clone()) {
                    continue;
                }
                pred.insert(next.clone(), node.clone());
                if *next == goal {
                    return self.reconstruct(&pred, &start, &goal, max_hops);
                }
                queue.push_back((next.clone(), depth + 1));
            }
        }
        None
    }

    fn reconstruct(
        &self,
        pred: &HashMap<GraphNode, GraphNode>,
        start: &GraphNode,
        goal: &GraphNode,
        max_hops: usize,
    ) -> Option<Vec<Cell>> {
        let mut nodes = vec![goal.clone()];
        let mut current = goal;
        while current != start {
            current = pred.get(current)?;
            nodes.push(current.clone());
        }
        nodes.reverse();

        let cells: Vec<Cell> = nodes
            .iter()
            .filter_map(|node| match node {
                GraphNode::Cell(id) => self.netlist.get_cell(id).cloned(),
                _ => None,
            })
            .collect();
        if cells.len().saturating_sub(1) > max_hops {
            return None;
        }
        Some(cells)
    }

    fn from_pin(
        &self,
        pin: &PinId,
        hops: usize,
        stop_at_sequential: bool,
        flow: Flow,
    ) -> Vec<Cell> {
        let mut seen: HashSet<CellId> = HashSet::new();
        let mut cells = Vec::new();
        for parent in self.parent_cells(pin) {
            let reached = self.bounded_cells(&parent, hops, stop_at_sequential, flow);
            for cell in reached {
                if seen.insert(cell.id().clone()) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// Hop-by-hop breadth-first expansion at cell granularity.
    fn bounded_cells(
        &self,
        start: &CellId,
        hops: usize,
        stop_at_sequential: bool,
        flow: Flow,
    ) -> Vec<Cell> {
        if hops == 0 || !self.graph.contains(&GraphNode::Cell(start.clone())) {
            return Vec::new();
        }

        let mut visited: HashSet<CellId> = HashSet::from([start.clone()]);
        let mut frontier: Vec<CellId> = vec![start.clone()];
        let mut found: Vec<CellId> = Vec::new();

        for _ in 0..hops {
            let mut next = Vec::new();
            for cell_id in &frontier {
                if stop_at_sequential && cell_id != start && self.is_sequential(cell_id) {
                    continue;
                }
                for neighbor in self.neighbor_cells(cell_id, flow) {
                    if visited.insert(neighbor.clone()) {
                        found.push(neighbor.clone());
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        found
            .into_iter()
            .filter_map(|id| self.netlist.get_cell(&id).cloned())
            .collect()
    }

    /// Cells one signal-flow hop away from `cell`. Only pins matching
    /// the traversal direction carry the needed edges; floating pins
    /// have none and are skipped naturally.
    fn neighbor_cells(&self, cell: &CellId, flow: Flow) -> Vec<CellId> {
        let mut neighbors = Vec::new();
        for pin in self.pin_ids_of(cell) {
            let pin_node = GraphNode::Pin(pin);
            let nets: Vec<NetId> = match flow {
                Flow::Fanout => self
                    .graph
                    .outgoing(&pin_node)
                    .iter()
                    .filter(|(_, kind)| *kind == EdgeKind::Drives)
                    .filter_map(|(node, _)| match node {
                        GraphNode::Net(net) => Some(net.clone()),
                        _ => None,
                    })
                    .collect(),
                Flow::Fanin => self
                    .graph
                    .incoming(&pin_node)
                    .iter()
                    .filter(|(_, kind)| *kind == EdgeKind::Drives)
                    .filter_map(|(node, _)| match node {
                        GraphNode::Net(net) => Some(net.clone()),
                        _ => None,
                    })
                    .collect(),
            };

            for net in nets {
                let net_node = GraphNode::Net(net);
                let edges = match flow {
                    Flow::Fanout => self.graph.outgoing(&net_node),
                    Flow::Fanin => self.graph.incoming(&net_node),
                };
                for (node, kind) in edges {
                    if *kind != EdgeKind::Drives {
                        continue;
                    }
                    if let GraphNode::Pin(far_pin) = node {
                        neighbors.extend(self.parent_cells(far_pin));
                    }
                }
            }
        }
        neighbors
    }

    fn pin_ids_of(&self, cell: &CellId) -> Vec<PinId> {
        self.graph
            .outgoing(&GraphNode::Cell(cell.clone()))
            .iter()
            .filter(|(_, kind)| *kind == EdgeKind::Contains)
            .filter_map(|(node, _)| match node {
                GraphNode::Pin(pin) => Some(pin.clone()),
                _ => None,
            })
            .collect()
    }

    fn parent_cells(&self, pin: &PinId) -> Vec<CellId> {
        self.graph
            .incoming(&GraphNode::Pin(pin.clone()))
            .iter()
            .filter(|(_, kind)| *kind == EdgeKind::Contains)
            .filter_map(|(node, _)| match node {
                GraphNode::Cell(cell) => Some(cell.clone()),
                _ => None,
            })
            .collect()
    }

    fn is_sequential(&self, cell: &CellId) -> bool {
        self.netlist
            .get_cell(cell)
            .map(Cell::is_sequential)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::GraphBuilder;
    use crate::netlist::{Direction, Net, Pin};

    /// Chain of cells `names[0] → names[1] → ...`, each with one input
    /// pin A and one output pin Y; `sequential` marks cells by name.
    fn chain(names: &[&str], sequential: &[&str]) -> Netlist {
        let mut netlist = Netlist::new();
        let mut net_pins: HashMap<String, Vec<PinId>> = HashMap::new();

        for (i, name) in names.iter().enumerate() {
            let in_pin = PinId::new(format!("{name}/A"));
            let out_pin = PinId::new(format!("{name}/Y"));
            let in_net = (i > 0).then(|| NetId::new(format!("net_{i}")));
            let out_net = (i + 1 < names.len()).then(|| NetId::new(format!("net_{}", i + 1)));

            if let Some(net) = &in_net {
                net_pins
                    .entry(net.to_string())
                    .or_default()
                    .push(in_pin.clone());
            }
            if let Some(net) = &out_net {
                net_pins
                    .entry(net.to_string())
                    .or_default()
                    .push(out_pin.clone());
            }

            netlist
                .add_pin(Pin::new(in_pin.clone(), "A", Direction::Input, in_net))
                .unwrap();
            netlist
                .add_pin(Pin::new(out_pin.clone(), "Y", Direction::Output, out_net))
                .unwrap();
            netlist
                .add_cell(Cell::new(
                    CellId::from(*name),
                    *name,
                    "INV",
                    vec![in_pin, out_pin],
                    sequential.contains(name),
                ))
                .unwrap();
        }
        for (name, pins) in net_pins {
            netlist
                .add_net(Net::new(NetId::new(name.clone()), name, pins))
                .unwrap();
        }
        assert!(netlist.validate().is_empty());
        netlist
    }

    fn names(cells: &[Cell]) -> HashSet<String> {
        cells.iter().map(|c| c.name().to_string()).collect()
    }

    #[test]
    fn test_fanout_one_hop() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let fanout = traverser.get_fanout_cells(&CellId::from("XI1"), 1, false);
        assert_eq!(fanout.len(), 1);
        assert_eq!(fanout[0].name(), "XI2");
    }

    #[test]
    fn test_fanout_two_hops() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let fanout = traverser.get_fanout_cells(&CellId::from("XI1"), 2, false);
        assert_eq!(
            names(&fanout),
            HashSet::from(["XI2".to_string(), "XI3".to_string()])
        );
    }

    #[test]
    fn test_fanin_mirrors_fanout() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let fanin = traverser.get_fanin_cells(&CellId::from("XI3"), 2, false);
        assert_eq!(
            names(&fanin),
            HashSet::from(["XI1".to_string(), "XI2".to_string()])
        );
    }

    #[test]
    fn test_zero_hops_yields_empty() {
        let netlist = chain(&["XI1", "XI2"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        assert!(traverser
            .get_fanout_cells(&CellId::from("XI1"), 0, false)
            .is_empty());
    }

    #[test]
    fn test_unknown_cell_yields_empty() {
        let netlist = chain(&["XI1"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        assert!(traverser
            .get_fanout_cells(&CellId::from("ghost"), 3, false)
            .is_empty());
    }

    #[test]
    fn test_large_hop_count_terminates() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        let fanout = traverser.get_fanout_cells(&CellId::from("XI1"), usize::MAX, false);
        assert_eq!(fanout.len(), 2);
    }

    #[test]
    fn test_feedback_cycle_terminates_and_excludes_start() {
        // XI1 → XI2 → XI1 ring oscillator style loop.
        let mut netlist = Netlist::new();
        for (cell, input, output) in [("XI1", "n2", "n1"), ("XI2", "n1", "n2")] {
            let in_pin = PinId::new(format!("{cell}/A"));
            let out_pin = PinId::new(format!("{cell}/Y"));
            netlist
                .add_pin(Pin::new(
                    in_pin.clone(),
                    "A",
                    Direction::Input,
                    Some(NetId::from(input)),
                ))
                .unwrap();
            netlist
                .add_pin(Pin::new(
                    out_pin.clone(),
                    "Y",
                    Direction::Output,
                    Some(NetId::from(output)),
                ))
                .unwrap();
            netlist
                .add_cell(Cell::new(
                    CellId::from(cell),
                    cell,
                    "INV",
                    vec![in_pin, out_pin],
                    false,
                ))
                .unwrap();
        }
        for (net, driver, load) in [("n1", "XI1/Y", "XI2/A"), ("n2", "XI2/Y", "XI1/A")] {
            netlist
                .add_net(Net::new(
                    NetId::from(net),
                    net,
                    vec![PinId::from(driver), PinId::from(load)],
                ))
                .unwrap();
        }

        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        let fanout = traverser.get_fanout_cells(&CellId::from("XI1"), 100, false);
        assert_eq!(names(&fanout), HashSet::from(["XI2".to_string()]));
    }

    #[test]
    fn test_sequential_cell_is_boundary() {
        let netlist = chain(&["XI1", "XFF", "XI2"], &["XFF"]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let stopped = traverser.get_fanout_cells(&CellId::from("XI1"), 3, true);
        assert_eq!(names(&stopped), HashSet::from(["XFF".to_string()]));

        let through = traverser.get_fanout_cells(&CellId::from("XI1"), 3, false);
        assert_eq!(
            names(&through),
            HashSet::from(["XFF".to_string(), "XI2".to_string()])
        );
    }

    #[test]
    fn test_sequential_start_is_expanded() {
        let netlist = chain(&["XFF", "XI1"], &["XFF"]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        let fanout = traverser.get_fanout_cells(&CellId::from("XFF"), 1, true);
        assert_eq!(names(&fanout), HashSet::from(["XI1".to_string()]));
    }

    #[test]
    fn test_connected_cells_on_net() {
        let netlist = chain(&["XI1", "XI2"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let cells = traverser.get_connected_cells(&NetId::from("net_1"));
        assert_eq!(
            names(&cells),
            HashSet::from(["XI1".to_string(), "XI2".to_string()])
        );
        assert!(traverser
            .get_connected_cells(&NetId::from("ghost"))
            .is_empty());
    }

    #[test]
    fn test_cell_pins_and_pin_net() {
        let netlist = chain(&["XI1", "XI2"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let pins = traverser.get_cell_pins(&CellId::from("XI1"));
        assert_eq!(pins.len(), 2);
        assert!(traverser.get_cell_pins(&CellId::from("ghost")).is_empty());

        let net = traverser.get_pin_net(&PinId::from("XI1/Y")).unwrap();
        assert_eq!(net.name(), "net_1");
        // XI1/A is floating in a 2-cell chain.
        assert!(traverser.get_pin_net(&PinId::from("XI1/A")).is_none());
    }

    #[test]
    fn test_pin_level_fanout_delegates_to_cell() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let from_pin = traverser.get_fanout_from_pin(&PinId::from("XI1/Y"), 1, false);
        let from_cell = traverser.get_fanout_cells(&CellId::from("XI1"), 1, false);
        assert_eq!(names(&from_pin), names(&from_cell));

        let to_pin = traverser.get_fanin_to_pin(&PinId::from("XI3/A"), 1, false);
        assert_eq!(names(&to_pin), HashSet::from(["XI2".to_string()]));
    }

    #[test]
    fn test_find_path_hop_limits() {
        let netlist = chain(&["XI1", "XI2", "XI3"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        assert!(traverser
            .find_path(&CellId::from("XI1"), &CellId::from("XI3"), 1)
            .is_none());

        let path = traverser
            .find_path(&CellId::from("XI1"), &CellId::from("XI3"), 2)
            .unwrap();
        let path_names: Vec<&str> = path.iter().map(Cell::name).collect();
        assert_eq!(path_names, ["XI1", "XI2", "XI3"]);
    }

    #[test]
    fn test_find_path_against_signal_flow() {
        // The undirected view allows walking upstream.
        let netlist = chain(&["XI1", "XI2"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        let path = traverser
            .find_path(&CellId::from("XI2"), &CellId::from("XI1"), 1)
            .unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_find_path_same_cell() {
        let netlist = chain(&["XI1"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);
        let path = traverser
            .find_path(&CellId::from("XI1"), &CellId::from("XI1"), 0)
            .unwrap();
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_find_path_unknown_or_disconnected() {
        let netlist = chain(&["XI1", "XI2"], &[]);
        let graph = GraphBuilder::new().build(&netlist);
        let traverser = ConnectivityTraverser::new(&graph, &netlist);

        assert!(traverser
            .find_path(&CellId::from("XI1"), &CellId::from("ghost"), 5)
            .is_none());

        // Disconnected island.
        let island = chain(&["XA1", "XA2"], &[]);
        let island_graph = GraphBuilder::new().build(&island);
        let island_traverser = ConnectivityTraverser::new(&island_graph, &island);
        assert!(island_traverser
            .find_path(&CellId::from("XA1"), &CellId::from("XA2"), 10)
            .is_some());
    }
}
