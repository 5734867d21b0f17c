// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Netlist aggregate
//!
//! The authoritative in-memory model of a design: cells, pins, nets and
//! ports behind dual O(1) indexes (id → entity and name → id). Add
//! operations are eager and fail fast on duplicate ids/names;
//! cross-reference checks are deferred to an explicit [`Netlist::validate`]
//! pass so entities may legitimately reference not-yet-inserted entities
//! while a parse is still populating the aggregate.

use std::collections::HashMap;

use thiserror::Error;

use super::{Cell, CellId, Net, NetId, Pin, PinId, Port, PortId};

/// Errors raised by aggregate construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetlistError {
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("duplicate {kind} name '{name}'")]
    DuplicateName { kind: &'static str, name: String },
}

/// The netlist aggregate.
///
/// Cell/net/port names are unique; pins are exempt (local pin names like
/// "A" recur across cells), so pins have no name index.
#[derive(Debug, Default)]
pub struct Netlist {
    cells: HashMap<CellId, Cell>,
    cell_names: HashMap<String, CellId>,
    nets: HashMap<NetId, Net>,
    net_names: HashMap<String, NetId>,
    pins: HashMap<PinId, Pin>,
    ports: HashMap<PortId, Port>,
    port_names: HashMap<String, PortId>,
}

impl Netlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cell, failing fast on a duplicate id or name.
    pub fn add_cell(&mut self, cell: Cell) -> Result<(), NetlistError> {
        if self.cells.contains_key(cell.id()) {
            return Err(NetlistError::DuplicateId {
                kind: "cell",
                id: cell.id().to_string(),
            });
        }
        if self.cell_names.contains_key(cell.name()) {
            return Err(NetlistError::DuplicateName {
                kind: "cell",
                name: cell.name().to_string(),
            });
        }
        self.cell_names
            .insert(cell.name().to_string(), cell.id().clone());
        self.cells.insert(cell.id().clone(), cell);
        Ok(())
    }

    /// Insert a net, failing fast on a duplicate id or name.
    pub fn add_net(&mut self, net: Net) -> Result<(), NetlistError> {
        if self.nets.contains_key(net.id()) {
            return Err(NetlistError::DuplicateId {
                kind: "net",
                id: net.id().to_string(),
            });
        }
        if self.net_names.contains_key(net.name()) {
            return Err(NetlistError::DuplicateName {
                kind: "net",
                name: net.name().to_string(),
            });
        }
        self.net_names
            .insert(net.name().to_string(), net.id().clone());
        self.nets.insert(net.id().clone(), net);
        Ok(())
    }

    /// Insert a pin, failing fast on a duplicate id.
    ///
    /// Pin names are not required to be unique.
    pub fn add_pin(&mut self, pin: Pin) -> Result<(), NetlistError> {
        if self.pins.contains_key(pin.id()) {
            return Err(NetlistError::DuplicateId {
                kind: "pin",
                id: pin.id().to_string(),
            });
        }
        self.pins.insert(pin.id().clone(), pin);
        Ok(())
    }

    /// Insert a port, failing fast on a duplicate id or name.
    pub fn add_port(&mut self, port: Port) -> Result<(), NetlistError> {
        if self.ports.contains_key(port.id()) {
            return Err(NetlistError::DuplicateId {
                kind: "port",
                id: port.id().to_string(),
            });
        }
        if self.port_names.contains_key(port.name()) {
            return Err(NetlistError::DuplicateName {
                kind: "port",
                name: port.name().to_string(),
            });
        }
        self.port_names
            .insert(port.name().to_string(), port.id().clone());
        self.ports.insert(port.id().clone(), port);
        Ok(())
    }

    pub fn get_cell(&self, id: &CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn get_cell_by_name(&self, name: &str) -> Option<&Cell> {
        self.cell_names.get(name).and_then(|id| self.cells.get(id))
    }

    pub fn get_net(&self, id: &NetId) -> Option<&Net> {
        self.nets.get(id)
    }

    pub fn get_net_by_name(&self, name: &str) -> Option<&Net> {
        self.net_names.get(name).and_then(|id| self.nets.get(id))
    }

    pub fn get_pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    pub fn get_port(&self, id: &PortId) -> Option<&Port> {
        self.ports.get(id)
    }

    pub fn get_port_by_name(&self, name: &str) -> Option<&Port> {
        self.port_names.get(name).and_then(|id| self.ports.get(id))
    }

    /// Fresh copies of all cells.
    pub fn get_all_cells(&self) -> Vec<Cell> {
        self.cells.values().cloned().collect()
    }

    /// Fresh copies of all nets.
    pub fn get_all_nets(&self) -> Vec<Net> {
        self.nets.values().cloned().collect()
    }

    /// Fresh copies of all pins.
    pub fn get_all_pins(&self) -> Vec<Pin> {
        self.pins.values().cloned().collect()
    }

    /// Fresh copies of all ports.
    pub fn get_all_ports(&self) -> Vec<Port> {
        self.ports.values().cloned().collect()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Cross-reference validation, deferred until the caller decides the
    /// aggregate is complete.
    ///
    /// Checks that every pin's net, every cell's pins, every net's pins
    /// and every port's net resolve to inserted entities. Returns
    /// human-readable violation strings (sorted for determinism); an
    /// empty list means the aggregate is valid. Never panics or errors:
    /// "load with warnings" workflows decide how to surface problems.
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (id, pin) in &self.pins {
            if let Some(net) = pin.net() {
                if !self.nets.contains_key(net) {
                    violations.push(format!(
                        "pin '{id}' references missing net '{net}'"
                    ));
                }
            }
        }

        for (id, cell) in &self.cells {
            for pin in cell.pins() {
                if !self.pins.contains_key(pin) {
                    violations.push(format!(
                        "cell '{id}' references missing pin '{pin}'"
                    ));
                }
            }
        }

        for (id, net) in &self.nets {
            for pin in net.pins() {
                if !self.pins.contains_key(pin) {
                    violations.push(format!(
                        "net '{id}' references missing pin '{pin}'"
                    ));
                }
            }
        }

        for (id, port) in &self.ports {
            if let Some(net) = port.net() {
                if !self.nets.contains_key(net) {
                    violations.push(format!(
                        "port '{id}' references missing net '{net}'"
                    ));
                }
            }
        }

        violations.sort();
        violations
    }
}
