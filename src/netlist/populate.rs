// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Aggregate population from parsed CDL artifacts
//!
//! The upstream ingestion step between the text pipeline and the graph
//! layer: one cell per instance, one pin per connection (id
//! `instance/port`), one net per unique normalized net name, and
//! optionally top-level ports taken from a named subcircuit definition.
//! Pin directions come from a pin-direction map (see
//! [`crate::cdl::pindir`]); unmapped pins default to INOUT.

use std::collections::{HashMap, HashSet};

use crate::cdl::parser::CdlDesign;
use crate::cdl::pindir::direction_for;

use super::aggregate::{Netlist, NetlistError};
use super::{Cell, CellId, Direction, Net, NetId, Pin, PinId, Port, PortId};

/// Build a netlist aggregate from parsed CDL artifacts.
///
/// `sequential_types` lists cell types to flag as sequential
/// (case-insensitive). `top`, when given and known, contributes
/// top-level ports from that subcircuit definition.
pub fn populate_netlist(
    design: &CdlDesign,
    pin_directions: &HashMap<String, Direction>,
    sequential_types: &HashSet<String>,
    top: Option<&str>,
) -> Result<Netlist, NetlistError> {
    let sequential: HashSet<String> = sequential_types
        .iter()
        .map(|t| t.to_ascii_uppercase())
        .collect();

    let mut netlist = Netlist::new();
    let mut net_pins: HashMap<String, Vec<PinId>> = HashMap::new();

    for inst in design.instances.values() {
        let mut pins = Vec::with_capacity(inst.connections().len());
        for (port, net_name) in inst.connections() {
            let pin_id = PinId::new(format!("{}/{}", inst.name(), port));
            let normalized = normalized_net_name(design, net_name);
            net_pins
                .entry(normalized.clone())
                .or_default()
                .push(pin_id.clone());
            netlist.add_pin(Pin::new(
                pin_id.clone(),
                port.clone(),
                direction_for(pin_directions, port),
                Some(NetId::new(normalized)),
            ))?;
            pins.push(pin_id);
        }

        let is_sequential = sequential.contains(&inst.cell_type().to_ascii_uppercase());
        netlist.add_cell(Cell::new(
            CellId::new(inst.name()),
            inst.name(),
            inst.cell_type(),
            pins,
            is_sequential,
        ))?;
    }

    let mut names: Vec<&String> = net_pins.keys().collect();
    names.sort();
    for name in names {
        netlist.add_net(Net::new(
            NetId::new(name.clone()),
            name.clone(),
            net_pins[name].clone(),
        ))?;
    }

    if let Some(top) = top {
        if let Some(def) = design.definitions.get(top) {
            for port in def.ports() {
                let normalized = normalized_net_name(design, port);
                let net = net_pins
                    .contains_key(&normalized)
                    .then(|| NetId::new(normalized));
                netlist.add_port(Port::new(
                    PortId::new(port.clone()),
                    port.clone(),
                    direction_for(pin_directions, port),
                    net,
                ))?;
            }
        } else {
            log::warn!("top subcircuit '{top}' not found; no ports created");
        }
    }

    Ok(netlist)
}

/// Normalized name of a net as the parser recorded it, falling back to
/// the raw name for nets the parser never saw (e.g. a port with no
/// instance connection).
fn normalized_net_name(design: &CdlDesign, name: &str) -> String {
    design
        .nets
        .get(name)
        .map(|info| info.normalized_name.clone())
        .unwrap_or_else(|| name.to_string())
}
