// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

use csv::Writer;
use serde::Serialize;
use std::fs::File;

use crate::netlist::aggregate::Netlist;
use crate::netlist::{Cell, Net, Pin};

#[derive(Debug, Serialize)]
pub struct CellCsvRecord {
    #[serde(rename = "Cell")]
    pub cell_name: String,
    #[serde(rename = "Type")]
    pub cell_type: String,
    #[serde(rename = "Pins")]
    pub pins: usize,
    #[serde(rename = "Sequential")]
    pub sequential: bool,
    #[serde(rename = "Pinlist")]
    pub pinlist: String,
}

#[derive(Debug, Serialize)]
pub struct NetCsvRecord {
    #[serde(rename = "Net")]
    pub net_name: String,
    #[serde(rename = "Pins")]
    pub pins: usize,
}

/// Format pins into a comma-separated string of "DIRECTION:NAME" format
fn format_pinlist(pins: &[Pin]) -> String {
    pins.iter()
        .map(|pin| format!("{}:{}", pin.direction(), pin.name()))
        .collect::<Vec<String>>()
        .join(",")
}

/// Convert a Cell to a CellCsvRecord
fn cell_to_csv_record(netlist: &Netlist, cell: &Cell) -> CellCsvRecord {
    let pins: Vec<Pin> = cell
        .pins()
        .iter()
        .filter_map(|id| netlist.get_pin(id).cloned())
        .collect();
    CellCsvRecord {
        cell_name: cell.name().to_string(),
        cell_type: cell.cell_type().to_string(),
        pins: pins.len(),
        sequential: cell.is_sequential(),
        pinlist: format_pinlist(&pins),
    }
}

/// Convert a Net to a NetCsvRecord
fn net_to_csv_record(net: &Net) -> NetCsvRecord {
    NetCsvRecord {
        net_name: net.name().to_string(),
        pins: net.pins().len(),
    }
}

/// Export netlist cells to CSV file, sorted by cell name
pub fn export_cells_to_csv(
    netlist: &Netlist,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    let mut cells = netlist.get_all_cells();
    cells.sort_by(|a, b| a.name().cmp(b.name()));
    for cell in &cells {
        let record = cell_to_csv_record(netlist, cell);
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export netlist nets to CSV file, sorted by net name
pub fn export_nets_to_csv(
    netlist: &Netlist,
    file_path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    let mut nets = netlist.get_all_nets();
    nets.sort_by(|a, b| a.name().cmp(b.name()));
    for net in &nets {
        let record = net_to_csv_record(net);
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
