// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! Netlist domain model
//!
//! Cells, pins, nets and ports with distinct string-backed id types.
//! The ids share a representation but are deliberately not
//! interchangeable, so a pin id can never be used in a net lookup.
//! Entities are frozen value objects; the aggregate in
//! [`aggregate`](crate::netlist::aggregate) owns them after insertion.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a cell instance.
    CellId
);
string_id!(
    /// Identifier of a net.
    NetId
);
string_id!(
    /// Identifier of a pin.
    PinId
);
string_id!(
    /// Identifier of a top-level port.
    PortId
);

/// Signal direction of a pin or port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
    Inout,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "INPUT"),
            Direction::Output => write!(f, "OUTPUT"),
            Direction::Inout => write!(f, "INOUT"),
        }
    }
}

/// A placed cell instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    id: CellId,
    name: String,
    cell_type: String,
    pins: Vec<PinId>,
    is_sequential: bool,
}

impl Cell {
    pub fn new(
        id: CellId,
        name: impl Into<String>,
        cell_type: impl Into<String>,
        pins: Vec<PinId>,
        is_sequential: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cell_type: cell_type.into(),
            pins,
            is_sequential,
        }
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_type(&self) -> &str {
        &self.cell_type
    }

    /// Ordered pin ids.
    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }

    /// Whether this cell is a clocked storage element (flip-flop/latch).
    pub fn is_sequential(&self) -> bool {
        self.is_sequential
    }
}

/// A pin of a cell. `net` is `None` for floating pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    id: PinId,
    name: String,
    direction: Direction,
    net: Option<NetId>,
}

impl Pin {
    pub fn new(
        id: PinId,
        name: impl Into<String>,
        direction: Direction,
        net: Option<NetId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
            net,
        }
    }

    pub fn id(&self) -> &PinId {
        &self.id
    }

    /// Local pin name, e.g. "A". Recurs across cells.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn net(&self) -> Option<&NetId> {
        self.net.as_ref()
    }
}

/// A named wire connecting pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    id: NetId,
    name: String,
    pins: Vec<PinId>,
}

impl Net {
    pub fn new(id: NetId, name: impl Into<String>, pins: Vec<PinId>) -> Self {
        Self {
            id,
            name: name.into(),
            pins,
        }
    }

    pub fn id(&self) -> &NetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pins(&self) -> &[PinId] {
        &self.pins
    }
}

/// A top-level I/O port. `net` is `None` for unconnected ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    id: PortId,
    name: String,
    direction: Direction,
    net: Option<NetId>,
}

impl Port {
    pub fn new(
        id: PortId,
        name: impl Into<String>,
        direction: Direction,
        net: Option<NetId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
            net,
        }
    }

    pub fn id(&self) -> &PortId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn net(&self) -> Option<&NetId> {
        self.net.as_ref()
    }
}

pub mod aggregate;
pub mod populate;
