//! Strict domain model - the nested building tree.
//!
//! These types are the in-memory source of truth for a session. They are
//! produced from loosely-typed store rows by [`crate::core::tree`] and mutated
//! only through the commands on [`crate::state::DormState`]. All identifiers
//! are opaque strings, canonicalized at the ingest boundary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Room type, which alone determines capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    /// One resident at most
    Single,
    /// Two residents at most
    Double,
}

impl RoomType {
    /// Maximum number of residents a room of this type may hold.
    #[must_use]
    pub const fn capacity(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }

    /// Stable wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Double => "DOUBLE",
        }
    }

    /// Parses the wire representation, `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SINGLE" => Some(Self::Single),
            "DOUBLE" => Some(Self::Double),
            _ => None,
        }
    }
}

/// The two metered utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Utility {
    /// Tap water, metered in units
    Water,
    /// Electricity, metered in units
    Electricity,
}

impl Utility {
    /// Human-readable label used in alerts and reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
        }
    }
}

/// Role attached to a user account, selecting their default workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full management access
    Admin,
    /// Water meter reading entry
    Water,
    /// Electricity meter reading entry
    Electric,
}

impl Role {
    /// Stable wire/database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Water => "WATER",
            Self::Electric => "ELECTRIC",
        }
    }

    /// Parses the wire representation, `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ADMIN" => Some(Self::Admin),
            "WATER" => Some(Self::Water),
            "ELECTRIC" => Some(Self::Electric),
            _ => None,
        }
    }
}

/// A login account held in the in-memory user list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier
    pub id: String,
    /// Login name
    pub username: String,
    /// Plaintext password (credential handling is out of scope here)
    pub password: String,
    /// Access role
    pub role: Role,
    /// Display name
    pub name: String,
}

/// A person assigned to exactly one room at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    /// Opaque identifier
    pub id: String,
    /// Display name
    pub name: String,
}

/// Billing figures for one room and one month.
///
/// `water`/`electricity` are currency amounts already rounded to whole units
/// at write time; the `*_units` fields are the metered consumption counts.
/// The amount/units relationship is only enforced on the units-driven update
/// path, so a manually overridden amount may disagree with its units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BillData {
    /// Water charge for the month
    pub water: i64,
    /// Electricity charge for the month
    pub electricity: i64,
    /// Metered water consumption
    pub water_units: f64,
    /// Metered electricity consumption
    pub electricity_units: f64,
}

/// A rentable room holding residents and a month-keyed bill history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Opaque identifier
    pub id: String,
    /// Display number, free text (often encodes building/floor/sequence)
    pub number: String,
    /// Type, fixing the capacity
    pub room_type: RoomType,
    /// Current occupants, at most `room_type.capacity()`
    pub residents: Vec<Resident>,
    /// Bills keyed by `YYYY-MM` month key, one entry per month at most
    pub bills: BTreeMap<String, BillData>,
}

impl Room {
    /// Creates an empty room with no residents or bills.
    #[must_use]
    pub fn new(id: impl Into<String>, number: impl Into<String>, room_type: RoomType) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            room_type,
            residents: Vec::new(),
            bills: BTreeMap::new(),
        }
    }

    /// Maximum occupancy implied by the room's type.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.room_type.capacity()
    }

    /// Whether at least one resident lives here.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.residents.is_empty()
    }

    /// The bill for the given month, or an all-zero bill when none exists.
    #[must_use]
    pub fn bill_for(&self, month: &str) -> BillData {
        self.bills.get(month).copied().unwrap_or_default()
    }
}

/// One storey of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// Opaque identifier
    pub id: String,
    /// Storey number, used for ordering and the default display name
    pub number: i32,
    /// Optional display-name override
    pub name: Option<String>,
    /// Rooms sorted ascending by display number
    pub rooms: Vec<Room>,
}

impl Floor {
    /// The explicit name if set, otherwise a label generated from the number.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Floor {}", self.number))
    }
}

/// The root of one building's subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Opaque identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Floors sorted descending by number (top floor first)
    pub floors: Vec<Floor>,
}

impl Building {
    /// Looks up a room anywhere in this building.
    #[must_use]
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.floors
            .iter()
            .flat_map(|f| f.rooms.iter())
            .find(|r| r.id == room_id)
    }

    /// Total number of rooms across all floors.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.floors.iter().map(|f| f.rooms.len()).sum()
    }
}
