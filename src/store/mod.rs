//! External store contract.
//!
//! The core depends on exactly two collaborator operations: a full fetch of
//! all row collections ([`Store::fetch_all`]) and a single-record
//! upsert-or-delete ([`Store::apply`]). Everything else about persistence is
//! a black box behind this seam, which is what lets the tests substitute a
//! recording fake for the real database.

/// SQLite-backed implementation of the store contract
pub mod db;
/// Loosely-typed row shapes and their boundary coercion
pub mod rows;

pub use db::SqlStore;
pub use rows::{BillRow, BuildingRow, FloorRow, ResidentRow, RoomRow, UserRow};

use crate::errors::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// The six backing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// Login accounts
    Users,
    /// Building rows
    Buildings,
    /// Floor rows
    Floors,
    /// Room rows
    Rooms,
    /// Resident rows
    Residents,
    /// Bill rows
    Bills,
}

impl Table {
    /// Backend table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Buildings => "Buildings",
            Self::Floors => "Floors",
            Self::Rooms => "Rooms",
            Self::Residents => "Residents",
            Self::Bills => "Bills",
        }
    }
}

/// A full record destined for one of the six tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A building row
    Building(BuildingRow),
    /// A floor row
    Floor(FloorRow),
    /// A room row
    Room(RoomRow),
    /// A resident row
    Resident(ResidentRow),
    /// A bill row
    Bill(BillRow),
    /// A user row
    User(UserRow),
}

impl Record {
    /// The table this record belongs to.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Building(_) => Table::Buildings,
            Self::Floor(_) => Table::Floors,
            Self::Room(_) => Table::Rooms,
            Self::Resident(_) => Table::Residents,
            Self::Bill(_) => Table::Bills,
            Self::User(_) => Table::Users,
        }
    }

    /// Primary key of the record.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Building(r) => &r.id,
            Self::Floor(r) => &r.id,
            Self::Room(r) => &r.id,
            Self::Resident(r) => &r.id,
            Self::Bill(r) => &r.id,
            Self::User(r) => &r.id,
        }
    }
}

/// One write against the store: upsert by primary key, or delete by id.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    /// Insert the record, or overwrite the existing record with the same id
    Upsert(Record),
    /// Remove the record with the given id, if present
    Delete {
        /// Table to delete from
        table: Table,
        /// Primary key of the row to remove
        id: String,
    },
}

impl StoreOp {
    /// The table this operation targets.
    #[must_use]
    pub const fn table(&self) -> Table {
        match self {
            Self::Upsert(record) => record.table(),
            Self::Delete { table, .. } => *table,
        }
    }

    /// Primary key this operation targets.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Upsert(record) => record.id(),
            Self::Delete { id, .. } => id,
        }
    }
}

/// Everything a full fetch returns: one flat row collection per table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// All building rows
    #[serde(rename = "Buildings")]
    pub buildings: Vec<BuildingRow>,
    /// All floor rows
    #[serde(rename = "Floors")]
    pub floors: Vec<FloorRow>,
    /// All room rows
    #[serde(rename = "Rooms")]
    pub rooms: Vec<RoomRow>,
    /// All resident rows
    #[serde(rename = "Residents")]
    pub residents: Vec<ResidentRow>,
    /// All bill rows
    #[serde(rename = "Bills")]
    pub bills: Vec<BillRow>,
    /// All user rows
    #[serde(rename = "Users")]
    pub users: Vec<UserRow>,
}

impl Snapshot {
    /// Parses a JSON dump of the backend tables.
    ///
    /// Tables may be absent entirely; within a table, rows that fail their
    /// required-field checks are skipped with a warning rather than failing
    /// the whole import.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(Self {
            buildings: lenient_rows(&value, Table::Buildings),
            floors: lenient_rows(&value, Table::Floors),
            rooms: lenient_rows(&value, Table::Rooms),
            residents: lenient_rows(&value, Table::Residents),
            bills: lenient_rows(&value, Table::Bills),
            users: lenient_rows(&value, Table::Users),
        })
    }

    /// Total number of rows across all tables.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.buildings.len()
            + self.floors.len()
            + self.rooms.len()
            + self.residents.len()
            + self.bills.len()
            + self.users.len()
    }

    /// Flattens the snapshot into one upsert per row, parents before children.
    #[must_use]
    pub fn into_ops(self) -> Vec<StoreOp> {
        let mut ops = Vec::with_capacity(self.row_count());
        ops.extend(self.users.into_iter().map(|r| StoreOp::Upsert(Record::User(r))));
        ops.extend(
            self.buildings
                .into_iter()
                .map(|r| StoreOp::Upsert(Record::Building(r))),
        );
        ops.extend(self.floors.into_iter().map(|r| StoreOp::Upsert(Record::Floor(r))));
        ops.extend(self.rooms.into_iter().map(|r| StoreOp::Upsert(Record::Room(r))));
        ops.extend(
            self.residents
                .into_iter()
                .map(|r| StoreOp::Upsert(Record::Resident(r))),
        );
        ops.extend(self.bills.into_iter().map(|r| StoreOp::Upsert(Record::Bill(r))));
        ops
    }
}

/// Decodes one table's rows from a JSON dump, skipping malformed rows.
fn lenient_rows<T: DeserializeOwned>(dump: &serde_json::Value, table: Table) -> Vec<T> {
    let Some(values) = dump.get(table.as_str()).and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    values
        .iter()
        .filter_map(|value| match serde_json::from_value(value.clone()) {
            Ok(row) => Some(row),
            Err(error) => {
                warn!(table = table.as_str(), %error, "skipping malformed row");
                None
            }
        })
        .collect()
}

/// The narrow persistence contract the core calls through.
///
/// `fetch_all` either returns every row or fails as a whole; `apply` is a
/// best-effort single write with upsert (last-write-wins) semantics for
/// [`StoreOp::Upsert`].
pub trait Store: Send + Sync {
    /// Fetches all rows from every table.
    fn fetch_all(&self) -> impl Future<Output = Result<Snapshot>> + Send;

    /// Applies a single upsert or delete.
    fn apply(&self, op: StoreOp) -> impl Future<Output = Result<()>> + Send;
}
