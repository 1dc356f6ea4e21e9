//! Shared test fixtures.
//!
//! Only compiled for tests. Provides an in-memory SQLite store, a small
//! canonical snapshot, a pre-built state, and a recording fake that stands in
//! for the real store when tests care about the write stream rather than
//! persistence.

#![allow(clippy::unwrap_used)]

use crate::errors::{Error, Result};
use crate::model::{Building, Floor, Role, Room, RoomType, User};
use crate::state::DormState;
use crate::store::{
    BillRow, BuildingRow, FloorRow, ResidentRow, RoomRow, Snapshot, SqlStore, Store, StoreOp,
    UserRow,
};
use sea_orm::DbErr;
use std::sync::Mutex;

/// A fresh store backed by an in-memory SQLite database.
pub async fn memory_store() -> Result<SqlStore> {
    SqlStore::connect("sqlite::memory:").await
}

/// A small but fully-populated snapshot: one building with two floors, three
/// rooms, two residents and two bills for 2024-01, plus the default admin.
pub fn sample_snapshot() -> Snapshot {
    Snapshot {
        buildings: vec![BuildingRow {
            id: "b1".to_string(),
            name: "North Hall".to_string(),
        }],
        floors: vec![
            FloorRow {
                id: "f1".to_string(),
                building_id: "b1".to_string(),
                number: 1,
                name: None,
            },
            FloorRow {
                id: "f2".to_string(),
                building_id: "b1".to_string(),
                number: 2,
                name: Some("Upper".to_string()),
            },
        ],
        rooms: vec![
            RoomRow {
                id: "r1".to_string(),
                floor_id: "f1".to_string(),
                number: "101".to_string(),
                room_type: RoomType::Single,
            },
            RoomRow {
                id: "r2".to_string(),
                floor_id: "f1".to_string(),
                number: "102".to_string(),
                room_type: RoomType::Double,
            },
            RoomRow {
                id: "r3".to_string(),
                floor_id: "f2".to_string(),
                number: "201".to_string(),
                room_type: RoomType::Double,
            },
        ],
        residents: vec![
            ResidentRow {
                id: "res-1".to_string(),
                room_id: "r1".to_string(),
                name: "Alice".to_string(),
                room_number: Some("101".to_string()),
            },
            ResidentRow {
                id: "res-2".to_string(),
                room_id: "r3".to_string(),
                name: "Bob".to_string(),
                room_number: Some("201".to_string()),
            },
        ],
        bills: vec![
            BillRow {
                id: "r1-2024-01".to_string(),
                room_id: "r1".to_string(),
                room_number: Some("101".to_string()),
                month: Some("2024-01".to_string()),
                water_units: 10.0,
                water_price: 180,
                electricity_units: 3.0,
                electricity_price: 21,
            },
            BillRow {
                id: "r3-2024-01".to_string(),
                room_id: "r3".to_string(),
                room_number: Some("201".to_string()),
                month: Some("2024-01".to_string()),
                water_units: 4.0,
                water_price: 72,
                electricity_units: 8.0,
                electricity_price: 56,
            },
        ],
        users: vec![UserRow {
            id: "user-1".to_string(),
            username: "popa".to_string(),
            password: "popa".to_string(),
            role: Role::Admin,
            name: "Administrator".to_string(),
        }],
    }
}

/// A state with one building "b7" holding a single floor with one SINGLE and
/// one DOUBLE room, both empty. Handy for exercising mutation commands.
pub fn state_with_rooms() -> DormState {
    DormState {
        buildings: vec![Building {
            id: "b7".to_string(),
            name: "Building 7".to_string(),
            floors: vec![Floor {
                id: "b7-f1".to_string(),
                number: 1,
                name: None,
                rooms: vec![
                    Room::new("r-single", "101", RoomType::Single),
                    Room::new("r-double", "102", RoomType::Double),
                ],
            }],
        }],
        users: vec![User {
            id: "user-1".to_string(),
            username: "popa".to_string(),
            password: "popa".to_string(),
            role: Role::Admin,
            name: "Administrator".to_string(),
        }],
    }
}

/// An in-memory store double that records every applied operation.
///
/// `snapshot: None` simulates an unreachable backend on fetch; `fail_writes`
/// makes every `apply` fail, for exercising the best-effort write path.
#[derive(Debug, Default)]
pub struct FakeStore {
    snapshot: Mutex<Option<Snapshot>>,
    fail_writes: bool,
    ops: Mutex<Vec<StoreOp>>,
}

impl FakeStore {
    /// A reachable store that will serve the given snapshot.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            fail_writes: false,
            ops: Mutex::new(Vec::new()),
        }
    }

    /// A store whose every fetch fails.
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// A reachable store whose every write fails.
    pub fn failing_writes(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            fail_writes: true,
            ops: Mutex::new(Vec::new()),
        }
    }

    /// Every operation applied so far, in order.
    pub fn recorded_ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }
}

impl Store for FakeStore {
    async fn fetch_all(&self) -> Result<Snapshot> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Database(DbErr::Custom("store unreachable".to_string())))
    }

    async fn apply(&self, op: StoreOp) -> Result<()> {
        if self.fail_writes {
            return Err(Error::Database(DbErr::Custom(
                "write rejected".to_string(),
            )));
        }
        self.ops.lock().unwrap().push(op);
        Ok(())
    }
}
