//! Tree Builder - normalizes flat store rows into the nested domain tree.
//!
//! Takes the five flat row collections of a [`Snapshot`] and produces the
//! `Building → Floor → Room → {residents, bills-by-month}` structure. The
//! function is pure: building the same snapshot twice yields an identical
//! tree. Identifier coercion already happened at the row boundary, so all
//! foreign-key matching here is plain string equality.
//!
//! Ordering: floors descend by storey number (top floor first); rooms within
//! a floor ascend lexicographically by display number. Child rows whose
//! parent is missing are dropped without comment - orphans are an expected
//! artifact of non-cascading deletes on the backend.

use crate::model::{BillData, Building, Floor, Resident, Room};
use crate::store::Snapshot;
use std::collections::BTreeMap;

/// Builds the nested building tree from a fetched snapshot.
///
/// An empty `buildings` collection yields an empty tree; that is a valid
/// "nothing provisioned yet" state, distinct from a failed fetch (which is
/// handled by the caller with the fallback generator, never here).
#[must_use]
pub fn build_buildings(snapshot: &Snapshot) -> Vec<Building> {
    snapshot
        .buildings
        .iter()
        .map(|building| {
            let mut floor_rows: Vec<_> = snapshot
                .floors
                .iter()
                .filter(|f| f.building_id == building.id)
                .collect();
            floor_rows.sort_by(|a, b| b.number.cmp(&a.number));

            let floors = floor_rows
                .into_iter()
                .map(|floor| {
                    let mut room_rows: Vec<_> = snapshot
                        .rooms
                        .iter()
                        .filter(|r| r.floor_id == floor.id)
                        .collect();
                    room_rows.sort_by(|a, b| a.number.cmp(&b.number));

                    let rooms = room_rows
                        .into_iter()
                        .map(|room| Room {
                            id: room.id.clone(),
                            number: room.number.clone(),
                            room_type: room.room_type,
                            residents: residents_of(snapshot, &room.id),
                            bills: bills_of(snapshot, &room.id),
                        })
                        .collect();

                    Floor {
                        id: floor.id.clone(),
                        number: floor.number,
                        name: floor.name.clone(),
                        rooms,
                    }
                })
                .collect();

            Building {
                id: building.id.clone(),
                name: building.name.clone(),
                floors,
            }
        })
        .collect()
}

fn residents_of(snapshot: &Snapshot, room_id: &str) -> Vec<Resident> {
    snapshot
        .residents
        .iter()
        .filter(|r| r.room_id == room_id)
        .map(|r| Resident {
            id: r.id.clone(),
            name: r.name.clone(),
        })
        .collect()
}

/// Folds a room's bill rows into a month-keyed map.
///
/// Rows without a month key are dropped; for duplicate months the last
/// occurrence wins, matching the upsert semantics of the backing store.
fn bills_of(snapshot: &Snapshot, room_id: &str) -> BTreeMap<String, BillData> {
    let mut bills = BTreeMap::new();
    for bill in snapshot.bills.iter().filter(|b| b.room_id == room_id) {
        let Some(month) = bill.month.as_deref().filter(|m| !m.is_empty()) else {
            continue;
        };
        bills.insert(
            month.to_string(),
            BillData {
                water: bill.water_price,
                electricity: bill.electricity_price,
                water_units: bill.water_units,
                electricity_units: bill.electricity_units,
            },
        );
    }
    bills
}
