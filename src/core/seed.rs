//! Deterministic fallback and seed tree.
//!
//! Produces the fixed 2-buildings × 4-floors × 4-rooms structure used in two
//! places: as the offline fallback when the initial fetch fails outright, and
//! as the payload for seeding an empty backend. It is parameterized by
//! nothing so the offline view is always the same.

use crate::model::{Building, Floor, Room, RoomType, User};
use crate::store::{BuildingRow, FloorRow, Record, RoomRow, StoreOp, UserRow};

/// Builds the fixed mock tree: 2 buildings, floors 4 down to 1, 4 rooms per
/// floor numbered `{building}{floor}{seq:02}`, rooms 1-2 single and 3-4
/// double, no residents and no bills.
#[must_use]
pub fn initial_buildings() -> Vec<Building> {
    (1..=2)
        .map(|b| {
            let floors = (1..=4)
                .rev()
                .map(|f| {
                    let rooms = (1..=4)
                        .map(|r| {
                            let room_type = if r > 2 {
                                RoomType::Double
                            } else {
                                RoomType::Single
                            };
                            Room::new(
                                format!("b{b}-f{f}-r{r}"),
                                format!("{b}{f}{r:02}"),
                                room_type,
                            )
                        })
                        .collect();
                    Floor {
                        id: format!("b{b}-f{f}"),
                        number: f,
                        name: None,
                        rooms,
                    }
                })
                .collect();
            Building {
                id: format!("b{b}"),
                name: format!("Building {b}"),
                floors,
            }
        })
        .collect()
}

/// Flattens a tree plus a user list into sequenced seed upserts,
/// parents before children so the backend never sees a dangling reference.
#[must_use]
pub fn seed_ops(buildings: &[Building], users: &[User]) -> Vec<StoreOp> {
    let mut ops = Vec::new();

    for user in users {
        ops.push(StoreOp::Upsert(Record::User(UserRow {
            id: user.id.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
            role: user.role,
            name: user.name.clone(),
        })));
    }

    for building in buildings {
        ops.push(StoreOp::Upsert(Record::Building(BuildingRow {
            id: building.id.clone(),
            name: building.name.clone(),
        })));
        for floor in &building.floors {
            ops.push(StoreOp::Upsert(Record::Floor(FloorRow {
                id: floor.id.clone(),
                building_id: building.id.clone(),
                number: floor.number,
                name: floor.name.clone(),
            })));
            for room in &floor.rooms {
                ops.push(StoreOp::Upsert(Record::Room(RoomRow {
                    id: room.id.clone(),
                    floor_id: floor.id.clone(),
                    number: room.number.clone(),
                    room_type: room.room_type,
                })));
            }
        }
    }

    ops
}
