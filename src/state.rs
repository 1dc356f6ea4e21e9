//! Application state object and its mutation commands.
//!
//! [`DormState`] owns the building tree and the user list for one session.
//! Every mutation goes through a named command; there is no other way to
//! touch the tree. Commands validate first and mutate only once the change is
//! known to be legal, so a rejected command always leaves the state exactly
//! as it was. Each successful command returns the store operation(s) that
//! mirror the local change, which the service layer forwards to the backend
//! without awaiting.

use crate::core::{auth, billing, tree};
use crate::errors::{Error, Result};
use crate::model::{BillData, Building, Floor, Resident, Role, Room, RoomType, User, Utility};
use crate::store::{
    BuildingRow, FloorRow, Record, ResidentRow, RoomRow, Snapshot, StoreOp, Table, UserRow,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local discriminator so two ids minted in the same millisecond
/// still differ.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn fresh_suffix() -> String {
    let count = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{count}", chrono::Utc::now().timestamp_millis())
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// In-memory source of truth for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DormState {
    /// The building tree, floors top-first, rooms by ascending number
    pub buildings: Vec<Building>,
    /// Login accounts
    pub users: Vec<User>,
}

impl DormState {
    /// Builds session state from a fetched snapshot.
    ///
    /// When the store holds no user rows the bootstrap accounts stand in, so
    /// a fresh deployment is still signable-into.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot, bootstrap_users: Vec<User>) -> Self {
        let users = if snapshot.users.is_empty() {
            bootstrap_users
        } else {
            snapshot
                .users
                .iter()
                .map(|row| User {
                    id: row.id.clone(),
                    username: row.username.clone(),
                    password: row.password.clone(),
                    role: row.role,
                    name: row.name.clone(),
                })
                .collect()
        };

        Self {
            buildings: tree::build_buildings(snapshot),
            users,
        }
    }

    /// Looks up a building by id.
    #[must_use]
    pub fn building(&self, building_id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == building_id)
    }

    /// Checks a username/password pair against the in-memory user list.
    #[must_use]
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        auth::authenticate(&self.users, username, password)
    }

    // ---- internal lookups ------------------------------------------------

    fn building_index(&self, building_id: &str) -> Result<usize> {
        self.buildings
            .iter()
            .position(|b| b.id == building_id)
            .ok_or_else(|| Error::BuildingNotFound {
                id: building_id.to_string(),
            })
    }

    fn locate_floor(&self, floor_id: &str) -> Result<(usize, usize)> {
        self.buildings
            .iter()
            .enumerate()
            .find_map(|(bi, b)| {
                b.floors
                    .iter()
                    .position(|f| f.id == floor_id)
                    .map(|fi| (bi, fi))
            })
            .ok_or_else(|| Error::FloorNotFound {
                id: floor_id.to_string(),
            })
    }

    fn locate_room(&self, room_id: &str) -> Result<(usize, usize, usize)> {
        self.buildings
            .iter()
            .enumerate()
            .find_map(|(bi, b)| {
                b.floors.iter().enumerate().find_map(|(fi, f)| {
                    f.rooms
                        .iter()
                        .position(|r| r.id == room_id)
                        .map(|ri| (bi, fi, ri))
                })
            })
            .ok_or_else(|| Error::RoomNotFound {
                id: room_id.to_string(),
            })
    }

    fn locate_resident(&self, resident_id: &str) -> Result<(usize, usize, usize, usize)> {
        self.buildings
            .iter()
            .enumerate()
            .find_map(|(bi, b)| {
                b.floors.iter().enumerate().find_map(|(fi, f)| {
                    f.rooms.iter().enumerate().find_map(|(ri, r)| {
                        r.residents
                            .iter()
                            .position(|res| res.id == resident_id)
                            .map(|resi| (bi, fi, ri, resi))
                    })
                })
            })
            .ok_or_else(|| Error::ResidentNotFound {
                id: resident_id.to_string(),
            })
    }

    // ---- building / floor / room structure -------------------------------

    /// Adds a new building with one default floor of four rooms.
    ///
    /// The id continues the `b{n}` sequence from the highest existing one.
    pub fn add_building(&mut self) -> Vec<StoreOp> {
        let max_id = self
            .buildings
            .iter()
            .filter_map(|b| digits(&b.id).parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        let next = max_id + 1;

        let floor_id = format!("b{next}-f1");
        let rooms: Vec<Room> = (1..=4)
            .map(|i| {
                let room_type = if i <= 2 {
                    RoomType::Single
                } else {
                    RoomType::Double
                };
                Room::new(format!("b{next}-f1-r{i}"), format!("{next}1{i:02}"), room_type)
            })
            .collect();

        let mut ops = vec![
            StoreOp::Upsert(Record::Building(BuildingRow {
                id: format!("b{next}"),
                name: format!("Building {next}"),
            })),
            StoreOp::Upsert(Record::Floor(FloorRow {
                id: floor_id.clone(),
                building_id: format!("b{next}"),
                number: 1,
                name: None,
            })),
        ];
        for room in &rooms {
            ops.push(StoreOp::Upsert(Record::Room(RoomRow {
                id: room.id.clone(),
                floor_id: floor_id.clone(),
                number: room.number.clone(),
                room_type: room.room_type,
            })));
        }

        self.buildings.push(Building {
            id: format!("b{next}"),
            name: format!("Building {next}"),
            floors: vec![Floor {
                id: floor_id,
                number: 1,
                name: None,
                rooms,
            }],
        });

        ops
    }

    /// Renames a building.
    pub fn rename_building(&mut self, building_id: &str, name: &str) -> Result<StoreOp> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Config {
                message: "Building name cannot be empty".to_string(),
            });
        }

        let index = self.building_index(building_id)?;
        self.buildings[index].name = name.to_string();
        Ok(StoreOp::Upsert(Record::Building(BuildingRow {
            id: building_id.to_string(),
            name: name.to_string(),
        })))
    }

    /// Deletes a building, pruning its whole subtree locally.
    ///
    /// Only the building's own row is deleted remotely; descendant rows are
    /// left for the storage schema owner to cascade or orphan.
    pub fn delete_building(&mut self, building_id: &str) -> Result<StoreOp> {
        let index = self.building_index(building_id)?;
        self.buildings.remove(index);
        Ok(StoreOp::Delete {
            table: Table::Buildings,
            id: building_id.to_string(),
        })
    }

    /// Adds the next floor on top of a building, with four default rooms.
    pub fn add_floor(&mut self, building_id: &str) -> Result<Vec<StoreOp>> {
        let index = self.building_index(building_id)?;
        let building_num = digits(building_id);
        let next_number = self.buildings[index]
            .floors
            .iter()
            .map(|f| f.number)
            .max()
            .unwrap_or(0)
            + 1;

        let floor_id = format!("{building_id}-f{next_number}-{}", fresh_suffix());
        let rooms: Vec<Room> = (1..=4)
            .map(|i| {
                let room_type = if i <= 2 {
                    RoomType::Single
                } else {
                    RoomType::Double
                };
                Room::new(
                    format!("{building_id}-f{next_number}-r{i}-{}", fresh_suffix()),
                    format!("{building_num}{next_number}{i:02}"),
                    room_type,
                )
            })
            .collect();

        let mut ops = vec![StoreOp::Upsert(Record::Floor(FloorRow {
            id: floor_id.clone(),
            building_id: building_id.to_string(),
            number: next_number,
            name: None,
        }))];
        for room in &rooms {
            ops.push(StoreOp::Upsert(Record::Room(RoomRow {
                id: room.id.clone(),
                floor_id: floor_id.clone(),
                number: room.number.clone(),
                room_type: room.room_type,
            })));
        }

        // Floors are kept top-first, so the new highest floor goes in front.
        self.buildings[index].floors.insert(
            0,
            Floor {
                id: floor_id,
                number: next_number,
                name: None,
                rooms,
            },
        );

        Ok(ops)
    }

    /// Sets a floor's display-name override.
    pub fn rename_floor(&mut self, floor_id: &str, name: &str) -> Result<StoreOp> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Config {
                message: "Floor name cannot be empty".to_string(),
            });
        }

        let (bi, fi) = self.locate_floor(floor_id)?;
        let building_id = self.buildings[bi].id.clone();
        let floor = &mut self.buildings[bi].floors[fi];
        floor.name = Some(name.to_string());

        Ok(StoreOp::Upsert(Record::Floor(FloorRow {
            id: floor_id.to_string(),
            building_id,
            number: floor.number,
            name: Some(name.to_string()),
        })))
    }

    /// Deletes a floor, pruning its rooms locally.
    pub fn delete_floor(&mut self, floor_id: &str) -> Result<StoreOp> {
        let (bi, fi) = self.locate_floor(floor_id)?;
        self.buildings[bi].floors.remove(fi);
        Ok(StoreOp::Delete {
            table: Table::Floors,
            id: floor_id.to_string(),
        })
    }

    /// Appends a room to a floor, numbered by the usual
    /// `{building}{floor}{seq:02}` scheme.
    pub fn add_room(&mut self, floor_id: &str, room_type: RoomType) -> Result<StoreOp> {
        let (bi, fi) = self.locate_floor(floor_id)?;
        let building_num = digits(&self.buildings[bi].id);
        let floor = &mut self.buildings[bi].floors[fi];

        let seq = floor.rooms.len() + 1;
        let room = Room::new(
            format!("room-{}", fresh_suffix()),
            format!("{building_num}{}{seq:02}", floor.number),
            room_type,
        );

        let op = StoreOp::Upsert(Record::Room(RoomRow {
            id: room.id.clone(),
            floor_id: floor_id.to_string(),
            number: room.number.clone(),
            room_type,
        }));
        floor.rooms.push(room);
        Ok(op)
    }

    /// Deletes a room along with its residents and bill history locally.
    pub fn delete_room(&mut self, room_id: &str) -> Result<StoreOp> {
        let (bi, fi, ri) = self.locate_room(room_id)?;
        self.buildings[bi].floors[fi].rooms.remove(ri);
        Ok(StoreOp::Delete {
            table: Table::Rooms,
            id: room_id.to_string(),
        })
    }

    /// Updates a room's display number and type.
    ///
    /// Rejected when shrinking to SINGLE would strand a second resident.
    pub fn update_room(
        &mut self,
        room_id: &str,
        number: &str,
        room_type: RoomType,
    ) -> Result<StoreOp> {
        let (bi, fi, ri) = self.locate_room(room_id)?;
        let floor_id = self.buildings[bi].floors[fi].id.clone();
        let room = &mut self.buildings[bi].floors[fi].rooms[ri];

        if room.residents.len() > room_type.capacity() {
            return Err(Error::RoomTypeBlocked {
                room_number: room.number.clone(),
                occupants: room.residents.len(),
            });
        }

        room.number = number.to_string();
        room.room_type = room_type;
        Ok(StoreOp::Upsert(Record::Room(RoomRow {
            id: room_id.to_string(),
            floor_id,
            number: number.to_string(),
            room_type,
        })))
    }

    // ---- residents -------------------------------------------------------

    /// Adds a resident to a room, rejecting when the room is at capacity.
    pub fn add_resident(&mut self, room_id: &str, name: &str) -> Result<StoreOp> {
        let (bi, fi, ri) = self.locate_room(room_id)?;
        let room = &mut self.buildings[bi].floors[fi].rooms[ri];

        if room.residents.len() >= room.capacity() {
            return Err(Error::RoomFull {
                room_number: room.number.clone(),
                capacity: room.capacity(),
            });
        }

        let resident = Resident {
            id: format!("res-{}", fresh_suffix()),
            name: name.to_string(),
        };
        let op = StoreOp::Upsert(Record::Resident(ResidentRow {
            id: resident.id.clone(),
            room_id: room_id.to_string(),
            name: resident.name.clone(),
            room_number: Some(room.number.clone()),
        }));
        room.residents.push(resident);
        Ok(op)
    }

    /// Renames a resident wherever they currently live.
    pub fn rename_resident(&mut self, resident_id: &str, name: &str) -> Result<StoreOp> {
        let (bi, fi, ri, resi) = self.locate_resident(resident_id)?;
        let room = &mut self.buildings[bi].floors[fi].rooms[ri];
        room.residents[resi].name = name.to_string();

        Ok(StoreOp::Upsert(Record::Resident(ResidentRow {
            id: resident_id.to_string(),
            room_id: room.id.clone(),
            name: name.to_string(),
            room_number: Some(room.number.clone()),
        })))
    }

    /// Removes a resident from whichever room holds them.
    pub fn remove_resident(&mut self, resident_id: &str) -> Result<StoreOp> {
        let (bi, fi, ri, resi) = self.locate_resident(resident_id)?;
        self.buildings[bi].floors[fi].rooms[ri].residents.remove(resi);
        Ok(StoreOp::Delete {
            table: Table::Residents,
            id: resident_id.to_string(),
        })
    }

    /// Moves a resident between rooms, possibly across buildings.
    ///
    /// Returns `Ok(None)` for the source==target no-op. A full target rejects
    /// the move before anything changes. The backend sees a single upsert of
    /// the resident row with its new room.
    pub fn move_resident(
        &mut self,
        resident_id: &str,
        source_room_id: &str,
        target_room_id: &str,
    ) -> Result<Option<StoreOp>> {
        if source_room_id == target_room_id {
            return Ok(None);
        }

        let (sb, sf, sr) = self.locate_room(source_room_id)?;
        let (tb, tf, tr) = self.locate_room(target_room_id)?;

        let target = &self.buildings[tb].floors[tf].rooms[tr];
        if target.residents.len() >= target.capacity() {
            return Err(Error::RoomFull {
                room_number: target.number.clone(),
                capacity: target.capacity(),
            });
        }

        let source = &self.buildings[sb].floors[sf].rooms[sr];
        let Some(resi) = source.residents.iter().position(|r| r.id == resident_id) else {
            return Err(Error::ResidentNotFound {
                id: resident_id.to_string(),
            });
        };

        let resident = self.buildings[sb].floors[sf].rooms[sr].residents.remove(resi);
        let target = &mut self.buildings[tb].floors[tf].rooms[tr];
        let op = StoreOp::Upsert(Record::Resident(ResidentRow {
            id: resident.id.clone(),
            room_id: target.id.clone(),
            name: resident.name.clone(),
            room_number: Some(target.number.clone()),
        }));
        target.residents.push(resident);

        Ok(Some(op))
    }

    // ---- billing ---------------------------------------------------------

    /// Directly overrides the currency amount for one utility, leaving the
    /// units untouched. Used for manual corrections.
    pub fn set_bill_amount(
        &mut self,
        room_id: &str,
        month: &str,
        utility: Utility,
        amount: i64,
    ) -> Result<StoreOp> {
        self.update_bill(room_id, month, |bill| match utility {
            Utility::Water => bill.water = amount,
            Utility::Electricity => bill.electricity = amount,
        })
    }

    /// Records a consumption reading and derives the amount from it,
    /// overwriting any manually-set amount for the same utility and month.
    pub fn set_bill_units(
        &mut self,
        room_id: &str,
        month: &str,
        utility: Utility,
        units: f64,
    ) -> Result<StoreOp> {
        let amount = billing::derive_amount(utility, units);
        self.update_bill(room_id, month, |bill| match utility {
            Utility::Water => {
                bill.water_units = units;
                bill.water = amount;
            }
            Utility::Electricity => {
                bill.electricity_units = units;
                bill.electricity = amount;
            }
        })
    }

    fn update_bill(
        &mut self,
        room_id: &str,
        month: &str,
        apply: impl FnOnce(&mut BillData),
    ) -> Result<StoreOp> {
        let (bi, fi, ri) = self.locate_room(room_id)?;
        let room = &mut self.buildings[bi].floors[fi].rooms[ri];

        let mut bill = room.bill_for(month);
        apply(&mut bill);
        room.bills.insert(month.to_string(), bill);

        Ok(StoreOp::Upsert(Record::Bill(billing::bill_payload(
            &room.id,
            &room.number,
            month,
            &bill,
        ))))
    }

    // ---- users -----------------------------------------------------------

    /// Adds a login account.
    pub fn add_user(
        &mut self,
        username: &str,
        password: &str,
        role: Role,
        name: &str,
    ) -> StoreOp {
        let user = User {
            id: format!("user-{}", fresh_suffix()),
            username: username.to_string(),
            password: password.to_string(),
            role,
            name: name.to_string(),
        };
        let op = StoreOp::Upsert(Record::User(UserRow {
            id: user.id.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
            role,
            name: user.name.clone(),
        }));
        self.users.push(user);
        op
    }

    /// Replaces an existing account wholesale, matched by id.
    pub fn update_user(&mut self, user: User) -> Result<StoreOp> {
        let existing = self
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| Error::UserNotFound {
                id: user.id.clone(),
            })?;
        *existing = user.clone();
        Ok(StoreOp::Upsert(Record::User(UserRow {
            id: user.id,
            username: user.username,
            password: user.password,
            role: user.role,
            name: user.name,
        })))
    }

    /// Removes a login account.
    pub fn delete_user(&mut self, user_id: &str) -> Result<StoreOp> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| Error::UserNotFound {
                id: user_id.to_string(),
            })?;
        self.users.remove(index);
        Ok(StoreOp::Delete {
            table: Table::Users,
            id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::model::Role;
    use crate::test_utils::{sample_snapshot, state_with_rooms};

    const MONTH: &str = "2024-03";

    #[test]
    fn from_snapshot_builds_tree_and_users() {
        let state = DormState::from_snapshot(&sample_snapshot(), Vec::new());
        assert_eq!(state.buildings.len(), 1);
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.users[0].username, "popa");
    }

    #[test]
    fn bootstrap_users_stand_in_when_store_has_none() {
        let mut snapshot = sample_snapshot();
        snapshot.users.clear();

        let bootstrap = vec![User {
            id: "admin-root".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            role: Role::Admin,
            name: "Administrator".to_string(),
        }];
        let state = DormState::from_snapshot(&snapshot, bootstrap);
        assert_eq!(state.users.len(), 1);
        assert!(state.authenticate("admin", "admin").is_some());
    }

    #[test]
    fn add_resident_fills_up_to_capacity_then_rejects() {
        let mut state = state_with_rooms();

        // r-single is a SINGLE: one resident fits, the second is rejected.
        state.add_resident("r-single", "First").unwrap();
        let before = state.clone();
        let err = state.add_resident("r-single", "Second").unwrap_err();

        assert!(matches!(err, Error::RoomFull { capacity: 1, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn add_resident_op_carries_room_and_number() {
        let mut state = state_with_rooms();
        let op = state.add_resident("r-double", "Alice").unwrap();

        let StoreOp::Upsert(Record::Resident(row)) = op else {
            panic!("expected resident upsert");
        };
        assert_eq!(row.room_id, "r-double");
        assert_eq!(row.room_number.as_deref(), Some("102"));
        assert_eq!(row.name, "Alice");
    }

    #[test]
    fn move_resident_relocates_exactly_once() {
        let mut state = state_with_rooms();
        state.add_resident("r-single", "Mover").unwrap();
        let resident_id = state.buildings[0].room("r-single").unwrap().residents[0]
            .id
            .clone();

        let op = state
            .move_resident(&resident_id, "r-single", "r-double")
            .unwrap()
            .expect("a real move produces an upsert");

        assert!(state.buildings[0].room("r-single").unwrap().residents.is_empty());
        let target = state.buildings[0].room("r-double").unwrap();
        assert_eq!(
            target.residents.iter().filter(|r| r.id == resident_id).count(),
            1
        );

        let StoreOp::Upsert(Record::Resident(row)) = op else {
            panic!("expected resident upsert");
        };
        assert_eq!(row.room_id, "r-double");
        assert_eq!(row.room_number.as_deref(), Some("102"));
    }

    #[test]
    fn move_into_full_room_changes_nothing() {
        let mut state = state_with_rooms();
        state.add_resident("r-single", "Stayer").unwrap();
        state.add_resident("r-double", "A").unwrap();
        state.add_resident("r-double", "B").unwrap();
        let resident_id = state.buildings[0].room("r-single").unwrap().residents[0]
            .id
            .clone();

        let before = state.clone();
        let err = state
            .move_resident(&resident_id, "r-single", "r-double")
            .unwrap_err();

        assert!(matches!(err, Error::RoomFull { capacity: 2, .. }));
        assert_eq!(state, before);
    }

    #[test]
    fn move_to_same_room_is_a_noop() {
        let mut state = state_with_rooms();
        state.add_resident("r-single", "Static").unwrap();
        let resident_id = state.buildings[0].room("r-single").unwrap().residents[0]
            .id
            .clone();

        let before = state.clone();
        let op = state
            .move_resident(&resident_id, "r-single", "r-single")
            .unwrap();
        assert!(op.is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn units_update_derives_the_amount() {
        let mut state = state_with_rooms();

        state
            .set_bill_units("r-single", MONTH, Utility::Water, 10.0)
            .unwrap();
        state
            .set_bill_units("r-single", MONTH, Utility::Electricity, 3.0)
            .unwrap();

        let bill = state.buildings[0].room("r-single").unwrap().bill_for(MONTH);
        assert_eq!(bill.water_units, 10.0);
        assert_eq!(bill.water, 180);
        assert_eq!(bill.electricity_units, 3.0);
        assert_eq!(bill.electricity, 21);
    }

    #[test]
    fn amount_override_leaves_units_and_loses_to_the_next_units_update() {
        let mut state = state_with_rooms();
        state
            .set_bill_units("r-single", MONTH, Utility::Water, 10.0)
            .unwrap();

        state
            .set_bill_amount("r-single", MONTH, Utility::Water, 150)
            .unwrap();
        let bill = state.buildings[0].room("r-single").unwrap().bill_for(MONTH);
        assert_eq!(bill.water, 150);
        assert_eq!(bill.water_units, 10.0);

        // The next units-driven update recomputes and clobbers the override.
        state
            .set_bill_units("r-single", MONTH, Utility::Water, 10.0)
            .unwrap();
        let bill = state.buildings[0].room("r-single").unwrap().bill_for(MONTH);
        assert_eq!(bill.water, 180);
    }

    #[test]
    fn bill_op_uses_the_synthetic_id_and_full_payload() {
        let mut state = state_with_rooms();
        let op = state
            .set_bill_units("r-single", MONTH, Utility::Water, 2.0)
            .unwrap();

        let StoreOp::Upsert(Record::Bill(row)) = op else {
            panic!("expected bill upsert");
        };
        assert_eq!(row.id, format!("r-single-{MONTH}"));
        assert_eq!(row.month.as_deref(), Some(MONTH));
        assert_eq!(row.water_units, 2.0);
        assert_eq!(row.water_price, 36);
        assert_eq!(row.electricity_units, 0.0);
        assert_eq!(row.electricity_price, 0);
    }

    #[test]
    fn room_type_downgrade_is_blocked_while_occupied_by_two() {
        let mut state = state_with_rooms();
        state.add_resident("r-double", "A").unwrap();
        state.add_resident("r-double", "B").unwrap();

        let before = state.clone();
        let err = state
            .update_room("r-double", "102", RoomType::Single)
            .unwrap_err();
        assert!(matches!(err, Error::RoomTypeBlocked { occupants: 2, .. }));
        assert_eq!(state, before);

        // With one resident the downgrade is allowed.
        let resident_id = state.buildings[0].room("r-double").unwrap().residents[0]
            .id
            .clone();
        state.remove_resident(&resident_id).unwrap();
        state
            .update_room("r-double", "102A", RoomType::Single)
            .unwrap();
        let room = state.buildings[0].room("r-double").unwrap();
        assert_eq!(room.number, "102A");
        assert_eq!(room.room_type, RoomType::Single);
    }

    #[test]
    fn add_building_continues_the_id_sequence() {
        let mut state = state_with_rooms(); // holds building "b7"
        let ops = state.add_building();

        assert_eq!(state.buildings.len(), 2);
        let added = &state.buildings[1];
        assert_eq!(added.id, "b8");
        assert_eq!(added.floors.len(), 1);
        assert_eq!(added.floors[0].rooms.len(), 4);
        // 1 building + 1 floor + 4 rooms
        assert_eq!(ops.len(), 6);
    }

    #[test]
    fn add_floor_goes_on_top_with_the_next_number() {
        let mut state = state_with_rooms();
        let ops = state.add_floor("b7").unwrap();

        let floors = &state.buildings[0].floors;
        assert_eq!(floors[0].number, 2);
        assert_eq!(floors[0].rooms.len(), 4);
        assert_eq!(floors[0].rooms[0].number, "7201");
        assert_eq!(ops.len(), 5);

        assert!(matches!(
            state.add_floor("nope").unwrap_err(),
            Error::BuildingNotFound { .. }
        ));
    }

    #[test]
    fn add_room_numbers_by_building_floor_sequence() {
        let mut state = state_with_rooms();
        let op = state.add_room("b7-f1", RoomType::Double).unwrap();

        let floor = &state.buildings[0].floors[0];
        assert_eq!(floor.rooms.len(), 3);
        assert_eq!(floor.rooms[2].number, "7103");
        assert_eq!(op.table(), Table::Rooms);
    }

    #[test]
    fn deletes_prune_locally_and_issue_one_delete_each() {
        let mut state = state_with_rooms();

        let op = state.delete_room("r-single").unwrap();
        assert_eq!(op, StoreOp::Delete {
            table: Table::Rooms,
            id: "r-single".to_string()
        });
        assert!(state.buildings[0].room("r-single").is_none());

        let op = state.delete_floor("b7-f1").unwrap();
        assert_eq!(op.table(), Table::Floors);
        assert!(state.buildings[0].floors.is_empty());

        let op = state.delete_building("b7").unwrap();
        assert_eq!(op.table(), Table::Buildings);
        assert!(state.buildings.is_empty());
    }

    #[test]
    fn rename_floor_keeps_number_and_building_in_the_payload() {
        let mut state = state_with_rooms();
        let op = state.rename_floor("b7-f1", "Lobby").unwrap();

        let StoreOp::Upsert(Record::Floor(row)) = op else {
            panic!("expected floor upsert");
        };
        assert_eq!(row.building_id, "b7");
        assert_eq!(row.number, 1);
        assert_eq!(row.name.as_deref(), Some("Lobby"));
        assert_eq!(
            state.buildings[0].floors[0].display_name(),
            "Lobby".to_string()
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut state = state_with_rooms();
        assert!(state.rename_building("b7", "   ").is_err());
        assert!(state.rename_floor("b7-f1", "").is_err());
    }

    #[test]
    fn user_commands_round_trip() {
        let mut state = state_with_rooms();
        let op = state.add_user("meter", "pw", Role::Water, "Meter Reader");
        assert_eq!(op.table(), Table::Users);
        assert!(state.authenticate("meter", "pw").is_some());

        let mut user = state.users.last().unwrap().clone();
        user.password = "changed".to_string();
        state.update_user(user.clone()).unwrap();
        assert!(state.authenticate("meter", "pw").is_none());
        assert!(state.authenticate("meter", "changed").is_some());

        state.delete_user(&user.id).unwrap();
        assert!(state.users.iter().all(|u| u.id != user.id));

        assert!(matches!(
            state.delete_user("missing").unwrap_err(),
            Error::UserNotFound { .. }
        ));
    }
}
