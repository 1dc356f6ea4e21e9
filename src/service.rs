//! Session orchestration between the in-memory state and the store.
//!
//! [`DormService`] owns the loaded [`DormState`] and a handle to the store.
//! Reads happen against the in-memory tree only. Each mutation runs the
//! corresponding state command first; only when it succeeds are the mirror
//! write(s) handed to the store, spawned and never awaited. A failed write is
//! logged and otherwise ignored, so the local view stays ahead of a flaky
//! backend rather than blocking on it.

use crate::core::{analytics, seed};
use crate::errors::{Error, Result};
use crate::model::{Role, RoomType, User, Utility};
use crate::state::DormState;
use crate::store::{Snapshot, Store, StoreOp};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A loaded session: the state plus the store it mirrors into.
pub struct DormService<S> {
    store: Arc<S>,
    state: DormState,
    offline: bool,
}

impl<S: Store + 'static> DormService<S> {
    /// Fetches the store and builds the session state.
    ///
    /// A failed fetch switches the session to offline mode over the mock
    /// tree. A successful fetch of a store with no buildings stays online
    /// with an empty tree; that is a valid "nothing provisioned yet" state,
    /// not a fallback.
    pub async fn load(store: Arc<S>, bootstrap_users: Vec<User>) -> Self {
        match store.fetch_all().await {
            Ok(snapshot) => Self {
                store,
                state: DormState::from_snapshot(&snapshot, bootstrap_users),
                offline: false,
            },
            Err(fetch_error) => {
                warn!(error = %fetch_error, "initial fetch failed, entering offline mode");
                Self {
                    store,
                    state: DormState {
                        buildings: seed::initial_buildings(),
                        users: bootstrap_users,
                    },
                    offline: true,
                }
            }
        }
    }

    /// The current session state.
    #[must_use]
    pub const fn state(&self) -> &DormState {
        &self.state
    }

    /// Whether the initial fetch failed, the mock tree is being shown, and
    /// writes are being dropped.
    #[must_use]
    pub const fn offline(&self) -> bool {
        self.offline
    }

    /// Re-fetches the store and rebuilds the state, keeping the current
    /// user list as the bootstrap in case the store carries no accounts.
    pub async fn reload(&mut self) -> Result<()> {
        let snapshot = self.store.fetch_all().await?;
        let users = std::mem::take(&mut self.state.users);
        self.state = DormState::from_snapshot(&snapshot, users);
        self.offline = false;
        Ok(())
    }

    /// Writes the full mock tree and the current user list into the store,
    /// sequentially and awaited, then adopts that tree as the session state.
    pub async fn seed(&mut self) -> Result<()> {
        let buildings = seed::initial_buildings();
        let ops = seed::seed_ops(&buildings, &self.state.users);
        let count = ops.len();
        for op in ops {
            self.store.apply(op).await?;
        }
        self.state.buildings = buildings;
        // all writes landed, the store is reachable again
        self.offline = false;
        info!(count, "seeded store");
        Ok(())
    }

    /// Imports a JSON table dump into the store, awaited row by row, then
    /// reloads. Returns the number of imported rows.
    pub async fn import_snapshot(&mut self, json: &str) -> Result<usize> {
        let snapshot = Snapshot::from_json_str(json)?;
        let count = snapshot.row_count();
        for op in snapshot.into_ops() {
            self.store.apply(op).await?;
        }
        info!(count, "imported snapshot");
        self.reload().await?;
        Ok(count)
    }

    /// Renders the monthly usage report for one building.
    pub fn report(&self, building_id: &str, month: &str) -> Result<String> {
        let building = self
            .state
            .building(building_id)
            .ok_or_else(|| Error::BuildingNotFound {
                id: building_id.to_string(),
            })?;
        let stats = analytics::analyze_building(building, month);
        Ok(analytics::format_building_summary(
            &building.name,
            month,
            &stats,
        ))
    }

    /// Hands successful mutations' mirror writes to the store without
    /// awaiting them. Dropped entirely while offline.
    fn dispatch(&self, ops: Vec<StoreOp>) {
        if self.offline {
            warn!(count = ops.len(), "offline, dropping store writes");
            return;
        }
        for op in ops {
            let store = Arc::clone(&self.store);
            tokio::spawn(async move {
                let table = op.table();
                let id = op.id().to_string();
                if let Err(write_error) = store.apply(op).await {
                    error!(table = table.as_str(), id, error = %write_error, "store write failed");
                }
            });
        }
    }

    // ---- mutation commands ----------------------------------------------

    /// Adds a building with one default floor.
    pub fn add_building(&mut self) {
        let ops = self.state.add_building();
        self.dispatch(ops);
    }

    /// Renames a building.
    pub fn rename_building(&mut self, building_id: &str, name: &str) -> Result<()> {
        let op = self.state.rename_building(building_id, name)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Deletes a building.
    pub fn delete_building(&mut self, building_id: &str) -> Result<()> {
        let op = self.state.delete_building(building_id)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Adds the next floor to a building.
    pub fn add_floor(&mut self, building_id: &str) -> Result<()> {
        let ops = self.state.add_floor(building_id)?;
        self.dispatch(ops);
        Ok(())
    }

    /// Sets a floor's display name.
    pub fn rename_floor(&mut self, floor_id: &str, name: &str) -> Result<()> {
        let op = self.state.rename_floor(floor_id, name)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Deletes a floor.
    pub fn delete_floor(&mut self, floor_id: &str) -> Result<()> {
        let op = self.state.delete_floor(floor_id)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Adds a room to a floor.
    pub fn add_room(&mut self, floor_id: &str, room_type: RoomType) -> Result<()> {
        let op = self.state.add_room(floor_id, room_type)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Updates a room's number and type.
    pub fn update_room(&mut self, room_id: &str, number: &str, room_type: RoomType) -> Result<()> {
        let op = self.state.update_room(room_id, number, room_type)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Deletes a room.
    pub fn delete_room(&mut self, room_id: &str) -> Result<()> {
        let op = self.state.delete_room(room_id)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Adds a resident to a room.
    pub fn add_resident(&mut self, room_id: &str, name: &str) -> Result<()> {
        let op = self.state.add_resident(room_id, name)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Renames a resident.
    pub fn rename_resident(&mut self, resident_id: &str, name: &str) -> Result<()> {
        let op = self.state.rename_resident(resident_id, name)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Removes a resident.
    pub fn remove_resident(&mut self, resident_id: &str) -> Result<()> {
        let op = self.state.remove_resident(resident_id)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Moves a resident between rooms.
    pub fn move_resident(
        &mut self,
        resident_id: &str,
        source_room_id: &str,
        target_room_id: &str,
    ) -> Result<()> {
        if let Some(op) = self
            .state
            .move_resident(resident_id, source_room_id, target_room_id)?
        {
            self.dispatch(vec![op]);
        }
        Ok(())
    }

    /// Overrides a bill's currency amount directly.
    pub fn set_bill_amount(
        &mut self,
        room_id: &str,
        month: &str,
        utility: Utility,
        amount: i64,
    ) -> Result<()> {
        let op = self.state.set_bill_amount(room_id, month, utility, amount)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Records a consumption reading, deriving the amount.
    pub fn set_bill_units(
        &mut self,
        room_id: &str,
        month: &str,
        utility: Utility,
        units: f64,
    ) -> Result<()> {
        let op = self.state.set_bill_units(room_id, month, utility, units)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Adds a login account.
    pub fn add_user(&mut self, username: &str, password: &str, role: Role, name: &str) {
        let op = self.state.add_user(username, password, role, name);
        self.dispatch(vec![op]);
    }

    /// Replaces a login account.
    pub fn update_user(&mut self, user: User) -> Result<()> {
        let op = self.state.update_user(user)?;
        self.dispatch(vec![op]);
        Ok(())
    }

    /// Removes a login account.
    pub fn delete_user(&mut self, user_id: &str) -> Result<()> {
        let op = self.state.delete_user(user_id)?;
        self.dispatch(vec![op]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::store::{Record, Table};
    use crate::test_utils::{sample_snapshot, FakeStore};
    use std::time::Duration;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    fn bootstrap() -> Vec<User> {
        vec![User {
            id: "admin-root".to_string(),
            username: "popa".to_string(),
            password: "popa".to_string(),
            role: Role::Admin,
            name: "Administrator".to_string(),
        }]
    }

    #[tokio::test]
    async fn load_uses_store_data_when_reachable() {
        let store = Arc::new(FakeStore::with_snapshot(sample_snapshot()));
        let service = DormService::load(store, bootstrap()).await;

        assert!(!service.offline());
        assert_eq!(service.state().buildings.len(), 1);
        assert_eq!(service.state().buildings[0].id, "b1");
    }

    #[tokio::test]
    async fn unreachable_store_falls_back_to_the_mock_tree_offline() {
        let store = Arc::new(FakeStore::unreachable());
        let service = DormService::load(store, bootstrap()).await;

        assert!(service.offline());
        assert_eq!(service.state().buildings.len(), 2);
        assert_eq!(service.state().buildings[0].room_count(), 16);
        // bootstrap accounts still work offline
        assert!(service.state().authenticate("popa", "popa").is_some());
    }

    #[tokio::test]
    async fn empty_store_stays_online_with_an_empty_tree() {
        let store = Arc::new(FakeStore::with_snapshot(Snapshot::default()));
        let service = DormService::load(store, bootstrap()).await;

        // a reachable but unprovisioned store is not the offline fallback
        assert!(!service.offline());
        assert!(service.state().buildings.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn successful_mutations_reach_the_store_without_being_awaited() {
        let store = Arc::new(FakeStore::with_snapshot(sample_snapshot()));
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        // r2 is an empty DOUBLE in the sample data
        service.add_resident("r2", "Carol").unwrap();
        settle().await;

        let ops = store.recorded_ops();
        assert_eq!(ops.len(), 1);
        let StoreOp::Upsert(Record::Resident(row)) = &ops[0] else {
            panic!("expected resident upsert");
        };
        assert_eq!(row.room_id, "r2");
        assert_eq!(row.name, "Carol");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn rejected_mutations_write_nothing() {
        let store = Arc::new(FakeStore::with_snapshot(sample_snapshot()));
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        // r1 is a SINGLE already holding Alice
        assert!(service.add_resident("r1", "Second").is_err());
        settle().await;
        assert!(store.recorded_ops().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn write_failures_leave_the_local_state_intact() {
        let store = Arc::new(FakeStore::failing_writes(sample_snapshot()));
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        service.add_resident("r2", "Carol").unwrap();
        settle().await;

        assert!(store.recorded_ops().is_empty());
        let room = service.state().buildings[0].room("r2").unwrap();
        assert_eq!(room.residents.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn offline_sessions_drop_writes_entirely() {
        let store = Arc::new(FakeStore::unreachable());
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        // first mock room is b1-f4-r1, a SINGLE
        service.add_resident("b1-f4-r1", "Dana").unwrap();
        settle().await;

        assert!(store.recorded_ops().is_empty());
        let room = service.state().buildings[0].room("b1-f4-r1").unwrap();
        assert_eq!(room.residents.len(), 1);
    }

    #[tokio::test]
    async fn seed_writes_users_then_the_whole_mock_tree() {
        let store = Arc::new(FakeStore::with_snapshot(Snapshot::default()));
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        service.seed().await.unwrap();

        // 1 user + 2 buildings + 8 floors + 32 rooms
        let ops = store.recorded_ops();
        assert_eq!(ops.len(), 43);
        assert_eq!(ops[0].table(), Table::Users);
        assert_eq!(service.state().buildings.len(), 2);
    }

    #[tokio::test]
    async fn import_applies_every_row_and_reloads() {
        let store = Arc::new(FakeStore::with_snapshot(sample_snapshot()));
        let mut service = DormService::load(Arc::clone(&store), bootstrap()).await;

        let json = serde_json::to_string(&sample_snapshot()).unwrap();
        let count = service.import_snapshot(&json).await.unwrap();

        assert_eq!(count, sample_snapshot().row_count());
        assert_eq!(store.recorded_ops().len(), count);
        assert_eq!(service.state().buildings.len(), 1);
    }

    #[tokio::test]
    async fn report_names_the_building_and_flags_missing_ids() {
        let store = Arc::new(FakeStore::with_snapshot(sample_snapshot()));
        let service = DormService::load(store, bootstrap()).await;

        let report = service.report("b1", "2024-01").unwrap();
        assert!(report.contains("North Hall - 2024-01"));

        assert!(matches!(
            service.report("nope", "2024-01").unwrap_err(),
            Error::BuildingNotFound { .. }
        ));
    }
}
