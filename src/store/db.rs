//! SQLite-backed implementation of the store contract using SeaORM.
//!
//! Tables are created from the entity definitions with
//! `Schema::create_table_from_entity`, so the database schema always matches
//! the Rust struct definitions without hand-written SQL. Upserts follow the
//! find-then-insert-or-update pattern; the last write for a given primary key
//! wins.

use crate::entities::{
    Bill, Building, Floor, Resident, Room, User, bill, building, floor, resident, room, user,
};
use crate::errors::Result;
use crate::model::{Role, RoomType};
use crate::store::{Record, Snapshot, Store, StoreOp, Table};
use crate::store::{BillRow, BuildingRow, FloorRow, ResidentRow, RoomRow, UserRow};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set,
};
use tracing::warn;

/// Store implementation backed by a SeaORM SQLite connection.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Connects to the given database URL and ensures all tables exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = Database::connect(database_url).await?;
        create_tables(&db).await?;
        Ok(Self { db })
    }

    /// Wraps an existing connection (tables are assumed to exist).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Access to the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Creates all backing tables from the entity definitions if they are absent.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Building),
        schema.create_table_from_entity(Floor),
        schema.create_table_from_entity(Room),
        schema.create_table_from_entity(Resident),
        schema.create_table_from_entity(Bill),
        schema.create_table_from_entity(User),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(statement)).await?;
    }

    Ok(())
}

impl Store for SqlStore {
    async fn fetch_all(&self) -> Result<Snapshot> {
        let buildings = Building::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| BuildingRow {
                id: m.id,
                name: m.name,
            })
            .collect();

        let floors = Floor::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| FloorRow {
                id: m.id,
                building_id: m.building_id,
                number: m.number,
                name: m.name,
            })
            .collect();

        let rooms = Room::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|m| match RoomType::parse(&m.room_type) {
                Some(room_type) => Some(RoomRow {
                    id: m.id,
                    floor_id: m.floor_id,
                    number: m.number,
                    room_type,
                }),
                None => {
                    warn!(room = m.id, room_type = m.room_type, "skipping room with unknown type");
                    None
                }
            })
            .collect();

        let residents = Resident::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| ResidentRow {
                id: m.id,
                room_id: m.room_id,
                name: m.name,
                room_number: m.room_number,
            })
            .collect();

        let bills = Bill::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| BillRow {
                id: m.id,
                room_id: m.room_id,
                room_number: m.room_number,
                month: Some(m.month),
                water_units: m.water_units,
                water_price: m.water_price,
                electricity_units: m.electricity_units,
                electricity_price: m.electricity_price,
            })
            .collect();

        let users = User::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|m| match Role::parse(&m.role) {
                Some(role) => Some(UserRow {
                    id: m.id,
                    username: m.username,
                    password: m.password,
                    role,
                    name: m.name,
                }),
                None => {
                    warn!(user = m.id, role = m.role, "skipping user with unknown role");
                    None
                }
            })
            .collect();

        Ok(Snapshot {
            buildings,
            floors,
            rooms,
            residents,
            bills,
            users,
        })
    }

    async fn apply(&self, op: StoreOp) -> Result<()> {
        match op {
            StoreOp::Upsert(Record::Building(row)) => upsert_building(&self.db, row).await,
            StoreOp::Upsert(Record::Floor(row)) => upsert_floor(&self.db, row).await,
            StoreOp::Upsert(Record::Room(row)) => upsert_room(&self.db, row).await,
            StoreOp::Upsert(Record::Resident(row)) => upsert_resident(&self.db, row).await,
            StoreOp::Upsert(Record::Bill(row)) => upsert_bill(&self.db, row).await,
            StoreOp::Upsert(Record::User(row)) => upsert_user(&self.db, row).await,
            StoreOp::Delete { table, id } => delete_by_id(&self.db, table, id).await,
        }
    }
}

async fn upsert_building(db: &DatabaseConnection, row: BuildingRow) -> Result<()> {
    if let Some(model) = Building::find_by_id(&row.id).one(db).await? {
        let mut active: building::ActiveModel = model.into();
        active.name = Set(row.name);
        active.update(db).await?;
    } else {
        building::ActiveModel {
            id: Set(row.id),
            name: Set(row.name),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn upsert_floor(db: &DatabaseConnection, row: FloorRow) -> Result<()> {
    if let Some(model) = Floor::find_by_id(&row.id).one(db).await? {
        let mut active: floor::ActiveModel = model.into();
        active.building_id = Set(row.building_id);
        active.number = Set(row.number);
        active.name = Set(row.name);
        active.update(db).await?;
    } else {
        floor::ActiveModel {
            id: Set(row.id),
            building_id: Set(row.building_id),
            number: Set(row.number),
            name: Set(row.name),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn upsert_room(db: &DatabaseConnection, row: RoomRow) -> Result<()> {
    if let Some(model) = Room::find_by_id(&row.id).one(db).await? {
        let mut active: room::ActiveModel = model.into();
        active.floor_id = Set(row.floor_id);
        active.number = Set(row.number);
        active.room_type = Set(row.room_type.as_str().to_string());
        active.update(db).await?;
    } else {
        room::ActiveModel {
            id: Set(row.id),
            floor_id: Set(row.floor_id),
            number: Set(row.number),
            room_type: Set(row.room_type.as_str().to_string()),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn upsert_resident(db: &DatabaseConnection, row: ResidentRow) -> Result<()> {
    if let Some(model) = Resident::find_by_id(&row.id).one(db).await? {
        let mut active: resident::ActiveModel = model.into();
        active.room_id = Set(row.room_id);
        active.name = Set(row.name);
        active.room_number = Set(row.room_number);
        active.update(db).await?;
    } else {
        resident::ActiveModel {
            id: Set(row.id),
            room_id: Set(row.room_id),
            name: Set(row.name),
            room_number: Set(row.room_number),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn upsert_bill(db: &DatabaseConnection, row: BillRow) -> Result<()> {
    let month = row.month.unwrap_or_default();
    if let Some(model) = Bill::find_by_id(&row.id).one(db).await? {
        let mut active: bill::ActiveModel = model.into();
        active.room_id = Set(row.room_id);
        active.room_number = Set(row.room_number);
        active.month = Set(month);
        active.water_units = Set(row.water_units);
        active.water_price = Set(row.water_price);
        active.electricity_units = Set(row.electricity_units);
        active.electricity_price = Set(row.electricity_price);
        active.update(db).await?;
    } else {
        bill::ActiveModel {
            id: Set(row.id),
            room_id: Set(row.room_id),
            room_number: Set(row.room_number),
            month: Set(month),
            water_units: Set(row.water_units),
            water_price: Set(row.water_price),
            electricity_units: Set(row.electricity_units),
            electricity_price: Set(row.electricity_price),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn upsert_user(db: &DatabaseConnection, row: UserRow) -> Result<()> {
    if let Some(model) = User::find_by_id(&row.id).one(db).await? {
        let mut active: user::ActiveModel = model.into();
        active.username = Set(row.username);
        active.password = Set(row.password);
        active.role = Set(row.role.as_str().to_string());
        active.name = Set(row.name);
        active.update(db).await?;
    } else {
        user::ActiveModel {
            id: Set(row.id),
            username: Set(row.username),
            password: Set(row.password),
            role: Set(row.role.as_str().to_string()),
            name: Set(row.name),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

async fn delete_by_id(db: &DatabaseConnection, table: Table, id: String) -> Result<()> {
    match table {
        Table::Buildings => Building::delete_by_id(id).exec(db).await?,
        Table::Floors => Floor::delete_by_id(id).exec(db).await?,
        Table::Rooms => Room::delete_by_id(id).exec(db).await?,
        Table::Residents => Resident::delete_by_id(id).exec(db).await?,
        Table::Bills => Bill::delete_by_id(id).exec(db).await?,
        Table::Users => User::delete_by_id(id).exec(db).await?,
    };
    Ok(())
}
