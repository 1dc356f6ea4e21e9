//! Bill entity - utility figures for one room and one month.
//!
//! The primary key is the synthetic `{roomId}-{month}` id, which is what
//! gives bills their map semantics: re-submitting a reading for the same
//! room and month overwrites the earlier record.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bill database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    /// Synthetic identifier `{roomId}-{month}`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Room the bill belongs to
    pub room_id: String,
    /// Denormalized room number for backend readability
    pub room_number: Option<String>,
    /// Billing month key `YYYY-MM`
    pub month: String,
    /// Metered water consumption
    pub water_units: f64,
    /// Water charge, rounded at write time
    pub water_price: i64,
    /// Metered electricity consumption
    pub electricity_units: f64,
    /// Electricity charge, rounded at write time
    pub electricity_price: i64,
}

/// Defines relationships between Bill and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each bill belongs to exactly one room
    #[sea_orm(
        belongs_to = "super::room::Entity",
        from = "Column::RoomId",
        to = "super::room::Column::Id"
    )]
    Room,
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Room.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
