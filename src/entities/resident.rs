//! Resident entity - a person assigned to a room.
//!
//! A move between rooms is modeled as an upsert of this row with an updated
//! `room_id`; there is no separate "move" operation in the store.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Resident database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "residents")]
pub struct Model {
    /// Opaque string identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Room the resident currently occupies
    pub room_id: String,
    /// Display name
    pub name: String,
    /// Denormalized room number for backend readability
    pub room_number: Option<String>,
}

/// Defines relationships between Resident and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each resident belongs to exactly one room at a time
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
