//! Room entity - a rentable unit on a floor.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    /// Opaque string identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning floor id
    pub floor_id: String,
    /// Display number, free text
    pub number: String,
    /// Room type as its wire form, "SINGLE" or "DOUBLE"
    pub room_type: String,
}

/// Defines relationships between Room and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each room belongs to exactly one floor
    #[sea_orm(
        belongs_to = "super::floor::Entity",
        from = "Column::FloorId",
        to = "super::floor::Column::Id"
    )]
    Floor,
    /// One room has many residents (bounded by capacity at mutation time)
    #[sea_orm(has_many = "super::resident::Entity")]
    Residents,
    /// One room has many bills, one per month
    #[sea_orm(has_many = "super::bill::Entity")]
    Bills,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floor.def()
    }
}

impl Related<super::resident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Residents.def()
    }
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
