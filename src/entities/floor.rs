//! Floor entity - one storey of a building.
//!
//! The `number` column drives default ordering (descending, top floor first)
//! and the generated display label when no explicit name is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Floor database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "floors")]
pub struct Model {
    /// Opaque string identifier (e.g. "b1-f2")
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning building id
    pub building_id: String,
    /// Storey number
    pub number: i32,
    /// Optional display-name override
    pub name: Option<String>,
}

/// Defines relationships between Floor and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each floor belongs to exactly one building
    #[sea_orm(
        belongs_to = "super::building::Entity",
        from = "Column::BuildingId",
        to = "super::building::Column::Id"
    )]
    Building,
    /// One floor has many rooms
    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
