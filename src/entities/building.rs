//! Building entity - the root of one dormitory building.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Building database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "buildings")]
pub struct Model {
    /// Opaque string identifier (e.g. "b1")
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the building
    pub name: String,
}

/// Defines relationships between Building and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One building has many floors
    #[sea_orm(has_many = "super::floor::Entity")]
    Floors,
}

impl Related<super::floor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Floors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
