//! User entity - login accounts with a role.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Opaque string identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Login name
    pub username: String,
    /// Plaintext password (credential handling is out of scope)
    pub password: String,
    /// Role as its wire form: "ADMIN", "WATER", or "ELECTRIC"
    pub role: String,
    /// Display name
    pub name: String,
}

/// Users have no relations to the building hierarchy
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
