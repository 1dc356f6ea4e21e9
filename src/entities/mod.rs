//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the backing tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod bill;
pub mod building;
pub mod floor;
pub mod resident;
pub mod room;
pub mod user;

// Re-export specific types to avoid conflicts
pub use bill::{Column as BillColumn, Entity as Bill, Model as BillModel};
pub use building::{Column as BuildingColumn, Entity as Building, Model as BuildingModel};
pub use floor::{Column as FloorColumn, Entity as Floor, Model as FloorModel};
pub use resident::{Column as ResidentColumn, Entity as Resident, Model as ResidentModel};
pub use room::{Column as RoomColumn, Entity as Room, Model as RoomModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
