//! Unified error type for the crate.
//!
//! Validation failures (full rooms, blocked type changes) are first-class
//! variants so that callers can surface them as user-facing messages rather
//! than treating them as infrastructure faults.

use thiserror::Error;

/// All failure modes surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// Any error bubbled up from the backing database.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error (config or snapshot files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Malformed JSON snapshot dump.
    #[error("Snapshot parse error: {0}")]
    SnapshotParse(#[from] serde_json::Error),

    /// No building with the given id exists in the current tree.
    #[error("Building not found: {id}")]
    BuildingNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// No floor with the given id exists in the current tree.
    #[error("Floor not found: {id}")]
    FloorNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// No room with the given id exists in the current tree.
    #[error("Room not found: {id}")]
    RoomNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// No resident with the given id exists in the current tree.
    #[error("Resident not found: {id}")]
    ResidentNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// No user with the given id exists in the in-memory user list.
    #[error("User not found: {id}")]
    UserNotFound {
        /// The id that failed to resolve
        id: String,
    },

    /// Adding or moving a resident would exceed the room's capacity.
    #[error("Room {room_number} is already full (capacity {capacity})")]
    RoomFull {
        /// Display number of the rejected room
        room_number: String,
        /// Capacity implied by the room's type
        capacity: usize,
    },

    /// Changing a room to SINGLE while it holds more than one resident.
    #[error("Room {room_number} holds {occupants} residents and cannot become a single room")]
    RoomTypeBlocked {
        /// Display number of the rejected room
        room_number: String,
        /// Current resident count
        occupants: usize,
    },
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
