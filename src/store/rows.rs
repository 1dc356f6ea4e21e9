//! Loosely-typed rows as they arrive from the backing store.
//!
//! Backend identifiers are not trusted to be strings: a numeric id and the
//! string form of the same id must compare equal after ingest. All id and
//! foreign-key fields are therefore canonicalized to `String` during
//! deserialization, and numeric bill fields tolerate absent, null, or
//! non-numeric values by defaulting to zero. This keeps every downstream
//! comparison a plain `String` equality (coerce once at the boundary rather
//! than scattering coercion through matching logic).

use crate::model::{Role, RoomType};
use serde::{Deserialize, Deserializer, Serialize};

/// The shapes an untyped backend scalar can take.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

/// Coerces a string-or-number field to its canonical string form.
fn de_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_string())
}

/// Like [`de_string`] but tolerating null; missing is handled by `default`.
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

/// The shapes a lenient numeric field can take; anything else reads as zero.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Num(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LooseNumber {
    fn as_f64(&self) -> f64 {
        match self {
            Self::Num(v) => *v,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            Self::Other(_) => 0.0,
        }
    }
}

/// Consumption counts: number, numeric string, or zero for anything else.
fn de_units<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.as_f64())
}

/// Currency amounts: as [`de_units`], rounded to a whole amount.
#[allow(clippy::cast_possible_truncation)]
fn de_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.as_f64().round() as i64)
}

/// Storey numbers: as [`de_units`], truncated to an integer.
#[allow(clippy::cast_possible_truncation)]
fn de_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.as_f64().round() as i32)
}

/// One row of the `Buildings` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingRow {
    /// Primary key
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// One row of the `Floors` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorRow {
    /// Primary key
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Owning building
    #[serde(deserialize_with = "de_string")]
    pub building_id: String,
    /// Storey number
    #[serde(default, deserialize_with = "de_int")]
    pub number: i32,
    /// Optional display-name override
    #[serde(default, deserialize_with = "de_opt_string")]
    pub name: Option<String>,
}

/// One row of the `Rooms` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRow {
    /// Primary key
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Owning floor
    #[serde(deserialize_with = "de_string")]
    pub floor_id: String,
    /// Display number (free text, may arrive numeric)
    #[serde(deserialize_with = "de_string")]
    pub number: String,
    /// Room type, fixing the capacity
    #[serde(rename = "type")]
    pub room_type: RoomType,
}

/// One row of the `Residents` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentRow {
    /// Primary key
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Room the resident currently occupies
    #[serde(deserialize_with = "de_string")]
    pub room_id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Denormalized room number carried for backend readability
    #[serde(default, deserialize_with = "de_opt_string")]
    pub room_number: Option<String>,
}

/// One row of the `Bills` table, keyed by the synthetic `{roomId}-{month}` id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    /// Synthetic primary key `{roomId}-{month}`
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Room the bill belongs to
    #[serde(deserialize_with = "de_string")]
    pub room_id: String,
    /// Denormalized room number carried for backend readability
    #[serde(default, deserialize_with = "de_opt_string")]
    pub room_number: Option<String>,
    /// Billing month key `YYYY-MM`; rows without one are dropped on ingest
    #[serde(default, deserialize_with = "de_opt_string")]
    pub month: Option<String>,
    /// Metered water consumption
    #[serde(default, deserialize_with = "de_units")]
    pub water_units: f64,
    /// Water charge
    #[serde(default, deserialize_with = "de_amount")]
    pub water_price: i64,
    /// Metered electricity consumption
    #[serde(default, deserialize_with = "de_units")]
    pub electricity_units: f64,
    /// Electricity charge
    #[serde(default, deserialize_with = "de_amount")]
    pub electricity_price: i64,
}

/// One row of the `Users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    /// Primary key
    #[serde(deserialize_with = "de_string")]
    pub id: String,
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Access role
    pub role: Role,
    /// Display name
    #[serde(default)]
    pub name: String,
}
