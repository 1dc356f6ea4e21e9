//! Billing arithmetic and payload assembly.
//!
//! Unit prices are fixed constants per utility. The amount/units relationship
//! (`amount = round(units × unit_price)`) is enforced only on the
//! units-driven update path; direct amount overrides leave units untouched
//! and the system never reconciles the two on read.

use crate::model::{BillData, Utility};
use crate::store::BillRow;
use chrono::Utc;

/// Price per metered unit of water.
pub const WATER_UNIT_PRICE: f64 = 18.0;
/// Price per metered unit of electricity.
pub const ELECTRICITY_UNIT_PRICE: f64 = 7.0;

/// Price per metered unit for the given utility.
#[must_use]
pub const fn unit_price(utility: Utility) -> f64 {
    match utility {
        Utility::Water => WATER_UNIT_PRICE,
        Utility::Electricity => ELECTRICITY_UNIT_PRICE,
    }
}

/// Derives the rounded currency amount for a consumption reading.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn derive_amount(utility: Utility, units: f64) -> i64 {
    (units * unit_price(utility)).round() as i64
}

/// The month key for the current date, formatted `YYYY-MM`.
#[must_use]
pub fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// The synthetic bill primary key for a room and month.
#[must_use]
pub fn bill_id(room_id: &str, month: &str) -> String {
    format!("{room_id}-{month}")
}

/// Assembles the full four-field bill payload for an upsert.
///
/// The payload always carries every field, not a partial patch, so the remote
/// record is complete no matter which path wrote it.
#[must_use]
pub fn bill_payload(room_id: &str, room_number: &str, month: &str, bill: &BillData) -> BillRow {
    BillRow {
        id: bill_id(room_id, month),
        room_id: room_id.to_string(),
        room_number: Some(room_number.to_string()),
        month: Some(month.to_string()),
        water_units: bill.water_units,
        water_price: bill.water,
        electricity_units: bill.electricity_units,
        electricity_price: bill.electricity,
    }
}
