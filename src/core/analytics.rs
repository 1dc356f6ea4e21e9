//! Analytics Aggregator - monthly usage statistics for one building.
//!
//! Pure function of a building subtree and a month key; callers recompute on
//! every change of either input. A full rescan is fine at the expected
//! cardinality (tens to low hundreds of rooms). Currency totals are plain
//! sums of the already-rounded per-bill amounts; nothing is re-rounded here.

use crate::model::{Building, Utility};
use std::fmt::Write;

/// Per-floor unit consumption breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorUsage {
    /// Floor identifier
    pub floor_id: String,
    /// Explicit floor name, else the generated label
    pub name: String,
    /// Water units consumed across the floor's rooms this month
    pub water_units: f64,
    /// Electricity units consumed across the floor's rooms this month
    pub electricity_units: f64,
}

/// An occupied room whose recorded consumption for a utility is exactly zero.
///
/// Vacant rooms are expected to read zero and are never flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroUsageAlert {
    /// Display number of the flagged room
    pub room_number: String,
    /// Display name of the room's floor
    pub floor_name: String,
    /// Which utilities read zero (one or both)
    pub utilities: Vec<Utility>,
}

/// Monthly aggregate statistics for one building.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingAnalytics {
    /// Sum of water units across every room
    pub total_water_units: f64,
    /// Sum of water charges across every room
    pub total_water_cost: i64,
    /// Sum of electricity units across every room
    pub total_electricity_units: f64,
    /// Sum of electricity charges across every room
    pub total_electricity_cost: i64,
    /// Rooms with at least one resident
    pub occupied_rooms: usize,
    /// All rooms in the building
    pub total_rooms: usize,
    /// Per-floor unit breakdown, in floor display order
    pub floor_usage: Vec<FloorUsage>,
    /// Occupied rooms with zero recorded usage
    pub zero_usage_alerts: Vec<ZeroUsageAlert>,
}

impl BuildingAnalytics {
    /// Occupied share of all rooms, in [0, 1]; 0 when there are no rooms.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy_rate(&self) -> f64 {
        if self.total_rooms == 0 {
            0.0
        } else {
            self.occupied_rooms as f64 / self.total_rooms as f64
        }
    }
}

/// Computes the monthly statistics for one building.
///
/// A room without a bill entry for the month counts as all-zero usage.
#[must_use]
pub fn analyze_building(building: &Building, month: &str) -> BuildingAnalytics {
    let mut stats = BuildingAnalytics {
        total_water_units: 0.0,
        total_water_cost: 0,
        total_electricity_units: 0.0,
        total_electricity_cost: 0,
        occupied_rooms: 0,
        total_rooms: 0,
        floor_usage: Vec::with_capacity(building.floors.len()),
        zero_usage_alerts: Vec::new(),
    };

    for floor in &building.floors {
        let floor_name = floor.display_name();
        let mut floor_water = 0.0;
        let mut floor_electricity = 0.0;

        for room in &floor.rooms {
            let bill = room.bill_for(month);
            let occupied = room.is_occupied();

            stats.total_rooms += 1;
            if occupied {
                stats.occupied_rooms += 1;
            }

            stats.total_water_units += bill.water_units;
            stats.total_water_cost += bill.water;
            stats.total_electricity_units += bill.electricity_units;
            stats.total_electricity_cost += bill.electricity;

            floor_water += bill.water_units;
            floor_electricity += bill.electricity_units;

            if occupied {
                let mut utilities = Vec::new();
                if bill.water_units == 0.0 {
                    utilities.push(Utility::Water);
                }
                if bill.electricity_units == 0.0 {
                    utilities.push(Utility::Electricity);
                }
                if !utilities.is_empty() {
                    stats.zero_usage_alerts.push(ZeroUsageAlert {
                        room_number: room.number.clone(),
                        floor_name: floor_name.clone(),
                        utilities,
                    });
                }
            }
        }

        stats.floor_usage.push(FloorUsage {
            floor_id: floor.id.clone(),
            name: floor_name,
            water_units: floor_water,
            electricity_units: floor_electricity,
        });
    }

    stats
}

/// Formats the monthly statistics as a plain-text report.
#[must_use]
pub fn format_building_summary(
    building_name: &str,
    month: &str,
    stats: &BuildingAnalytics,
) -> String {
    let mut summary = format!("{building_name} - {month}\n");

    // write! to a String is infallible
    let _ = writeln!(
        summary,
        "  Occupancy: {}/{} rooms ({:.0}%)",
        stats.occupied_rooms,
        stats.total_rooms,
        stats.occupancy_rate() * 100.0
    );
    let _ = writeln!(
        summary,
        "  Water: {} units | cost {}",
        stats.total_water_units, stats.total_water_cost
    );
    let _ = writeln!(
        summary,
        "  Electricity: {} units | cost {}",
        stats.total_electricity_units, stats.total_electricity_cost
    );

    let _ = writeln!(summary, "\n  Per floor:");
    for floor in &stats.floor_usage {
        let _ = writeln!(
            summary,
            "    {} - water {} | electricity {}",
            floor.name, floor.water_units, floor.electricity_units
        );
    }

    if !stats.zero_usage_alerts.is_empty() {
        let _ = writeln!(summary, "\n  Zero-usage alerts:");
        for alert in &stats.zero_usage_alerts {
            let utilities: Vec<&str> = alert.utilities.iter().map(|u| u.label()).collect();
            let _ = writeln!(
                summary,
                "    Room {} ({}) - {}",
                alert.room_number,
                alert.floor_name,
                utilities.join(", ")
            );
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::model::{BillData, Floor, Resident, Room, RoomType};

    const MONTH: &str = "2024-01";

    fn room_with_bill(id: &str, occupied: bool, water_units: f64, elec_units: f64) -> Room {
        let mut room = Room::new(id, id.to_uppercase(), RoomType::Double);
        if occupied {
            room.residents.push(Resident {
                id: format!("{id}-res"),
                name: "Occupant".to_string(),
            });
        }
        room.bills.insert(
            MONTH.to_string(),
            BillData {
                water: crate::core::billing::derive_amount(Utility::Water, water_units),
                electricity: crate::core::billing::derive_amount(Utility::Electricity, elec_units),
                water_units,
                electricity_units: elec_units,
            },
        );
        room
    }

    fn one_floor_building(rooms: Vec<Room>) -> Building {
        Building {
            id: "b1".to_string(),
            name: "North".to_string(),
            floors: vec![Floor {
                id: "f1".to_string(),
                number: 1,
                name: None,
                rooms,
            }],
        }
    }

    #[test]
    fn totals_sum_across_all_rooms() {
        let building = one_floor_building(vec![
            room_with_bill("r1", true, 10.0, 5.0),
            room_with_bill("r2", true, 2.0, 1.0),
        ]);

        let stats = analyze_building(&building, MONTH);
        assert_eq!(stats.total_water_units, 12.0);
        assert_eq!(stats.total_water_cost, 216);
        assert_eq!(stats.total_electricity_units, 6.0);
        assert_eq!(stats.total_electricity_cost, 42);
        assert_eq!(stats.occupied_rooms, 2);
        assert_eq!(stats.total_rooms, 2);
    }

    #[test]
    fn occupied_zero_water_room_raises_one_alert() {
        // Room A occupied with zero water, room B vacant with zero everything:
        // exactly one alert, for A's water only.
        let building = one_floor_building(vec![
            room_with_bill("ra", true, 0.0, 5.0),
            room_with_bill("rb", false, 0.0, 0.0),
        ]);

        let stats = analyze_building(&building, MONTH);
        assert_eq!(stats.occupied_rooms, 1);
        assert_eq!(stats.zero_usage_alerts.len(), 1);
        let alert = &stats.zero_usage_alerts[0];
        assert_eq!(alert.room_number, "RA");
        assert_eq!(alert.utilities, vec![Utility::Water]);
    }

    #[test]
    fn both_utilities_flagged_when_both_read_zero() {
        let building = one_floor_building(vec![room_with_bill("ra", true, 0.0, 0.0)]);
        let stats = analyze_building(&building, MONTH);
        assert_eq!(
            stats.zero_usage_alerts[0].utilities,
            vec![Utility::Water, Utility::Electricity]
        );
    }

    #[test]
    fn missing_month_reads_as_all_zero() {
        let building = one_floor_building(vec![room_with_bill("ra", true, 10.0, 5.0)]);
        let stats = analyze_building(&building, "2030-12");
        assert_eq!(stats.total_water_units, 0.0);
        assert_eq!(stats.total_electricity_cost, 0);
        // occupied room with no reading for the month is flagged
        assert_eq!(stats.zero_usage_alerts.len(), 1);
    }

    #[test]
    fn per_floor_breakdown_uses_display_names() {
        let mut building = one_floor_building(vec![room_with_bill("ra", true, 3.0, 2.0)]);
        building.floors[0].name = Some("Ground".to_string());
        building.floors.push(Floor {
            id: "f2".to_string(),
            number: 2,
            name: None,
            rooms: vec![room_with_bill("rb", false, 1.0, 1.0)],
        });

        let stats = analyze_building(&building, MONTH);
        assert_eq!(stats.floor_usage.len(), 2);
        assert_eq!(stats.floor_usage[0].name, "Ground");
        assert_eq!(stats.floor_usage[0].water_units, 3.0);
        assert_eq!(stats.floor_usage[1].name, "Floor 2");
        assert_eq!(stats.floor_usage[1].electricity_units, 1.0);
    }

    #[test]
    fn occupancy_rate_guards_division_by_zero() {
        let building = one_floor_building(Vec::new());
        let stats = analyze_building(&building, MONTH);
        assert_eq!(stats.occupancy_rate(), 0.0);
    }

    #[test]
    fn summary_mentions_totals_and_alerts() {
        let building = one_floor_building(vec![room_with_bill("ra", true, 0.0, 5.0)]);
        let stats = analyze_building(&building, MONTH);
        let summary = format_building_summary("North", MONTH, &stats);

        assert!(summary.contains("North - 2024-01"));
        assert!(summary.contains("Occupancy: 1/1 rooms (100%)"));
        assert!(summary.contains("Electricity: 5 units | cost 35"));
        assert!(summary.contains("Room RA"));
        assert!(summary.contains("water"));
    }
}
