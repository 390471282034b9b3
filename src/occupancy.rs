use crate::schema::{DateRange, Reservation};
use crate::utils::{percentage, round2};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyReportRow {
    pub date: NaiveDate,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub occupancy_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OccupancySummary {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub total_days: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyReport {
    pub rows: Vec<OccupancyReportRow>,
    pub summary: OccupancySummary,
}

/// Daily occupancy for every date of `range` (both ends included).
///
/// Only confirmed, checked-in and checked-out reservations hold a room, and a
/// room is counted once per day however many reservations cover it. A hotel
/// with no rooms yields an empty report.
pub fn occupancy(
    total_rooms: usize,
    reservations: &[Reservation],
    range: &DateRange,
) -> OccupancyReport {
    if total_rooms == 0 {
        return OccupancyReport::default();
    }

    let occupying: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.status.is_occupying())
        .filter(|r| r.check_in_date <= range.end() && r.check_out_date > range.start())
        .collect();

    let rows: Vec<OccupancyReportRow> = range
        .days()
        .map(|date| {
            let occupied_rooms = occupying
                .iter()
                .filter(|r| r.occupies(date))
                .map(|r| r.room_id.as_str())
                .collect::<HashSet<_>>()
                .len();

            OccupancyReportRow {
                date,
                total_rooms,
                occupied_rooms,
                occupancy_percentage: percentage(occupied_rooms, total_rooms),
            }
        })
        .collect();

    let summary = summarize(&rows);
    OccupancyReport { rows, summary }
}

pub fn summarize(rows: &[OccupancyReportRow]) -> OccupancySummary {
    if rows.is_empty() {
        return OccupancySummary::default();
    }

    let percentages = rows.iter().map(|r| r.occupancy_percentage);
    let sum: f64 = percentages.clone().sum();
    let max = percentages.clone().fold(f64::MIN, f64::max);
    let min = percentages.fold(f64::MAX, f64::min);

    OccupancySummary {
        average: round2(sum / rows.len() as f64),
        max,
        min,
        total_days: rows.len(),
    }
}
