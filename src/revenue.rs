use crate::config::EngineConfig;
use crate::error::Result;
use crate::schema::{
    DateRange, Reservation, ReservationStatus, RoomType, Service, ServiceOrder,
    ServiceOrderStatus,
};
use crate::utils::{local_date, round2};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeRevenue {
    pub room_type_id: String,
    pub room_type_name: String,
    pub revenue: f64,
    pub reservation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRevenue {
    pub service_id: String,
    pub service_name: String,
    pub revenue: f64,
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub room_revenue: f64,
    pub service_revenue: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub room_revenue: f64,
    pub service_revenue: f64,
    pub revenue_by_room_type: Vec<RoomTypeRevenue>,
    pub revenue_by_service: Vec<ServiceRevenue>,
    /// Realized revenue per local calendar date, ascending
    pub revenue_by_day: Vec<DailyRevenue>,
}

// Running totals for one group, kept unrounded until the report is built
struct Bucket<'a> {
    id: &'a str,
    raw: f64,
    count: usize,
}

#[derive(Default)]
struct Buckets<'a> {
    order: Vec<Bucket<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> Buckets<'a> {
    fn add(&mut self, id: &'a str, amount: f64) {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                self.order.push(Bucket {
                    id,
                    raw: 0.0,
                    count: 0,
                });
                self.index.insert(id, self.order.len() - 1);
                self.order.len() - 1
            }
        };
        let bucket = &mut self.order[idx];
        bucket.raw += amount;
        bucket.count += 1;
    }
}

/// Realized revenue for a date range.
///
/// Room revenue comes from checked-out reservations whose local check-out
/// date is in range; service revenue from completed orders whose local
/// completion date is in range. Nothing is pro-rated.
pub struct RevenueAggregator {
    offset: FixedOffset,
    unknown_room_type_label: String,
    unknown_service_label: String,
}

impl Default for RevenueAggregator {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            offset: Utc.fix(),
            unknown_room_type_label: config.unknown_room_type_label,
            unknown_service_label: config.unknown_service_label,
        }
    }
}

impl RevenueAggregator {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            offset: config.local_offset()?,
            unknown_room_type_label: config.unknown_room_type_label.clone(),
            unknown_service_label: config.unknown_service_label.clone(),
        })
    }

    pub fn aggregate(
        &self,
        reservations: &[Reservation],
        service_orders: &[ServiceOrder],
        room_types: &[RoomType],
        services: &[Service],
        range: &DateRange,
    ) -> RevenueReport {
        let mut by_room_type = Buckets::default();
        let mut by_service = Buckets::default();
        let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        let mut room_raw = 0.0;
        let mut service_raw = 0.0;

        for reservation in reservations {
            if reservation.status != ReservationStatus::CheckedOut {
                continue;
            }
            let Some(date) = self.realized_on(reservation.checked_out_at, range) else {
                continue;
            };

            room_raw += reservation.total_price;
            by_room_type.add(&reservation.room_type_id, reservation.total_price);
            by_day.entry(date).or_default().0 += reservation.total_price;
        }

        for order in service_orders {
            if order.status != ServiceOrderStatus::Completed {
                continue;
            }
            let Some(date) = self.realized_on(order.completed_at, range) else {
                continue;
            };

            service_raw += order.total_price;
            by_service.add(&order.service_id, order.total_price);
            by_day.entry(date).or_default().1 += order.total_price;
        }

        let room_type_names: HashMap<&str, &str> = room_types
            .iter()
            .map(|rt| (rt.id.as_str(), rt.name.as_str()))
            .collect();
        let service_names: HashMap<&str, &str> = services
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect();

        let mut revenue_by_room_type: Vec<RoomTypeRevenue> = by_room_type
            .order
            .into_iter()
            .map(|b| RoomTypeRevenue {
                room_type_id: b.id.to_string(),
                room_type_name: room_type_names
                    .get(b.id)
                    .map_or_else(|| self.unknown_room_type_label.clone(), |n| n.to_string()),
                revenue: round2(b.raw),
                reservation_count: b.count,
            })
            .collect();
        revenue_by_room_type.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

        let mut revenue_by_service: Vec<ServiceRevenue> = by_service
            .order
            .into_iter()
            .map(|b| ServiceRevenue {
                service_id: b.id.to_string(),
                service_name: service_names
                    .get(b.id)
                    .map_or_else(|| self.unknown_service_label.clone(), |n| n.to_string()),
                revenue: round2(b.raw),
                order_count: b.count,
            })
            .collect();
        revenue_by_service.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));

        let revenue_by_day = by_day
            .into_iter()
            .map(|(date, (room, service))| DailyRevenue {
                date,
                room_revenue: round2(room),
                service_revenue: round2(service),
                total_revenue: round2(room + service),
            })
            .collect();

        RevenueReport {
            total_revenue: round2(room_raw + service_raw),
            room_revenue: round2(room_raw),
            service_revenue: round2(service_raw),
            revenue_by_room_type,
            revenue_by_service,
            revenue_by_day,
        }
    }

    fn realized_on(
        &self,
        timestamp: Option<DateTime<Utc>>,
        range: &DateRange,
    ) -> Option<NaiveDate> {
        let date = local_date(timestamp?, self.offset);
        range.contains(date).then_some(date)
    }
}

/// [`RevenueAggregator`] with default labels and UTC dates.
pub fn revenue(
    reservations: &[Reservation],
    service_orders: &[ServiceOrder],
    room_types: &[RoomType],
    services: &[Service],
    range: &DateRange,
) -> RevenueReport {
    RevenueAggregator::default().aggregate(reservations, service_orders, room_types, services, range)
}
