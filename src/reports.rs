use crate::booking::{BookingAggregator, ReservationReport};
use crate::config::EngineConfig;
use crate::error::{RateEngineError, Result};
use crate::occupancy::{occupancy, OccupancyReport};
use crate::revenue::{RevenueAggregator, RevenueReport};
use crate::schema::DateRange;
use crate::stay::{price_for_stay, StayQuote};
use crate::store::DocumentStore;
use chrono::NaiveDate;
use futures::try_join;
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelDashboard {
    pub occupancy: OccupancyReport,
    pub revenue: RevenueReport,
    pub reservations: ReservationReport,
}

/// Fetches a hotel's collections and hands them to the aggregators.
///
/// Independent collections are fetched concurrently. Dropping a returned
/// future abandons the request.
pub struct ReportService<S> {
    store: S,
    config: EngineConfig,
}

impl<S: DocumentStore> ReportService<S> {
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn occupancy_report(&self, hotel_id: &str, range: &DateRange) -> Result<OccupancyReport> {
        info!(
            "Building occupancy report for hotel {} ({} to {})",
            hotel_id,
            range.start(),
            range.end()
        );

        let (rooms, reservations) =
            try_join!(self.store.rooms(hotel_id), self.store.reservations(hotel_id))?;
        debug!(
            "Loaded {} rooms and {} reservations",
            rooms.len(),
            reservations.len()
        );

        Ok(occupancy(rooms.len(), &reservations, range))
    }

    pub async fn revenue_report(&self, hotel_id: &str, range: &DateRange) -> Result<RevenueReport> {
        info!(
            "Building revenue report for hotel {} ({} to {})",
            hotel_id,
            range.start(),
            range.end()
        );
        let aggregator = RevenueAggregator::new(&self.config)?;

        let (reservations, service_orders, room_types, services) = try_join!(
            self.store.reservations(hotel_id),
            self.store.service_orders(hotel_id),
            self.store.room_types(hotel_id),
            self.store.services(hotel_id),
        )?;
        debug!(
            "Loaded {} reservations, {} service orders, {} room types, {} services",
            reservations.len(),
            service_orders.len(),
            room_types.len(),
            services.len()
        );

        Ok(aggregator.aggregate(&reservations, &service_orders, &room_types, &services, range))
    }

    pub async fn reservation_report(
        &self,
        hotel_id: &str,
        range: &DateRange,
    ) -> Result<ReservationReport> {
        info!(
            "Building reservation report for hotel {} ({} to {})",
            hotel_id,
            range.start(),
            range.end()
        );
        let aggregator = BookingAggregator::new(&self.config)?;

        let reservations = self.store.reservations(hotel_id).await?;
        debug!("Loaded {} reservations", reservations.len());

        Ok(aggregator.aggregate(&reservations, range))
    }

    /// All three reports from a single fetch of every collection.
    pub async fn dashboard(&self, hotel_id: &str, range: &DateRange) -> Result<HotelDashboard> {
        info!(
            "Building dashboard for hotel {} ({} to {})",
            hotel_id,
            range.start(),
            range.end()
        );
        let revenue = RevenueAggregator::new(&self.config)?;
        let bookings = BookingAggregator::new(&self.config)?;

        let (rooms, reservations, service_orders, room_types, services) = try_join!(
            self.store.rooms(hotel_id),
            self.store.reservations(hotel_id),
            self.store.service_orders(hotel_id),
            self.store.room_types(hotel_id),
            self.store.services(hotel_id),
        )?;

        Ok(HotelDashboard {
            occupancy: occupancy(rooms.len(), &reservations, range),
            revenue: revenue.aggregate(&reservations, &service_orders, &room_types, &services, range),
            reservations: bookings.aggregate(&reservations, range),
        })
    }

    /// Prices a stay for one of the hotel's room types. `tax_rate` falls back
    /// to the configured default.
    pub async fn quote_stay(
        &self,
        hotel_id: &str,
        room_type_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        tax_rate: Option<f64>,
    ) -> Result<StayQuote> {
        let room_types = self.store.room_types(hotel_id).await?;
        let room_type = room_types
            .iter()
            .find(|rt| rt.id == room_type_id)
            .ok_or_else(|| RateEngineError::RoomTypeNotFound(room_type_id.to_string()))?;

        price_for_stay(
            room_type,
            check_in,
            check_out,
            tax_rate.unwrap_or(self.config.default_tax_rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HotelSnapshot, Room, RoomType};
    use crate::store::InMemoryStore;

    fn service() -> ReportService<InMemoryStore> {
        let snapshot = HotelSnapshot {
            rooms: vec![Room {
                id: "101".to_string(),
                hotel_id: "h1".to_string(),
                room_number: None,
                room_type_id: Some("rt".to_string()),
            }],
            room_types: vec![RoomType::new("rt", "Standard", 100.0)],
            ..HotelSnapshot::default()
        };
        let config = EngineConfig {
            default_tax_rate: 10.0,
            ..EngineConfig::default()
        };
        ReportService::new(InMemoryStore::new().with_hotel("h1", snapshot), config).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_quote_stay_uses_default_tax() {
        let quote = service()
            .quote_stay("h1", "rt", d("2025-01-10"), d("2025-01-13"), None)
            .await
            .unwrap();
        assert_eq!(quote.total, 330.0);

        let untaxed = service()
            .quote_stay("h1", "rt", d("2025-01-10"), d("2025-01-13"), Some(0.0))
            .await
            .unwrap();
        assert_eq!(untaxed.total, 300.0);
    }

    #[tokio::test]
    async fn test_quote_stay_unknown_room_type() {
        let result = service()
            .quote_stay("h1", "missing", d("2025-01-10"), d("2025-01-13"), None)
            .await;
        assert!(matches!(result, Err(RateEngineError::RoomTypeNotFound(_))));
    }

    #[tokio::test]
    async fn test_unknown_hotel_propagates_store_error() {
        let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
        let result = service().dashboard("h2", &range).await;
        assert!(matches!(result, Err(RateEngineError::StoreError(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            utc_offset_minutes: 5000,
            ..EngineConfig::default()
        };
        assert!(ReportService::new(InMemoryStore::new(), config).is_err());
    }
}
