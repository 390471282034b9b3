//! # Hotel Rate Analytics
//!
//! Rate resolution and reporting core for a hotel back office.
//!
//! ## Core Concepts
//!
//! - **Rate resolution**: a room type's nightly price for a date comes from a
//!   seasonal period if one covers the date, else a weekday override, else the
//!   base price
//! - **Seasonal validation**: seasonal periods may touch on a boundary date but
//!   never overlap
//! - **Stay pricing**: every night of a half-open `[check-in, check-out)` stay is
//!   priced individually, then taxed
//! - **Occupancy**: a reservation holds its room from check-in up to, but not
//!   including, check-out
//! - **Revenue**: recognised on the realization date (check-out for rooms,
//!   completion for services), never pro-rated
//! - **Booking behaviour**: reservations bucketed by creation date and channel
//!
//! Everything except [`reports`] is synchronous and operates on fully loaded,
//! in-memory collections.
//!
//! ## Example
//!
//! ```rust
//! use hotel_rate_analytics::*;
//! use chrono::{NaiveDate, Weekday};
//!
//! let mut deluxe = RoomType::new("rt-deluxe", "Deluxe", 100.0);
//! deluxe.weekday_pricing.set(Weekday::Sat, Some(140.0));
//! deluxe.seasonal_pricing.push(SeasonalPeriod::new(
//!     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
//!     180.0,
//! ));
//! validate_room_type(&deluxe).unwrap();
//!
//! let quote = price_for_stay(
//!     &deluxe,
//!     NaiveDate::from_ymd_opt(2025, 6, 27).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
//!     10.0,
//! )
//! .unwrap();
//!
//! assert_eq!(quote.nights, 5);
//! assert_eq!(quote.subtotal, 100.0 + 140.0 + 100.0 + 100.0 + 180.0);
//! ```

pub mod booking;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod occupancy;
pub mod rates;
pub mod revenue;
pub mod schema;
pub mod seasonal;
pub mod stay;
pub mod utils;

#[cfg(feature = "orchestration")]
pub mod reports;
#[cfg(feature = "orchestration")]
pub mod store;

pub use booking::{
    booking_behavior, BookingAggregator, BookingSummary, CancellationDay, ReservationReport,
    SourceBookings,
};
pub use config::EngineConfig;
pub use error::{RateEngineError, Result};
pub use ingestion::RawDocument;
pub use occupancy::{occupancy, OccupancyReport, OccupancyReportRow, OccupancySummary};
pub use rates::{rate_calendar, resolve_price, resolve_rate, RateSource, ResolvedRate};
pub use revenue::{
    revenue, DailyRevenue, RevenueAggregator, RevenueReport, RoomTypeRevenue, ServiceRevenue,
};
pub use schema::*;
pub use seasonal::{validate_room_type, validate_seasonal_periods};
pub use stay::{price_for_stay, NightlyRate, StayQuote};

#[cfg(feature = "orchestration")]
pub use reports::{HotelDashboard, ReportService};
#[cfg(feature = "orchestration")]
pub use store::{DocumentStore, InMemoryStore};

/// Runs all three aggregators over one hotel's in-memory snapshot.
///
/// `total_rooms` is the snapshot's room count; rooms are never filtered by
/// state before counting.
pub struct ReportProcessor<'a> {
    config: &'a EngineConfig,
}

impl<'a> ReportProcessor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn occupancy(&self, snapshot: &HotelSnapshot, range: &DateRange) -> OccupancyReport {
        occupancy(snapshot.rooms.len(), &snapshot.reservations, range)
    }

    pub fn revenue(&self, snapshot: &HotelSnapshot, range: &DateRange) -> Result<RevenueReport> {
        Ok(RevenueAggregator::new(self.config)?.aggregate(
            &snapshot.reservations,
            &snapshot.service_orders,
            &snapshot.room_types,
            &snapshot.services,
            range,
        ))
    }

    pub fn bookings(&self, snapshot: &HotelSnapshot, range: &DateRange) -> Result<ReservationReport> {
        Ok(BookingAggregator::new(self.config)?.aggregate(&snapshot.reservations, range))
    }
}
