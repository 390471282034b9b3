use crate::error::{RateEngineError, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-day-of-week price overrides. A `None` day falls through to the base price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub struct WeekdayPricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<f64>,
}

impl WeekdayPricing {
    pub fn get(&self, weekday: Weekday) -> Option<f64> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn set(&mut self, weekday: Weekday, price: Option<f64>) {
        let slot = match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        };
        *slot = price;
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Defined overrides in Monday..Sunday order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, f64)> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter_map(|day| self.get(day).map(|price| (day, price)))
    }
}

/// A fixed override price for an inclusive `[start_date, end_date]` window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPeriod {
    #[schemars(description = "First priced date, YYYY-MM-DD, inclusive.")]
    pub start_date: NaiveDate,
    #[schemars(description = "Last priced date, YYYY-MM-DD, inclusive.")]
    pub end_date: NaiveDate,
    pub price: f64,
}

impl SeasonalPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, price: f64) -> Self {
        Self {
            start_date,
            end_date,
            price,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Strict comparison on both sides: periods that only touch on a boundary
    /// date do not overlap.
    pub fn overlaps(&self, other: &SeasonalPeriod) -> bool {
        self.start_date < other.end_date && self.end_date > other.start_date
    }
}

impl fmt::Display for SeasonalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {} at {:.2}",
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.price
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    pub id: String,
    pub name: String,
    #[schemars(description = "Nightly price when no weekday or seasonal override applies. Must be > 0.")]
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "WeekdayPricing::is_empty")]
    pub weekday_pricing: WeekdayPricing,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schemars(description = "Non-overlapping seasonal overrides, highest pricing priority.")]
    pub seasonal_pricing: Vec<SeasonalPeriod>,
}

impl RoomType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            weekday_pricing: WeekdayPricing::default(),
            seasonal_pricing: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "checked-in" => Some(Self::CheckedIn),
            "checked-out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            "no-show" => Some(Self::NoShow),
            _ => None,
        }
    }

    /// Whether a reservation in this state holds its room for the nights of the stay.
    pub fn is_occupying(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn | Self::CheckedOut)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel a reservation was booked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BookingSource {
    Direct,
    Website,
    Phone,
    Email,
    WalkIn,
    Ota,
    TravelAgent,
    Corporate,
}

impl BookingSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Website => "website",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::WalkIn => "walk-in",
            Self::Ota => "ota",
            Self::TravelAgent => "travel-agent",
            Self::Corporate => "corporate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "direct" => Some(Self::Direct),
            "website" | "web" | "online" => Some(Self::Website),
            "phone" => Some(Self::Phone),
            "email" => Some(Self::Email),
            "walk-in" | "walkin" => Some(Self::WalkIn),
            "ota" => Some(Self::Ota),
            "travel-agent" | "agent" => Some(Self::TravelAgent),
            "corporate" => Some(Self::Corporate),
            _ => None,
        }
    }
}

impl fmt::Display for BookingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub room_id: String,
    pub room_type_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub status: ReservationStatus,
    #[serde(default)]
    pub source: Option<BookingSource>,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Half-open stay: the check-out date itself is free.
    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.check_in_date <= date && date < self.check_out_date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceOrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ServiceOrderStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub reservation_id: String,
    pub service_id: String,
    pub total_price: f64,
    pub status: ServiceOrderStatus,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub room_type_id: Option<String>,
}

/// Every collection the reports need for one hotel, fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelSnapshot {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub room_types: Vec<RoomType>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub service_orders: Vec<ServiceOrder>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl HotelSnapshot {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(HotelSnapshot)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Report window, both ends inclusive. The end must fall strictly after the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", into = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = RateEngineError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        DateRange::new(raw.start, raw.end)
    }
}

impl From<DateRange> for RawDateRange {
    fn from(range: DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(RateEngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range from two `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(crate::utils::parse_date(start)?, crate::utils::parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        crate::utils::days_inclusive(self.start, self.end)
    }
}
