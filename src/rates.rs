use crate::schema::{DateRange, RoomType};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which pricing rule produced a nightly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    /// The date falls inside a seasonal period
    Seasonal,
    /// A weekday override matched the date's weekday
    Weekday,
    /// No override applied
    Base,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRate {
    pub date: NaiveDate,
    pub price: f64,
    pub source: RateSource,
}

/// Resolves the nightly rate for `date`: seasonal period first, then the
/// weekday override, then the base price.
///
/// The weekday comes straight from the calendar date, so there is no timezone
/// involved. When seasonal periods touch on a boundary date, the earliest one
/// in the list wins.
pub fn resolve_rate(room_type: &RoomType, date: NaiveDate) -> ResolvedRate {
    if let Some(period) = room_type.seasonal_pricing.iter().find(|p| p.contains(date)) {
        return ResolvedRate {
            date,
            price: period.price,
            source: RateSource::Seasonal,
        };
    }

    if let Some(price) = room_type.weekday_pricing.get(date.weekday()) {
        return ResolvedRate {
            date,
            price,
            source: RateSource::Weekday,
        };
    }

    ResolvedRate {
        date,
        price: room_type.base_price,
        source: RateSource::Base,
    }
}

pub fn resolve_price(room_type: &RoomType, date: NaiveDate) -> f64 {
    resolve_rate(room_type, date).price
}

/// One resolved rate per day of `range`, both ends included.
pub fn rate_calendar(room_type: &RoomType, range: &DateRange) -> Vec<ResolvedRate> {
    range.days().map(|date| resolve_rate(room_type, date)).collect()
}
