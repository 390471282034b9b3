use crate::error::{RateEngineError, Result};
use crate::schema::{RoomType, SeasonalPeriod};
use crate::utils::weekday_name;

/// Rejects a seasonal list when any two periods overlap, naming the first
/// conflicting pair in list order.
///
/// Periods that share only a boundary date (`a.end_date == b.start_date`) are
/// accepted.
pub fn validate_seasonal_periods(periods: &[SeasonalPeriod]) -> Result<()> {
    for (i, first) in periods.iter().enumerate() {
        for (offset, second) in periods[i + 1..].iter().enumerate() {
            if first.overlaps(second) {
                return Err(RateEngineError::Overlap {
                    first_index: i,
                    first: first.clone(),
                    second_index: i + 1 + offset,
                    second: second.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Full write-time check for a room type's pricing rules.
pub fn validate_room_type(room_type: &RoomType) -> Result<()> {
    validate_price(room_type.base_price, || {
        format!("base price of room type '{}'", room_type.name)
    })?;

    for (weekday, price) in room_type.weekday_pricing.iter() {
        validate_price(price, || {
            format!(
                "{} price of room type '{}'",
                weekday_name(weekday),
                room_type.name
            )
        })?;
    }

    for (idx, period) in room_type.seasonal_pricing.iter().enumerate() {
        if period.end_date < period.start_date {
            return Err(RateEngineError::InvalidRange {
                start: period.start_date,
                end: period.end_date,
            });
        }
        validate_price(period.price, || {
            format!(
                "seasonal period #{} of room type '{}'",
                idx, room_type.name
            )
        })?;
    }

    validate_seasonal_periods(&room_type.seasonal_pricing)
}

fn validate_price(price: f64, context: impl FnOnce() -> String) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(RateEngineError::InvalidPrice {
            context: context(),
            price,
        });
    }
    Ok(())
}
