use crate::error::{RateEngineError, Result};
use crate::rates::{resolve_rate, RateSource};
use crate::schema::RoomType;
use crate::utils::{add_days, nights_between, round2};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub price: f64,
    pub source: RateSource,
}

/// A priced stay. `subtotal` is unrounded; `tax` and `total` are rounded to
/// cents, so `total` is `round2(subtotal + tax)` rather than the raw sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StayQuote {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub nights: u32,
    pub breakdown: Vec<NightlyRate>,
    /// Exact sum of the breakdown prices
    pub subtotal: f64,
    pub tax_rate: f64,
    /// `subtotal * tax_rate / 100`, rounded to cents
    pub tax: f64,
    /// `subtotal + tax`, rounded to cents
    pub total: f64,
}

/// Prices every night of `[check_in, check_out)` and applies `tax_rate` (a
/// percentage). The check-out date is never priced.
pub fn price_for_stay(
    room_type: &RoomType,
    check_in: NaiveDate,
    check_out: NaiveDate,
    tax_rate: f64,
) -> Result<StayQuote> {
    if !tax_rate.is_finite() || tax_rate < 0.0 {
        return Err(RateEngineError::InvalidTaxRate(tax_rate));
    }

    let nights = nights_between(check_in, check_out);
    if nights <= 0 {
        return Err(RateEngineError::InvalidRange {
            start: check_in,
            end: check_out,
        });
    }
    let nights = u32::try_from(nights).map_err(|_| {
        RateEngineError::DateError(format!(
            "Stay from {} to {} is too long to price",
            check_in, check_out
        ))
    })?;

    let mut breakdown = Vec::with_capacity(nights as usize);
    for i in 0..nights {
        let date = add_days(check_in, u64::from(i))?;
        let rate = resolve_rate(room_type, date);
        breakdown.push(NightlyRate {
            date,
            price: rate.price,
            source: rate.source,
        });
    }

    let subtotal: f64 = breakdown.iter().map(|n| n.price).sum();
    let tax = round2(subtotal * tax_rate / 100.0);
    let total = round2(subtotal + tax);

    Ok(StayQuote {
        check_in_date: check_in,
        check_out_date: check_out,
        nights,
        breakdown,
        subtotal,
        tax_rate,
        tax,
        total,
    })
}
