use crate::schema::SeasonalPeriod;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateEngineError {
    #[error("Invalid date range: end {end} must be after start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Seasonal period #{first_index} ({first}) overlaps seasonal period #{second_index} ({second})")]
    Overlap {
        first_index: usize,
        first: SeasonalPeriod,
        second_index: usize,
        second: SeasonalPeriod,
    },

    #[error("Invalid price {price} for {context}: must be greater than 0")]
    InvalidPrice { context: String, price: f64 },

    #[error("Invalid tax rate {0}: must be a finite, non-negative percentage")]
    InvalidTaxRate(f64),

    #[error("Invalid UTC offset {0} minutes: must be within +/-18 hours")]
    InvalidUtcOffset(i32),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Invalid {collection} document '{id}': {details}")]
    DocumentError {
        collection: String,
        id: String,
        details: String,
    },

    #[error("Room type '{0}' not found")]
    RoomTypeNotFound(String),

    #[error("Datastore error: {0}")]
    StoreError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RateEngineError>;
