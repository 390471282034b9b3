use crate::error::{RateEngineError, Result};
use crate::utils::utc_offset;
use chrono::FixedOffset;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_UTC_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    #[schemars(
        description = "Hotel-local offset from UTC in minutes, used to turn createdAt/checkedOutAt/completedAt timestamps into calendar dates."
    )]
    pub utc_offset_minutes: i32,

    #[schemars(description = "Tax percentage applied by stay quotes when the caller gives none.")]
    pub default_tax_rate: f64,

    #[schemars(description = "Label for revenue whose room type no longer exists.")]
    pub unknown_room_type_label: String,

    #[schemars(description = "Label for revenue whose service no longer exists.")]
    pub unknown_service_label: String,

    #[schemars(description = "Bucket name for reservations without a booking source.")]
    pub unknown_source_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            default_tax_rate: 0.0,
            unknown_room_type_label: "Unknown Room Type".to_string(),
            unknown_service_label: "Unknown Service".to_string(),
            unknown_source_label: "unknown".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        debug!(
            "Loaded engine config: utc offset {} min, default tax {}%",
            config.utc_offset_minutes, config.default_tax_rate
        );
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(RateEngineError::InvalidUtcOffset(self.utc_offset_minutes));
        }
        if !self.default_tax_rate.is_finite() || self.default_tax_rate < 0.0 {
            return Err(RateEngineError::InvalidTaxRate(self.default_tax_rate));
        }
        Ok(())
    }

    pub fn local_offset(&self) -> Result<FixedOffset> {
        self.validate()?;
        utc_offset(self.utc_offset_minutes)
    }
}
