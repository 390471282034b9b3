//! Adapters from hosted-store documents to the plain record shapes.
//!
//! Documents arrive as JSON objects carrying an `id` plus their fields.
//! Timestamps may be RFC 3339 strings, `{seconds, nanoseconds}` objects or
//! epoch milliseconds. Gaps in sparse maps (`null` or absent keys) become
//! `None`.

use crate::error::{RateEngineError, Result};
use crate::schema::{
    BookingSource, Reservation, ReservationStatus, Room, RoomType, SeasonalPeriod, Service,
    ServiceOrder, ServiceOrderStatus, WeekdayPricing,
};
use crate::utils::{parse_date, parse_weekday_name};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }
}

// Field access bound to one document, so every failure names its source
struct Reader<'a> {
    collection: &'static str,
    doc: &'a RawDocument,
}

impl<'a> Reader<'a> {
    fn new(collection: &'static str, doc: &'a RawDocument) -> Self {
        Self { collection, doc }
    }

    fn error(&self, details: String) -> RateEngineError {
        RateEngineError::DocumentError {
            collection: self.collection.to_string(),
            id: self.doc.id.clone(),
            details,
        }
    }

    fn value(&self, field: &str) -> Option<&'a Value> {
        self.doc.fields.get(field).filter(|v| !v.is_null())
    }

    fn string(&self, field: &str) -> Result<String> {
        self.opt_string(field)?
            .ok_or_else(|| self.error(format!("missing field '{}'", field)))
    }

    fn opt_string(&self, field: &str) -> Result<Option<String>> {
        match self.value(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.error(format!("field '{}' is not a string: {}", field, other))),
        }
    }

    fn money(&self, field: &str) -> Result<f64> {
        let value = self
            .value(field)
            .ok_or_else(|| self.error(format!("missing field '{}'", field)))?;
        parse_money(value).ok_or_else(|| self.error(format!("field '{}' is not a number: {}", field, value)))
    }

    fn date(&self, field: &str) -> Result<NaiveDate> {
        let raw = self.string(field)?;
        parse_date(&raw).map_err(|e| self.error(format!("field '{}': {}", field, e)))
    }

    fn timestamp(&self, field: &str) -> Result<DateTime<Utc>> {
        self.opt_timestamp(field)?
            .ok_or_else(|| self.error(format!("missing field '{}'", field)))
    }

    fn opt_timestamp(&self, field: &str) -> Result<Option<DateTime<Utc>>> {
        match self.value(field) {
            None => Ok(None),
            Some(value) => parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| self.error(format!("field '{}' is not a timestamp: {}", field, value))),
        }
    }
}

/// Accepts JSON numbers and numeric strings ("120", "99.50").
pub fn parse_money(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let nanos = u32::try_from(nanos).ok()?;
            Utc.timestamp_opt(seconds, nanos).single()
        }
        _ => None,
    }
}

pub fn room_type_from_document(doc: &RawDocument) -> Result<RoomType> {
    let reader = Reader::new("roomTypes", doc);

    let mut weekday_pricing = WeekdayPricing::default();
    if let Some(value) = reader.value("weekdayPricing") {
        let map = value
            .as_object()
            .ok_or_else(|| reader.error("field 'weekdayPricing' is not an object".to_string()))?;
        for (name, price) in map {
            let Some(weekday) = parse_weekday_name(name) else {
                warn!("Ignoring unknown weekday '{}' in room type {}", name, doc.id);
                continue;
            };
            if price.is_null() {
                continue;
            }
            let price = parse_money(price).ok_or_else(|| {
                reader.error(format!("weekday price for '{}' is not a number: {}", name, price))
            })?;
            weekday_pricing.set(weekday, Some(price));
        }
    }

    let mut seasonal_pricing = Vec::new();
    if let Some(value) = reader.value("seasonalPricing") {
        let entries = value
            .as_array()
            .ok_or_else(|| reader.error("field 'seasonalPricing' is not a list".to_string()))?;
        for (idx, entry) in entries.iter().enumerate() {
            let period = RawDocument::new(format!("{}#season{}", doc.id, idx), entry.clone());
            let period_reader = Reader::new("roomTypes", &period);
            seasonal_pricing.push(SeasonalPeriod {
                start_date: period_reader.date("startDate")?,
                end_date: period_reader.date("endDate")?,
                price: period_reader.money("price")?,
            });
        }
    }

    Ok(RoomType {
        id: doc.id.clone(),
        name: reader.string("name")?,
        base_price: reader.money("basePrice")?,
        weekday_pricing,
        seasonal_pricing,
    })
}

pub fn reservation_from_document(doc: &RawDocument) -> Result<Reservation> {
    let reader = Reader::new("reservations", doc);

    let status_raw = reader.string("status")?;
    let status = ReservationStatus::parse(&status_raw)
        .ok_or_else(|| reader.error(format!("unknown status '{}'", status_raw)))?;

    let source = match reader.opt_string("source")? {
        None => None,
        Some(raw) => {
            let parsed = BookingSource::parse(&raw);
            if parsed.is_none() {
                warn!("Unknown booking source '{}' on reservation {}", raw, doc.id);
            }
            parsed
        }
    };

    Ok(Reservation {
        id: doc.id.clone(),
        room_id: reader.string("roomId")?,
        room_type_id: reader.string("roomTypeId")?,
        check_in_date: reader.date("checkInDate")?,
        check_out_date: reader.date("checkOutDate")?,
        status,
        source,
        total_price: reader.money("totalPrice")?,
        created_at: reader.timestamp("createdAt")?,
        checked_out_at: reader.opt_timestamp("checkedOutAt")?,
    })
}

pub fn service_order_from_document(doc: &RawDocument) -> Result<ServiceOrder> {
    let reader = Reader::new("serviceOrders", doc);

    let status_raw = reader.string("status")?;
    let status = ServiceOrderStatus::parse(&status_raw)
        .ok_or_else(|| reader.error(format!("unknown status '{}'", status_raw)))?;

    Ok(ServiceOrder {
        id: doc.id.clone(),
        reservation_id: reader.string("reservationId")?,
        service_id: reader.string("serviceId")?,
        total_price: reader.money("totalPrice")?,
        status,
        completed_at: reader.opt_timestamp("completedAt")?,
    })
}

pub fn service_from_document(doc: &RawDocument) -> Result<Service> {
    let reader = Reader::new("services", doc);
    Ok(Service {
        id: doc.id.clone(),
        name: reader.string("name")?,
    })
}

pub fn room_from_document(doc: &RawDocument) -> Result<Room> {
    let reader = Reader::new("rooms", doc);
    Ok(Room {
        id: doc.id.clone(),
        hotel_id: reader.string("hotelId")?,
        room_number: reader.opt_string("roomNumber")?,
        room_type_id: reader.opt_string("roomTypeId")?,
    })
}

/// Converts a whole collection, failing on the first malformed document.
pub fn convert_all<T>(
    docs: &[RawDocument],
    convert: impl Fn(&RawDocument) -> Result<T>,
) -> Result<Vec<T>> {
    docs.iter().map(convert).collect()
}
