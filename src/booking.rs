use crate::config::EngineConfig;
use crate::error::Result;
use crate::schema::{DateRange, Reservation, ReservationStatus};
use crate::utils::{local_date, percentage};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceBookings {
    pub source: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationDay {
    pub date: NaiveDate,
    pub cancellations: usize,
    pub no_shows: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub total_bookings: usize,
    pub total_cancellations: usize,
    pub total_no_shows: usize,
    pub cancellation_rate: f64,
    pub no_show_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationReport {
    pub bookings_by_source: Vec<SourceBookings>,
    pub cancellations_and_no_shows: Vec<CancellationDay>,
    pub summary: BookingSummary,
}

/// Booking behaviour for reservations created within a date range.
pub struct BookingAggregator {
    offset: FixedOffset,
    unknown_source_label: String,
}

impl Default for BookingAggregator {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            unknown_source_label: EngineConfig::default().unknown_source_label,
        }
    }
}

impl BookingAggregator {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            offset: config.local_offset()?,
            unknown_source_label: config.unknown_source_label.clone(),
        })
    }

    pub fn aggregate(&self, reservations: &[Reservation], range: &DateRange) -> ReservationReport {
        let created: Vec<(NaiveDate, &Reservation)> = reservations
            .iter()
            .map(|r| (local_date(r.created_at, self.offset), r))
            .filter(|(date, _)| range.contains(*date))
            .collect();
        let total_bookings = created.len();

        let mut source_order: Vec<(&str, usize)> = Vec::new();
        let mut source_index: HashMap<&str, usize> = HashMap::new();
        let mut by_day: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
        let mut total_cancellations = 0;
        let mut total_no_shows = 0;

        for (date, reservation) in &created {
            let source = reservation
                .source
                .map_or(self.unknown_source_label.as_str(), |s| s.as_str());
            match source_index.get(source) {
                Some(&idx) => source_order[idx].1 += 1,
                None => {
                    source_index.insert(source, source_order.len());
                    source_order.push((source, 1));
                }
            }

            match reservation.status {
                ReservationStatus::Cancelled => {
                    total_cancellations += 1;
                    by_day.entry(*date).or_default().0 += 1;
                }
                ReservationStatus::NoShow => {
                    total_no_shows += 1;
                    by_day.entry(*date).or_default().1 += 1;
                }
                _ => {}
            }
        }

        let mut bookings_by_source: Vec<SourceBookings> = source_order
            .into_iter()
            .map(|(source, count)| SourceBookings {
                source: source.to_string(),
                count,
                percentage: percentage(count, total_bookings),
            })
            .collect();
        bookings_by_source.sort_by(|a, b| b.count.cmp(&a.count));

        let cancellations_and_no_shows = by_day
            .into_iter()
            .map(|(date, (cancellations, no_shows))| CancellationDay {
                date,
                cancellations,
                no_shows,
                total: cancellations + no_shows,
            })
            .collect();

        ReservationReport {
            bookings_by_source,
            cancellations_and_no_shows,
            summary: BookingSummary {
                total_bookings,
                total_cancellations,
                total_no_shows,
                cancellation_rate: percentage(total_cancellations, total_bookings),
                no_show_rate: percentage(total_no_shows, total_bookings),
            },
        }
    }
}

/// [`BookingAggregator`] with the default "unknown" source label and UTC dates.
pub fn booking_behavior(reservations: &[Reservation], range: &DateRange) -> ReservationReport {
    BookingAggregator::default().aggregate(reservations, range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BookingSource;
    use chrono::{DateTime, TimeZone};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn created(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap()
    }

    fn booking(
        id: &str,
        source: Option<BookingSource>,
        status: ReservationStatus,
        at: DateTime<Utc>,
    ) -> Reservation {
        Reservation {
            id: id.to_string(),
            room_id: "101".to_string(),
            room_type_id: "rt".to_string(),
            check_in_date: d("2025-06-01"),
            check_out_date: d("2025-06-03"),
            status,
            source,
            total_price: 200.0,
            created_at: at,
            checked_out_at: None,
        }
    }

    fn sample() -> Vec<Reservation> {
        vec![
            booking("r1", Some(BookingSource::Website), ReservationStatus::Confirmed, created(1, 9)),
            booking("r2", Some(BookingSource::Phone), ReservationStatus::Cancelled, created(1, 10)),
            booking("r3", Some(BookingSource::Website), ReservationStatus::NoShow, created(3, 11)),
            booking("r4", None, ReservationStatus::Cancelled, created(3, 12)),
            booking("r5", Some(BookingSource::Website), ReservationStatus::CheckedOut, created(4, 8)),
            booking("r6", Some(BookingSource::Ota), ReservationStatus::Pending, created(5, 8)),
            // created outside the window
            booking("r7", Some(BookingSource::Phone), ReservationStatus::Cancelled, created(20, 8)),
        ]
    }

    #[test]
    fn test_bookings_by_source() {
        let range = DateRange::parse("2025-05-01", "2025-05-10").unwrap();
        let report = booking_behavior(&sample(), &range);

        let sources: Vec<(&str, usize)> = report
            .bookings_by_source
            .iter()
            .map(|s| (s.source.as_str(), s.count))
            .collect();
        assert_eq!(
            sources,
            vec![("website", 3), ("phone", 1), ("unknown", 1), ("ota", 1)]
        );
        assert_eq!(report.bookings_by_source[0].percentage, 50.0);
        assert_eq!(report.bookings_by_source[1].percentage, 16.67);
    }

    #[test]
    fn test_cancellations_by_creation_date() {
        let range = DateRange::parse("2025-05-01", "2025-05-10").unwrap();
        let report = booking_behavior(&sample(), &range);

        assert_eq!(
            report.cancellations_and_no_shows,
            vec![
                CancellationDay {
                    date: d("2025-05-01"),
                    cancellations: 1,
                    no_shows: 0,
                    total: 1,
                },
                CancellationDay {
                    date: d("2025-05-03"),
                    cancellations: 1,
                    no_shows: 1,
                    total: 2,
                },
            ]
        );
    }

    #[test]
    fn test_summary_rates() {
        let range = DateRange::parse("2025-05-01", "2025-05-10").unwrap();
        let summary = booking_behavior(&sample(), &range).summary;

        assert_eq!(summary.total_bookings, 6);
        assert_eq!(summary.total_cancellations, 2);
        assert_eq!(summary.total_no_shows, 1);
        assert_eq!(summary.cancellation_rate, 33.33);
        assert_eq!(summary.no_show_rate, 16.67);
    }

    #[test]
    fn test_empty_window_is_all_zero() {
        let range = DateRange::parse("2024-01-01", "2024-01-31").unwrap();
        let report = booking_behavior(&sample(), &range);

        assert!(report.bookings_by_source.is_empty());
        assert!(report.cancellations_and_no_shows.is_empty());
        assert_eq!(report.summary, BookingSummary::default());
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let range = DateRange::parse("2025-05-01", "2025-05-10").unwrap();
        let reservations = sample();
        let first = serde_json::to_string(&booking_behavior(&reservations, &range)).unwrap();
        let second = serde_json::to_string(&booking_behavior(&reservations, &range)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_unknown_label_and_offset() {
        let config = EngineConfig {
            utc_offset_minutes: -600,
            unknown_source_label: "not recorded".to_string(),
            ..EngineConfig::default()
        };
        // 05:00 UTC on May 1 is still April 30 at UTC-10
        let reservations = vec![booking("r1", None, ReservationStatus::Confirmed, created(1, 5))];
        let range = DateRange::parse("2025-04-30", "2025-05-01").unwrap();
        let report = BookingAggregator::new(&config)
            .unwrap()
            .aggregate(&reservations, &range);

        assert_eq!(report.bookings_by_source[0].source, "not recorded");
        assert_eq!(report.summary.total_bookings, 1);

        let may_only = DateRange::parse("2025-05-01", "2025-05-02").unwrap();
        let report = BookingAggregator::new(&config)
            .unwrap()
            .aggregate(&reservations, &may_only);
        assert_eq!(report.summary.total_bookings, 0);
    }
}
