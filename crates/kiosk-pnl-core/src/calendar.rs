//! Lease calendar derived from the signing month.
//!
//! The lease starts on the first day of the signing month. The rent-free
//! renovation window covers the first `renovation_months` months and each
//! lease year spans twelve calendar months from its anniversary.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::KioskPnlError;
use crate::location::{LeaseYear, LocationInfo};
use crate::KioskPnlResult;

/// Month and year in which the lease agreement is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseSigning {
    /// Calendar month, 1 = January
    pub month: u32,
    pub year: i32,
}

impl Default for LeaseSigning {
    fn default() -> Self {
        LeaseSigning {
            month: 8,
            year: 2025,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    /// Last day included in the range
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseYearPeriod {
    pub year: LeaseYear,
    pub period: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseCalendar {
    pub lease_start: NaiveDate,
    /// None when the location grants no rent-free months
    pub renovation_window: Option<DateRange>,
    pub lease_years: Vec<LeaseYearPeriod>,
}

/// Build the calendar for a lease on `location` signed at `signing`.
pub fn build_lease_calendar(
    location: &LocationInfo,
    signing: &LeaseSigning,
) -> KioskPnlResult<LeaseCalendar> {
    if !(1..=12).contains(&signing.month) {
        return Err(KioskPnlError::InvalidInput {
            field: "signing.month".into(),
            reason: format!("Month must be between 1 and 12, got {}", signing.month),
        });
    }

    let lease_start = NaiveDate::from_ymd_opt(signing.year, signing.month, 1).ok_or_else(|| {
        KioskPnlError::DateError(format!(
            "Invalid signing date {}-{:02}",
            signing.year, signing.month
        ))
    })?;

    let renovation_window = if location.renovation_months == 0 {
        None
    } else {
        Some(month_span(lease_start, 0, location.renovation_months)?)
    };

    let lease_years = LeaseYear::ALL
        .iter()
        .map(|year| -> KioskPnlResult<LeaseYearPeriod> {
            let offset = (year.ordinal() - 1) * 12;
            Ok(LeaseYearPeriod {
                year: *year,
                period: month_span(lease_start, offset, 12)?,
            })
        })
        .collect::<KioskPnlResult<Vec<_>>>()?;

    Ok(LeaseCalendar {
        lease_start,
        renovation_window,
        lease_years,
    })
}

/// `len` whole months starting `offset` months after `origin`.
fn month_span(origin: NaiveDate, offset: u32, len: u32) -> KioskPnlResult<DateRange> {
    let start = add_months(origin, offset)?;
    let next = add_months(start, len)?;
    let end = next
        .pred_opt()
        .ok_or_else(|| KioskPnlError::DateError(format!("No day before {next}")))?;
    Ok(DateRange { start, end })
}

fn add_months(date: NaiveDate, months: u32) -> KioskPnlResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        KioskPnlError::DateError(format!(
            "Adding {months} months to {}-{:02} overflows",
            date.year(),
            date.month()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::default_catalog;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_from_august_signing() {
        let catalog = default_catalog();
        let loc = catalog.default_location().unwrap();
        let cal = build_lease_calendar(loc, &LeaseSigning::default()).unwrap();

        assert_eq!(cal.lease_start, ymd(2025, 8, 1));
        let window = cal.renovation_window.unwrap();
        assert_eq!(window.start, ymd(2025, 8, 1));
        assert_eq!(window.end, ymd(2025, 10, 31));

        assert_eq!(cal.lease_years.len(), 3);
        assert_eq!(cal.lease_years[0].period.start, ymd(2025, 8, 1));
        assert_eq!(cal.lease_years[0].period.end, ymd(2026, 7, 31));
        assert_eq!(cal.lease_years[2].year, LeaseYear::Year3);
        assert_eq!(cal.lease_years[2].period.start, ymd(2027, 8, 1));
        assert_eq!(cal.lease_years[2].period.end, ymd(2028, 7, 31));
    }

    #[test]
    fn test_renovation_window_crosses_year_end() {
        let catalog = default_catalog();
        let loc = catalog.default_location().unwrap();
        let signing = LeaseSigning {
            month: 12,
            year: 2024,
        };
        let window = build_lease_calendar(loc, &signing)
            .unwrap()
            .renovation_window
            .unwrap();
        assert_eq!(window.end, ymd(2025, 2, 28));
    }

    #[test]
    fn test_no_window_without_rent_free_months() {
        let mut loc = default_catalog().default_location().unwrap().clone();
        loc.renovation_months = 0;
        let cal = build_lease_calendar(&loc, &LeaseSigning::default()).unwrap();
        assert!(cal.renovation_window.is_none());
    }

    #[test]
    fn test_invalid_signing_month() {
        let catalog = default_catalog();
        let loc = catalog.default_location().unwrap();
        let signing = LeaseSigning {
            month: 13,
            year: 2025,
        };
        assert!(matches!(
            build_lease_calendar(loc, &signing),
            Err(KioskPnlError::InvalidInput { .. })
        ));
    }
}
