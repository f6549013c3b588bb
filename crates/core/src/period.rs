//! Calendar months.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Earliest year accepted for a budget or report.
pub const MIN_YEAR: i32 = 1970;
/// Latest year accepted for a budget or report.
pub const MAX_YEAR: i32 = 9999;

/// Why a month/year pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Month outside 1..=12.
    #[error("Month must be between 1 and 12.")]
    InvalidMonth,

    /// Year outside `MIN_YEAR..=MAX_YEAR`.
    #[error("Year must be between 1970 and 9999.")]
    InvalidYear,
}

/// A calendar month, e.g. 2025-03.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    /// Validates a year and a 1-based month.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError` if either part is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth);
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::InvalidYear);
        }
        Ok(Self { year, month })
    }

    /// The month `date` falls in.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1-based.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The month after this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The month `n` months before this one.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn months_back(&self, n: u32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) - n as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        // Month and year are validated or come from a real date.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Half-open date range `[first day, first day of next month)`.
    #[must_use]
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next().first_day())
    }
}

impl fmt::Display for MonthPeriod {
    /// Formats as `YYYY-MM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ym(year: i32, month: u32) -> MonthPeriod {
        MonthPeriod::new(year, month).unwrap()
    }

    #[rstest]
    #[case(2025, 0, PeriodError::InvalidMonth)]
    #[case(2025, 13, PeriodError::InvalidMonth)]
    #[case(1969, 5, PeriodError::InvalidYear)]
    #[case(10_000, 5, PeriodError::InvalidYear)]
    fn test_rejects_out_of_range(#[case] year: i32, #[case] month: u32, #[case] err: PeriodError) {
        assert_eq!(MonthPeriod::new(year, month), Err(err));
    }

    #[test]
    fn test_next_wraps_year() {
        assert_eq!(ym(2024, 12).next(), ym(2025, 1));
        assert_eq!(ym(2025, 3).next(), ym(2025, 4));
    }

    #[test]
    fn test_months_back_crosses_years() {
        assert_eq!(ym(2025, 3).months_back(5), ym(2024, 10));
        assert_eq!(ym(2025, 6).months_back(5), ym(2025, 1));
        assert_eq!(ym(2025, 1).months_back(0), ym(2025, 1));
        assert_eq!(ym(2025, 1).months_back(13), ym(2023, 12));
    }

    #[test]
    fn test_date_range_is_half_open_month() {
        let (from, to) = ym(2024, 2).date_range();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(ym(2025, 3).to_string(), "2025-03");
    }

    proptest! {
        #[test]
        fn test_months_back_then_forward_is_identity(
            year in 1980i32..9000,
            month in 1u32..=12,
            back in 0u32..=24,
        ) {
            let start = ym(year, month);
            let mut period = start.months_back(back);
            for _ in 0..back {
                period = period.next();
            }
            prop_assert_eq!(period, start);
        }
    }
}
