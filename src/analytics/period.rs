//! Calendar months used to bucket transactions and budgets.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The years `time::Date` can represent.
const YEARS: std::ops::RangeInclusive<i32> = -9999..=9999;

/// A calendar month of a particular year.
///
/// `month` is zero-based (0 is January) to match how budgets are stored.
/// Periods order chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u8,
}

impl Period {
    /// Create a period, checking that `month` is in 0..=11 and `year` is in
    /// -9999..=9999.
    ///
    /// # Errors
    /// Returns [Error::Validation] if `year` or `month` is out of range.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !YEARS.contains(&year) {
            return Err(Error::Validation(format!(
                "Year must be between {} and {}, got {year}",
                YEARS.start(),
                YEARS.end()
            )));
        }

        if month > 11 {
            return Err(Error::Validation(format!(
                "Month must be between 0 and 11, got {month}"
            )));
        }

        Ok(Self { year, month })
    }

    /// The period that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()) - 1,
        }
    }

    /// The month before this one. The month before January is December of
    /// the previous year.
    pub fn previous(self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after this one. The month after December is January of the
    /// next year.
    pub fn next(self) -> Self {
        if self.month == 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whether `date` falls in this period.
    pub fn contains(self, date: Date) -> bool {
        Period::of(date) == self
    }

    /// The full month name, e.g. "March".
    pub fn month_name(self) -> &'static str {
        month_name(self.month)
    }

    /// A label like "March 2024".
    pub fn label(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

/// The `year` and zero-based `month` query parameters of the pages and API
/// routes that show one month.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

impl PeriodQuery {
    /// The requested period, with missing parameters taken from `current`.
    ///
    /// # Errors
    /// Returns [Error::Validation] if the year or month is out of range.
    pub fn resolve(self, current: Period) -> Result<Period, Error> {
        Period::new(
            self.year.unwrap_or(current.year),
            self.month.unwrap_or(current.month),
        )
    }
}

/// The full name of the zero-based `month`, e.g. 0 is "January".
///
/// Out of range months are clamped to December.
pub fn month_name(month: u8) -> &'static str {
    MONTH_NAMES[usize::from(month.min(11))]
}

/// The three letter abbreviation of the zero-based `month`, e.g. "Jan".
pub fn month_abbreviation(month: u8) -> &'static str {
    &month_name(month)[..3]
}
