//! Fiscal calendar
//!
//! A lodge's dues year runs from July through June. Every dues slot is a
//! calendar month; the fiscal window maps positions 0-11 onto those months.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month in which every fiscal year starts
pub const FISCAL_START_MONTH: u32 = 7;

/// Number of monthly slots in one fiscal year
pub const FISCAL_MONTHS: usize = 12;

/// Map a fiscal month index to its calendar month and year.
///
/// Indices 0-5 are July-December of `current_year`; 6-11 are January-June of
/// `next_year`.
///
/// # Panics
///
/// Panics if `fiscal_index` is 12 or more.
pub fn month_year_for_index(fiscal_index: usize, current_year: i32, next_year: i32) -> DuesMonth {
    assert!(
        fiscal_index < FISCAL_MONTHS,
        "fiscal index out of range: {}",
        fiscal_index
    );

    let month = (FISCAL_START_MONTH - 1 + fiscal_index as u32) % 12 + 1;
    let year = if month >= FISCAL_START_MONTH {
        current_year
    } else {
        next_year
    };
    DuesMonth { year, month }
}

/// A calendar month (e.g., "2025-08") identifying one dues slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuesMonth {
    pub year: i32,
    pub month: u32,
}

impl DuesMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Month containing a date
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Short English month name ("Jul", "Aug", ...)
    pub fn short_name(&self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES
            .get((self.month as usize).wrapping_sub(1))
            .copied()
            .unwrap_or("???")
    }

    /// Parse "YYYY-MM"
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError::InvalidFormat(s.to_string()))?;

        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        if !(1..=12).contains(&month) {
            return Err(MonthParseError::InvalidMonth(month));
        }

        Ok(Self { year, month })
    }
}

impl fmt::Display for DuesMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthParseError::InvalidFormat(s) => {
                write!(f, "Invalid month format: {} (expected YYYY-MM)", s)
            }
            MonthParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for MonthParseError {}

/// The twelve months of one fiscal year, July of `current_year` through June
/// of `next_year`
///
/// Derived on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FiscalYearWindow {
    current_year: i32,
}

impl FiscalYearWindow {
    /// Window starting in July of `current_year`
    pub fn starting(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Window that contains the given month
    pub fn containing(month: DuesMonth) -> Self {
        if month.month >= FISCAL_START_MONTH {
            Self::starting(month.year)
        } else {
            Self::starting(month.year - 1)
        }
    }

    /// Window that contains the given date
    pub fn for_date(date: NaiveDate) -> Self {
        Self::containing(DuesMonth::from_date(date))
    }

    /// Window that contains today (local time)
    pub fn current() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn next_year(&self) -> i32 {
        self.current_year + 1
    }

    /// Month at a fiscal index (0-11)
    ///
    /// # Panics
    ///
    /// Panics if `index` is 12 or more.
    pub fn month_at(&self, index: usize) -> DuesMonth {
        month_year_for_index(index, self.current_year, self.next_year())
    }

    /// Fiscal index of a month, or `None` if the month is outside this window
    pub fn index_of(&self, month: DuesMonth) -> Option<usize> {
        if !month.is_valid() {
            return None;
        }
        (0..FISCAL_MONTHS).find(|&i| self.month_at(i) == month)
    }

    pub fn contains(&self, month: DuesMonth) -> bool {
        self.index_of(month).is_some()
    }

    /// All twelve months in fiscal order
    pub fn months(&self) -> impl Iterator<Item = DuesMonth> + '_ {
        (0..FISCAL_MONTHS).map(move |i| self.month_at(i))
    }

    /// Parse "2025" or "2025-2026"
    pub fn parse(s: &str) -> Result<Self, MonthParseError> {
        let s = s.trim();
        let (first, second) = match s.split_once('-') {
            Some((a, b)) => (a, Some(b)),
            None => (s, None),
        };

        let current: i32 = first
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        if let Some(second) = second {
            let next: i32 = second
                .parse()
                .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
            if next != current + 1 {
                return Err(MonthParseError::InvalidFormat(s.to_string()));
            }
        }

        Ok(Self::starting(current))
    }
}

impl fmt::Display for FiscalYearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.current_year, self.next_year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_bounds() {
        assert_eq!(month_year_for_index(0, 2025, 2026), DuesMonth::new(2025, 7));
        assert_eq!(month_year_for_index(5, 2025, 2026), DuesMonth::new(2025, 12));
        assert_eq!(month_year_for_index(6, 2025, 2026), DuesMonth::new(2026, 1));
        assert_eq!(month_year_for_index(11, 2025, 2026), DuesMonth::new(2026, 6));
    }

    #[test]
    #[should_panic(expected = "fiscal index out of range")]
    fn test_index_out_of_range_panics() {
        month_year_for_index(12, 2025, 2026);
    }

    #[test]
    fn test_window_is_bijection() {
        let window = FiscalYearWindow::starting(2025);
        let months: HashSet<_> = window.months().collect();
        assert_eq!(months.len(), 12);
        for (i, month) in window.months().enumerate() {
            assert_eq!(window.index_of(month), Some(i));
        }
    }

    #[test]
    fn test_containing() {
        assert_eq!(
            FiscalYearWindow::containing(DuesMonth::new(2025, 7)),
            FiscalYearWindow::starting(2025)
        );
        assert_eq!(
            FiscalYearWindow::containing(DuesMonth::new(2026, 6)),
            FiscalYearWindow::starting(2025)
        );
        assert_eq!(
            FiscalYearWindow::containing(DuesMonth::new(2026, 7)),
            FiscalYearWindow::starting(2026)
        );
    }

    #[test]
    fn test_index_of_outside_window() {
        let window = FiscalYearWindow::starting(2025);
        assert_eq!(window.index_of(DuesMonth::new(2025, 6)), None);
        assert_eq!(window.index_of(DuesMonth::new(2026, 7)), None);
        assert_eq!(window.index_of(DuesMonth::new(2025, 13)), None);
    }

    #[test]
    fn test_month_parse_and_display() {
        let month = DuesMonth::parse("2025-08").unwrap();
        assert_eq!(month, DuesMonth::new(2025, 8));
        assert_eq!(month.to_string(), "2025-08");
        assert_eq!(month.short_name(), "Aug");
        assert_eq!(
            DuesMonth::parse("2025-13"),
            Err(MonthParseError::InvalidMonth(13))
        );
        assert!(DuesMonth::parse("August").is_err());
    }

    #[test]
    fn test_window_parse_and_display() {
        let window = FiscalYearWindow::parse("2025-2026").unwrap();
        assert_eq!(window, FiscalYearWindow::starting(2025));
        assert_eq!(window.to_string(), "2025-2026");
        assert_eq!(FiscalYearWindow::parse("2024").unwrap().next_year(), 2025);
        assert!(FiscalYearWindow::parse("2025-2027").is_err());
    }

    proptest! {
        #[test]
        fn prop_index_round_trips(year in 1900i32..2200, index in 0usize..12) {
            let window = FiscalYearWindow::starting(year);
            let month = window.month_at(index);
            prop_assert!(month.is_valid());
            prop_assert_eq!(window.index_of(month), Some(index));
            prop_assert_eq!(FiscalYearWindow::containing(month), window);
        }
    }
}
