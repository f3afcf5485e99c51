use std::fmt;
use std::iter::successors;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month};

/// A year whose padded week grid fits within the range of [`Date`]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct CalendarYear(i32);

impl CalendarYear {
    pub(crate) const MIN: i32 = 1;
    pub(crate) const MAX: i32 = 9998;

    pub(crate) fn new(year: i32) -> Result<CalendarYear, YearError> {
        if (Self::MIN..=Self::MAX).contains(&year) {
            Ok(CalendarYear(year))
        } else {
            Err(YearError::OutOfRange(year))
        }
    }

    pub(crate) fn of(date: Date) -> Option<CalendarYear> {
        CalendarYear::new(date.year()).ok()
    }

    pub(crate) fn get(self) -> i32 {
        self.0
    }

    pub(crate) fn first_day(self) -> Date {
        Date::from_calendar_date(self.0, Month::January, 1)
            .expect("January 1 should exist for every CalendarYear")
    }

    pub(crate) fn last_day(self) -> Date {
        Date::from_calendar_date(self.0, Month::December, 31)
            .expect("December 31 should exist for every CalendarYear")
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.0
    }

    /// Iterate over every day of the year in chronological order
    pub(crate) fn days(self) -> impl Iterator<Item = Date> {
        successors(Some(self.first_day()), |d| d.next_day()).take_while(move |&d| self.contains(d))
    }

    pub(crate) fn previous(self) -> Option<CalendarYear> {
        CalendarYear::new(self.0 - 1).ok()
    }

    pub(crate) fn next(self) -> Option<CalendarYear> {
        CalendarYear::new(self.0 + 1).ok()
    }
}

impl fmt::Display for CalendarYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CalendarYear {
    type Err = YearError;

    fn from_str(s: &str) -> Result<CalendarYear, YearError> {
        CalendarYear::new(s.trim().parse::<i32>()?)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum YearError {
    #[error("invalid year: {0}")]
    Parse(#[from] ParseIntError),
    #[error("year {0} is outside the supported range 1..=9998")]
    OutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_bounds() {
        assert_eq!(CalendarYear::new(0), Err(YearError::OutOfRange(0)));
        assert_eq!(CalendarYear::new(9999), Err(YearError::OutOfRange(9999)));
        assert!(CalendarYear::new(1).is_ok());
        assert!(CalendarYear::new(9998).is_ok());
    }

    #[test]
    fn test_parse() {
        assert_eq!("2025".parse::<CalendarYear>(), Ok(CalendarYear(2025)));
        assert!(matches!(
            "twenty".parse::<CalendarYear>(),
            Err(YearError::Parse(_))
        ));
        assert_eq!(
            "-5".parse::<CalendarYear>(),
            Err(YearError::OutOfRange(-5))
        );
    }

    #[test]
    fn test_days_in_leap_year() {
        let year = CalendarYear(2024);
        let days = year.days().collect::<Vec<_>>();
        assert_eq!(days.len(), 366);
        assert_eq!(days.first(), Some(&date!(2024 - 01 - 01)));
        assert_eq!(days.last(), Some(&date!(2024 - 12 - 31)));
        assert!(days.contains(&date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_days_in_common_year() {
        assert_eq!(CalendarYear(2025).days().count(), 365);
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(CalendarYear(1).previous(), None);
        assert_eq!(CalendarYear(9998).next(), None);
        assert_eq!(CalendarYear(2025).next(), Some(CalendarYear(2026)));
    }
}
