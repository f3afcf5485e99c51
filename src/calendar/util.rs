use crate::dataset::ContributionDay;
use serde::Serialize;
use std::iter::successors;
use time::{Date, Weekday, Weekday::*};

pub(super) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// Seven consecutive cells, Sunday through Saturday
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Week([ContributionDay; DAYS_IN_WEEK]);

impl Week {
    // Fills the week from Sunday onwards; missing trailing cells are padding
    pub(super) fn from_days(days: &[ContributionDay]) -> Week {
        assert!(
            days.len() <= DAYS_IN_WEEK,
            "a week cannot hold more than seven days"
        );
        let mut cells = [ContributionDay::PADDING; DAYS_IN_WEEK];
        for (cell, day) in std::iter::zip(&mut cells, days) {
            *cell = *day;
        }
        Week(cells)
    }

    pub(crate) fn get(&self, wd: Weekday) -> &ContributionDay {
        &self.0[usize::from(wd.index0())]
    }

    pub(crate) fn enumerate(&self) -> EnumerateWeek<'_> {
        EnumerateWeek::new(self)
    }

    #[cfg(test)]
    pub(crate) fn days(&self) -> &[ContributionDay; DAYS_IN_WEEK] {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EnumerateWeek<'a> {
    week: &'a Week,
    next_weekday: Option<Weekday>,
}

impl<'a> EnumerateWeek<'a> {
    fn new(week: &'a Week) -> Self {
        EnumerateWeek {
            week,
            next_weekday: Some(Sunday),
        }
    }
}

impl<'a> Iterator for EnumerateWeek<'a> {
    type Item = (Weekday, &'a ContributionDay);

    fn next(&mut self) -> Option<(Weekday, &'a ContributionDay)> {
        let wd = self.next_weekday?;
        self.next_weekday = match wd.next() {
            Sunday => None,
            wd2 => Some(wd2),
        };
        Some((wd, self.week.get(wd)))
    }
}

pub(super) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}
