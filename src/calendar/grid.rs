use super::util::{DAYS_IN_WEEK, Week, WeekdayExt, iter_days_from};
use crate::dataset::{ContributionDataset, ContributionDay, Origin};
use crate::year::CalendarYear;
use serde::Serialize;
use std::collections::HashMap;
use time::{Date, Duration, Month, Weekday};

/// A year of contributions laid out as Sunday-aligned weeks, ready to draw
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct ContributionGrid {
    #[serde(serialize_with = "serialize_year")]
    pub(crate) year: CalendarYear,
    pub(crate) total_contributions: u32,
    pub(crate) origin: Origin,
    #[serde(skip)]
    grid_start: Date,
    pub(crate) weeks: Vec<Week>,
}

impl ContributionGrid {
    pub(crate) fn build(year: CalendarYear, dataset: &ContributionDataset) -> ContributionGrid {
        // Later entries for the same date replace earlier ones
        let lookup = dataset
            .contributions
            .iter()
            .filter_map(|day| day.date.map(|d| (d, *day)))
            .collect::<HashMap<_, _>>();
        let first = year.first_day();
        let grid_start = first - Duration::days(first.weekday().index0().into());
        let last = year.last_day();
        let grid_end = last + Duration::days((6 - last.weekday().index0()).into());
        let mut weeks = Vec::with_capacity(54);
        let mut current = Vec::with_capacity(DAYS_IN_WEEK);
        for date in iter_days_from(grid_start).take_while(|&d| d <= grid_end) {
            current.push(
                lookup
                    .get(&date)
                    .copied()
                    .unwrap_or(ContributionDay::PADDING),
            );
            if current.len() == DAYS_IN_WEEK {
                weeks.push(Week::from_days(&current));
                current.clear();
            }
        }
        if !current.is_empty() {
            weeks.push(Week::from_days(&current));
        }
        ContributionGrid {
            year,
            total_contributions: dataset.total_contributions,
            origin: dataset.origin,
            grid_start,
            weeks,
        }
    }

    /// The calendar date of the Sunday that begins week `i`, whether or not
    /// that cell carries data
    pub(crate) fn week_start(&self, i: usize) -> Option<Date> {
        let offset = i64::try_from(i.checked_mul(DAYS_IN_WEEK)?).ok()?;
        self.grid_start.checked_add(Duration::days(offset))
    }

    pub(crate) fn get(&self, week: usize, wd: Weekday) -> Option<&ContributionDay> {
        self.weeks.get(week).map(|w| w.get(wd))
    }

    pub(crate) fn position_of(&self, date: Date) -> Option<(usize, Weekday)> {
        let days = (date - self.grid_start).whole_days();
        let week = usize::try_from(days).ok()? / DAYS_IN_WEEK;
        (week < self.weeks.len()).then_some((week, date.weekday()))
    }

    /// Week columns on which a month of the display year begins
    pub(crate) fn month_starts(&self) -> Vec<(usize, Month)> {
        (0..self.weeks.len())
            .filter_map(|i| {
                let start = self.week_start(i)?;
                iter_days_from(start)
                    .take(DAYS_IN_WEEK)
                    .find(|d| d.day() == 1 && self.year.contains(*d))
                    .map(|d| (i, d.month()))
            })
            .collect()
    }
}

fn serialize_year<S: serde::Serializer>(
    year: &CalendarYear,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i32(year.get())
}
