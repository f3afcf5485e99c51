use super::grid::ContributionGrid;
use crate::dataset::ContributionDay;
use crate::github::UserStats;
use crate::loader::{Loaded, RequestKey};
use crate::year::CalendarYear;
use thiserror::Error;
use time::{Date, Weekday};
use tracing::debug;

/// Everything the heatmap widget draws, plus the cursor
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HeatmapState {
    today: Date,
    wanted: RequestKey,
    view: Option<View>,
    cursor: Cursor,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct View {
    pub(super) grid: ContributionGrid,
    pub(super) stats: UserStats,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Cursor {
    pub(super) week: usize,
    pub(super) weekday: Weekday,
}

impl HeatmapState {
    pub(crate) fn new(today: Date, wanted: RequestKey) -> Self {
        HeatmapState {
            today,
            wanted,
            view: None,
            cursor: Cursor {
                week: 0,
                weekday: Weekday::Sunday,
            },
        }
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn wanted(&self) -> &RequestKey {
        &self.wanted
    }

    pub(crate) fn year(&self) -> CalendarYear {
        self.wanted.year
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.view.is_none()
    }

    pub(super) fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub(super) fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Switch to a different year.  The current data is dropped, and the
    /// returned key should be handed to the loader.  Returns `None` if the
    /// year is already shown or already being fetched.
    pub(crate) fn set_year(&mut self, year: CalendarYear) -> Option<RequestKey> {
        if year == self.wanted.year {
            return None;
        }
        self.wanted.year = year;
        self.view = None;
        Some(self.wanted.clone())
    }

    /// Apply a fetch result.  Returns `false` if the result was for a request
    /// that is no longer wanted, or if the wanted data is already shown.
    pub(crate) fn accept(&mut self, loaded: Loaded) -> bool {
        if loaded.key != self.wanted {
            debug!(stale = ?loaded.key, wanted = ?self.wanted, "discarding stale contributions");
            return false;
        }
        if self.view.is_some() {
            debug!(key = ?loaded.key, "discarding duplicate contributions");
            return false;
        }
        let grid = ContributionGrid::build(loaded.key.year, &loaded.dataset);
        self.cursor = initial_cursor(&grid, self.today);
        self.view = Some(View {
            grid,
            stats: loaded.stats,
        });
        true
    }

    pub(crate) fn selected(&self) -> Option<&ContributionDay> {
        self.view
            .as_ref()?
            .grid
            .get(self.cursor.week, self.cursor.weekday)
    }

    pub(crate) fn move_cursor(&mut self, motion: Motion) -> Result<(), CursorError> {
        let weeks = self
            .view
            .as_ref()
            .map_or(0, |v| v.grid.weeks.len());
        if weeks == 0 {
            return Err(CursorError);
        }
        let Cursor { week, weekday } = self.cursor;
        self.cursor = match motion {
            Motion::PreviousWeek if week > 0 => Cursor {
                week: week - 1,
                weekday,
            },
            Motion::NextWeek if week + 1 < weeks => Cursor {
                week: week + 1,
                weekday,
            },
            Motion::PreviousDay if weekday != Weekday::Sunday => Cursor {
                week,
                weekday: weekday.previous(),
            },
            Motion::NextDay if weekday != Weekday::Saturday => Cursor {
                week,
                weekday: weekday.next(),
            },
            _ => return Err(CursorError),
        };
        Ok(())
    }
}

// Start on today if it is shown, otherwise on the first day of the year
fn initial_cursor(grid: &ContributionGrid, today: Date) -> Cursor {
    let date = if grid.year.contains(today) {
        today
    } else {
        grid.year.first_day()
    };
    grid.position_of(date)
        .map_or(
            Cursor {
                week: 0,
                weekday: Weekday::Sunday,
            },
            |(week, weekday)| Cursor { week, weekday },
        )
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Motion {
    PreviousWeek,
    NextWeek,
    PreviousDay,
    NextDay,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("cursor cannot move any further")]
pub(crate) struct CursorError;
