use super::CellStyler;
use super::state::HeatmapState;
use super::util::WeekdayExt;
use crate::dataset::Origin;
use crate::github::UserStats;
use crate::level::Level;
use crate::theme::{BASE_STYLE, CURSOR_MODIFIER, LABEL_STYLE, SAMPLE_STYLE, TITLE_STYLE};
use crate::year::CalendarYear;
use ratatui::{prelude::*, widgets::*};
use time::{
    Month,
    Weekday::{self, Friday, Monday, Wednesday},
};

/// Number of columns on the left side of the grid, used as the margin in
/// which weekday initials are written
const LEFT_MARGIN: u16 = 2;

const TITLE_ROW: u16 = 0;

const STATS_ROW: u16 = 1;

const MONTH_ROW: u16 = 2;

/// Row on which the Sunday of each week is drawn; the other days follow
/// below it
const GRID_TOP: u16 = 3;

const LEGEND_ROW: u16 = 11;

const STATUS_ROW: u16 = 12;

/// Columns taken up by "Less " in the legend
const LEGEND_LEAD: u16 = 5;

const FILLED: &str = "■";

const EMPTY_CURSOR: &str = "□";

static MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static DAY_LABELS: [(Weekday, &str); 3] = [(Monday, "M"), (Wednesday, "W"), (Friday, "F")];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Heatmap<S> {
    styler: S,
}

impl<S> Heatmap<S> {
    pub(crate) fn new(styler: S) -> Heatmap<S> {
        Heatmap { styler }
    }
}

impl<S: CellStyler> StatefulWidget for Heatmap<S> {
    type State = HeatmapState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let Some(view) = state.view() else {
            let key = state.wanted();
            BufferCanvas::new(area, buf).mvprint(
                TITLE_ROW,
                0,
                format!("Loading contributions for {} in {}…", key.username, key.year),
                Some(LABEL_STYLE),
            );
            return;
        };
        let grid = &view.grid;
        let week_qty = u16::try_from(grid.weeks.len()).unwrap_or(u16::MAX);
        // Use a gap between weeks when there is room for one
        let cell_width = if LEFT_MARGIN.saturating_add(week_qty.saturating_mul(2)) <= area.width {
            2
        } else {
            1
        };
        let width = LEFT_MARGIN
            .saturating_add(week_qty.saturating_mul(cell_width))
            .min(area.width);
        let area = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(grid.total_contributions, grid.year, grid.origin);
        canvas.draw_stats(view.stats);
        for (i, month) in grid.month_starts() {
            if let Ok(i) = u16::try_from(i) {
                canvas.draw_month(i * cell_width, month);
            }
        }
        canvas.draw_day_labels();
        let cursor = state.cursor();
        for (i, week) in std::iter::zip(0u16.., &grid.weeks) {
            for (wd, day) in week.enumerate() {
                let selected = cursor.week == usize::from(i) && cursor.weekday == wd;
                let (glyph, style) = match (day.is_padding(), selected) {
                    (true, false) => (" ", BASE_STYLE),
                    (true, true) => (EMPTY_CURSOR, BASE_STYLE.add_modifier(CURSOR_MODIFIER)),
                    (false, false) => (FILLED, self.styler.cell_style(day.level)),
                    (false, true) => (
                        FILLED,
                        self.styler
                            .cell_style(day.level)
                            .add_modifier(CURSOR_MODIFIER),
                    ),
                };
                canvas.draw_cell(i * cell_width, wd, glyph, style);
            }
        }
        canvas.draw_legend(&self.styler);
        if let Some(day) = state.selected() {
            canvas.draw_status(day.describe());
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, total: u32, year: CalendarYear, origin: Origin) {
        let title = if total == 1 {
            format!("1 contribution in {year}")
        } else {
            format!("{total} contributions in {year}")
        };
        let width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        self.mvprint(TITLE_ROW, 0, &title, Some(TITLE_STYLE));
        if origin == Origin::Sample {
            self.mvprint(
                TITLE_ROW,
                width.saturating_add(1),
                "(sample data)",
                Some(SAMPLE_STYLE),
            );
        }
    }

    fn draw_stats(&mut self, stats: UserStats) {
        self.mvprint(
            STATS_ROW,
            0,
            format!(
                "{} repos · {} followers · {} following",
                stats.public_repos, stats.followers, stats.following
            ),
            Some(LABEL_STYLE),
        );
    }

    // `x` is the column of the week, relative to the left edge of the grid
    fn draw_month(&mut self, x: u16, month: Month) {
        let label = MONTH_ABBREVS[usize::from(u8::from(month) - 1)];
        self.mvprint(MONTH_ROW, LEFT_MARGIN + x, label, Some(LABEL_STYLE));
    }

    fn draw_day_labels(&mut self) {
        for (wd, label) in DAY_LABELS {
            self.mvprint(GRID_TOP + wd.index0(), 0, label, Some(LABEL_STYLE));
        }
    }

    fn draw_cell(&mut self, x: u16, wd: Weekday, glyph: &str, style: Style) {
        self.mvprint(GRID_TOP + wd.index0(), LEFT_MARGIN + x, glyph, Some(style));
    }

    fn draw_legend<S: CellStyler>(&mut self, styler: &S) {
        self.mvprint(LEGEND_ROW, LEFT_MARGIN, "Less", Some(LABEL_STYLE));
        let mut x = LEFT_MARGIN + LEGEND_LEAD;
        for level in Level::ALL {
            self.mvprint(LEGEND_ROW, x, FILLED, Some(styler.cell_style(level)));
            x += 2;
        }
        self.mvprint(LEGEND_ROW, x, "More", Some(LABEL_STYLE));
    }

    fn draw_status(&mut self, text: String) {
        self.mvprint(STATUS_ROW, LEFT_MARGIN, text, Some(BASE_STYLE));
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // heatmap's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}
