mod grid;
mod state;
mod util;
mod widget;
pub(crate) use self::grid::ContributionGrid;
pub(crate) use self::state::{HeatmapState, Motion};
pub(crate) use self::widget::Heatmap;
use crate::level::Level;
use ratatui::style::Style;

pub(crate) trait CellStyler {
    fn cell_style(&self, level: Level) -> Style;
}
