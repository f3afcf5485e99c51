use crate::calendar::CellStyler;
use crate::level::Level;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const LABEL_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const SAMPLE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

/// Colors each day by its contribution level
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct LevelPalette;

impl CellStyler for LevelPalette {
    fn cell_style(&self, level: Level) -> Style {
        BASE_STYLE.fg(level.color())
    }
}
