use crate::calendar::{CellStyler, Heatmap, HeatmapState, Motion};
use crate::help::Help;
use crate::loader::Loader;
use crate::theme::BASE_STYLE;
use crate::year::CalendarYear;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, poll, read};
use ratatui::{
    Terminal,
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
};
use std::io::{self, Write};
use std::time::Duration;

/// How long to wait for a key before checking for fetched data
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub(crate) struct App<S> {
    heatmap: HeatmapState,
    loader: Loader,
    styler: S,
    this_year: CalendarYear,
    state: AppState,
}

impl<S: CellStyler + Copy> App<S> {
    pub(crate) fn new(heatmap: HeatmapState, loader: Loader, styler: S) -> App<S> {
        loader.request(heatmap.wanted().clone());
        let this_year = CalendarYear::of(heatmap.today()).unwrap_or_else(|| heatmap.year());
        App {
            heatmap,
            loader,
            styler,
            this_year,
            state: AppState::Heatmap,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.receive();
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    // Stale results are dropped by the heatmap itself
    fn receive(&mut self) {
        while let Some(loaded) = self.loader.try_recv() {
            self.heatmap.accept(loaded);
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if !poll(POLL_INTERVAL)? {
            return Ok(());
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Heatmap => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(Motion::PreviousWeek),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(Motion::NextWeek),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(Motion::PreviousDay),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(Motion::NextDay),
                KeyCode::Char('[') => self.show_year(self.heatmap.year().previous()),
                KeyCode::Char(']') => self.show_year(self.heatmap.year().next()),
                KeyCode::Char('0') | KeyCode::Home => self.show_year(Some(self.this_year)),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Heatmap;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_cursor(&mut self, motion: Motion) -> bool {
        self.heatmap.move_cursor(motion).is_ok()
    }

    fn show_year(&mut self, year: Option<CalendarYear>) -> bool {
        let Some(year) = year else {
            return false;
        };
        if let Some(key) = self.heatmap.set_year(year) {
            self.loader.request(key);
        }
        true
    }
}

impl<S: CellStyler + Copy> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Heatmap::new(self.styler).render(area, buf, &mut self.heatmap);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Heatmap,
    Helping,
    Quitting,
}
