use crate::calendar::{CalendarModel, Clock, DateFormatter, GridPos, MonthView};
use crate::help::Help;
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use time::Weekday::{Saturday, Sunday};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C, F> {
    model: CalendarModel<C, F>,
    cursor: GridPos,
    state: AppState,
}

impl<C: Clock, F: DateFormatter> App<C, F> {
    pub(crate) fn new(model: CalendarModel<C, F>) -> App<C, F> {
        let mut app = App {
            model,
            cursor: GridPos {
                week: 0,
                weekday: Sunday,
            },
            state: AppState::Calendar,
        };
        app.sync_cursor();
        app
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
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

    // Returns `false` if the user pressed an invalid key or the requested
    // move is impossible
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.cursor_left(),
                KeyCode::Char('l') | KeyCode::Right => self.cursor_right(),
                KeyCode::Char('k') | KeyCode::Up => self.cursor_up(),
                KeyCode::Char('j') | KeyCode::Down => self.cursor_down(),
                KeyCode::Enter | KeyCode::Char(' ') => self.select(),
                KeyCode::Char('p') | KeyCode::PageUp => {
                    self.navigate(|model| model.back_month().is_ok())
                }
                KeyCode::Char('n') | KeyCode::PageDown => {
                    self.navigate(|model| model.next_month().is_ok())
                }
                KeyCode::Char('[' | 'P') => self.navigate(CalendarModel::back_year),
                KeyCode::Char(']' | 'N') => self.navigate(CalendarModel::next_year),
                KeyCode::Char('0') | KeyCode::Home => self.navigate(|model| {
                    model.jump_to_today();
                    true
                }),
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
                self.state = AppState::Calendar;
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

    fn navigate<G>(&mut self, op: G) -> bool
    where
        G: FnOnce(&mut CalendarModel<C, F>) -> bool,
    {
        let moved = op(&mut self.model);
        if moved {
            self.sync_cursor();
        }
        moved
    }

    // Puts the cursor on the selected day if it's visible, otherwise keeps it
    // within the grid
    fn sync_cursor(&mut self) {
        let grid = self.model.grid();
        let selected_day = self.model.selected_day();
        for (week, row) in grid.rows().iter().enumerate() {
            for (weekday, day) in row.enumerate() {
                if day == selected_day && self.model.is_selected(day, week) {
                    self.cursor = GridPos { week, weekday };
                    return;
                }
            }
        }
        self.cursor.week = self.cursor.week.min(grid.rows().len().saturating_sub(1));
    }

    fn cursor_left(&mut self) -> bool {
        if self.cursor.weekday == Sunday {
            false
        } else {
            self.cursor.weekday = self.cursor.weekday.previous();
            true
        }
    }

    fn cursor_right(&mut self) -> bool {
        if self.cursor.weekday == Saturday {
            false
        } else {
            self.cursor.weekday = self.cursor.weekday.next();
            true
        }
    }

    fn cursor_up(&mut self) -> bool {
        if self.cursor.week == 0 {
            false
        } else {
            self.cursor.week -= 1;
            true
        }
    }

    fn cursor_down(&mut self) -> bool {
        if self.cursor.week + 1 < self.model.grid().rows().len() {
            self.cursor.week += 1;
            true
        } else {
            false
        }
    }

    fn select(&mut self) -> bool {
        let grid = self.model.grid();
        let Some(row) = grid.rows().get(self.cursor.week) else {
            return false;
        };
        let day = row[self.cursor.weekday];
        let week = self.cursor.week;
        self.navigate(|model| model.select_date(day, week).is_ok())
    }
}

impl<C: Clock, F: DateFormatter> Widget for &App<C, F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        MonthView::new(&self.model)
            .cursor(self.cursor)
            .render(area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use crate::locale::Locale;
    use time::macros::{date, datetime};
    use time::Month::*;
    use time::Weekday::*;

    fn app_at(date: time::Date) -> App<FixedClock, Locale> {
        let model = CalendarModel::new(FixedClock(datetime!(2024-05-15 13:45)), Locale::English)
            .start_date(date)
            .unwrap();
        App::new(model)
    }

    #[test]
    fn test_cursor_starts_on_selection() {
        let app = app_at(date!(2024 - 05 - 15));
        assert_eq!(
            app.cursor,
            GridPos {
                week: 2,
                weekday: Wednesday
            }
        );
    }

    #[test]
    fn test_cursor_bounds() {
        let mut app = app_at(date!(2024 - 05 - 04));
        assert_eq!(
            app.cursor,
            GridPos {
                week: 0,
                weekday: Saturday
            }
        );
        assert!(!app.handle_key(KeyCode::Right));
        assert!(!app.handle_key(KeyCode::Char('k')));
        assert!(app.handle_key(KeyCode::Left));
        assert_eq!(app.cursor.weekday, Friday);
        for _ in 0..4 {
            assert!(app.handle_key(KeyCode::Down));
        }
        assert!(!app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.cursor.week, 4);
    }

    #[test]
    fn test_select_spill_over() {
        let mut app = app_at(date!(2024 - 05 - 15));
        app.cursor = GridPos {
            week: 0,
            weekday: Sunday,
        };
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.model.month(), April);
        assert_eq!(app.model.selected_date(), date!(2024 - 04 - 28).into());
        // April 28th is in the last row of April's grid
        assert_eq!(
            app.cursor,
            GridPos {
                week: 4,
                weekday: Sunday
            }
        );
    }

    #[test]
    fn test_month_keys() {
        let mut app = app_at(date!(2024 - 01 - 15));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!((app.model.month(), app.model.year()), (December, 2023));
        assert!(app.handle_key(KeyCode::PageDown));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!((app.model.month(), app.model.year()), (February, 2024));
    }

    #[test]
    fn test_year_keys() {
        let mut app = app_at(date!(1901 - 06 - 15));
        assert!(app.handle_key(KeyCode::Char('[')));
        assert_eq!(app.model.year(), 1900);
        assert!(!app.handle_key(KeyCode::Char('P')));
        assert_eq!(app.model.year(), 1900);
        assert!(app.handle_key(KeyCode::Char(']')));
        assert!(app.handle_key(KeyCode::Char('N')));
        assert_eq!(app.model.year(), 1902);
    }

    #[test]
    fn test_cursor_clamped_after_navigation() {
        // March 2024 has six rows, February 2024 five
        let mut app = app_at(date!(2024 - 03 - 31));
        assert_eq!(app.cursor.week, 5);
        assert!(app.handle_key(KeyCode::PageUp));
        assert_eq!(app.model.month(), February);
        assert_eq!(
            app.cursor,
            GridPos {
                week: 4,
                weekday: Sunday
            }
        );
    }

    #[test]
    fn test_cursor_follows_visible_selection() {
        let mut app = app_at(date!(2024 - 03 - 31));
        assert!(app.handle_key(KeyCode::PageDown));
        assert_eq!(app.model.month(), April);
        // March 31st starts April's first row
        assert_eq!(
            app.cursor,
            GridPos {
                week: 0,
                weekday: Sunday
            }
        );
    }

    #[test]
    fn test_jump_to_today_key() {
        let mut app = app_at(date!(2020 - 02 - 02));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!((app.model.month(), app.model.year()), (May, 2024));
        assert_eq!(
            app.cursor,
            GridPos {
                week: 2,
                weekday: Wednesday
            }
        );
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app_at(date!(2024 - 05 - 15));
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }

    #[test]
    fn test_render_app() {
        let app = app_at(date!(2024 - 05 - 15));
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        let title = (0..area.width)
            .map(|x| buffer[(x, 0)].symbol().to_owned())
            .collect::<String>();
        assert_eq!(title.trim(), "May 2024");
        assert_eq!(buffer[(0, 23)].bg, BASE_STYLE.bg.unwrap());
    }
}
