use super::datemath::{WeekdayExt, WeekdayIter, DAYS_IN_WEEK};
use super::model::CalendarModel;
use super::{Clock, DateFormatter};
use crate::theme::{
    BASE_STYLE, CURSOR_STYLE, SELECTED_STYLE, SPILLOVER_STYLE, TITLE_STYLE, TODAY_STYLE,
    WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::Weekday;

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = 46;

/// Number of lines taken up by the month title, the weekday header, and its
/// rule
const HEADER_LINES: u16 = 3;

const TITLE_LINE: u16 = 0;

const WEEKDAY_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Column of a weekday's initial relative to the start of its days
const INITIAL_OFFSET: u16 = 2;

const ACS_HLINE: char = '─';

/// Position of a cell in a month's grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridPos {
    pub(crate) week: usize,
    pub(crate) weekday: Weekday,
}

/// Renders the month that a `CalendarModel` currently shows
#[derive(Debug)]
pub(crate) struct MonthView<'a, C, F> {
    model: &'a CalendarModel<C, F>,
    cursor: Option<GridPos>,
}

impl<'a, C, F> MonthView<'a, C, F> {
    pub(crate) fn new(model: &'a CalendarModel<C, F>) -> Self {
        MonthView {
            model,
            cursor: None,
        }
    }

    pub(crate) fn cursor(mut self, pos: GridPos) -> Self {
        self.cursor = Some(pos);
        self
    }
}

impl<C: Clock, F: DateFormatter> Widget for MonthView<'_, C, F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let area = Rect {
            x: area.x + left,
            width: area.width.min(MAIN_WIDTH),
            ..area
        };
        let model = self.model;
        let current = u8::from(model.month());
        let grid = model.grid();
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(format!("{} {}", model.month_label(), model.year()));
        canvas.draw_header(model.headers());
        for (i, row) in std::iter::zip(0u16.., grid.rows()) {
            let week = usize::from(i);
            for (wd, day) in row.enumerate() {
                let month = model.month_for_grid_cell(day, week);
                let is_today = model.is_today(day, month);
                let mut style = if month == current {
                    BASE_STYLE
                } else {
                    SPILLOVER_STYLE
                };
                if is_today {
                    style = style.patch(TODAY_STYLE);
                }
                if model.is_selected(day, week) {
                    style = style.patch(SELECTED_STYLE);
                }
                if self.cursor == Some(GridPos { week, weekday: wd }) {
                    style = style.patch(CURSOR_STYLE);
                }
                canvas.draw_day(i, wd, show_day(day, is_today), style);
            }
        }
        let weeks = u16::try_from(grid.rows().len()).unwrap_or(u16::MAX);
        canvas.draw_footer(weeks, format!("Selected: {}", model.selected_date()));
    }
}

fn show_day(day: u8, is_today: bool) -> String {
    if is_today {
        format!("[{day:2}]")
    } else {
        format!(" {day:2} ")
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

    fn draw_title(&mut self, title: String) {
        self.mvprint_centered(TITLE_LINE, title, TITLE_STYLE);
    }

    fn draw_header(&mut self, initials: [char; DAYS_IN_WEEK]) {
        for (wd, ch) in std::iter::zip(WeekdayIter::new(), initials) {
            self.mvprint(
                WEEKDAY_LINE,
                DAY_WIDTH * wd.index0() + INITIAL_OFFSET,
                ch.to_string(),
                WEEKDAY_STYLE,
            );
        }
        self.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: Weekday, s: String, style: Style) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * wd.index0(),
            s,
            style,
        );
    }

    fn draw_footer(&mut self, weeks: u16, s: String) {
        let y = weeks.saturating_mul(WEEK_LINES).saturating_add(HEADER_LINES);
        self.mvprint_centered(y, s, BASE_STYLE);
    }

    fn mvprint_centered(&mut self, y: u16, s: String, style: Style) {
        let width = u16::try_from(Line::raw(s.as_str()).width()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(y, x, s, style);
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
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

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}
