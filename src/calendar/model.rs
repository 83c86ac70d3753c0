use super::clock::Clock;
use super::datemath::{
    at_midnight, last_day_of_month, make_date, next_week, title_case, week_dates, week_from,
    CalendarDate, OutOfTimeError, WeekRow, DAYS_IN_WEEK,
};
use super::DateFormatter;
use time::{
    Date,
    Month::{self, December, January},
};

/// Lowest year that `back_year()` will go to
pub(crate) const MIN_YEAR: i32 = 1900;

/// Highest year that `next_year()` will go to
pub(crate) const MAX_YEAR: i32 = 3000;

/// Range of years whose grids, spill-over days included, can be represented
/// by `time::Date`.  Month navigation and selection refuse to leave it.
const FIRST_GRID_YEAR: i32 = Date::MIN.year() + 1;
const LAST_GRID_YEAR: i32 = Date::MAX.year() - 1;

/// Day of the month whose week is used for the weekday headers
const HEADER_ANCHOR_DAY: i32 = 15;

/// Number of week rows every grid has; a sixth is added when the last day of
/// the month doesn't fit
const BASE_WEEKS: usize = 5;

const MAX_WEEKS: usize = 6;

/// The week rows for displaying a month, including days from the previous
/// and next months needed to fill out the first and last rows
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarGrid(Vec<WeekRow>);

impl CalendarGrid {
    pub(crate) fn rows(&self) -> &[WeekRow] {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarModel<C, F> {
    clock: C,
    formatter: F,
    month: Month,
    year: i32,
    selected_day: u8,
    selected_date: CalendarDate,
    headers: [char; DAYS_IN_WEEK],
}

impl<C: Clock, F: DateFormatter> CalendarModel<C, F> {
    /// # Panics
    ///
    /// Panics if the week around the 15th of the clock's current month cannot
    /// be represented by `time::Date`.  Every date a `Clock` can return lies
    /// at least a year inside that range, so this does not happen.
    pub(crate) fn new(clock: C, formatter: F) -> Self {
        let today = at_midnight(clock.now());
        let headers = week_dates(HEADER_ANCHOR_DAY, today.month(), today.year())
            .expect("the week around the 15th of a real month is always representable")
            .map(|date| formatter.weekday_initial(date.weekday()));
        log::info!("today is {today}");
        CalendarModel {
            clock,
            formatter,
            month: today.month(),
            year: today.year(),
            selected_day: today.day(),
            selected_date: today,
            headers,
        }
    }

    /// Show & select `date` instead of today
    pub(crate) fn start_date(mut self, date: Date) -> Result<Self, OutOfTimeError> {
        let year = check_grid_year(date.year())?;
        self.month = date.month();
        self.year = year;
        self.selected_day = date.day();
        self.selected_date = date.into();
        log::debug!("starting at {}", self.selected_date);
        Ok(self)
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn selected_day(&self) -> u8 {
        self.selected_day
    }

    pub(crate) fn selected_date(&self) -> CalendarDate {
        self.selected_date
    }

    /// Uppercase initials of the weekdays, Sunday first.  These are computed
    /// once from the current real-world month and do not follow navigation.
    pub(crate) fn headers(&self) -> [char; DAYS_IN_WEEK] {
        self.headers
    }

    pub(crate) fn month_label(&self) -> String {
        title_case(&self.formatter.month_name(self.month))
    }

    pub(crate) fn back_month(&mut self) -> Result<(), OutOfTimeError> {
        let year = if self.month == January {
            check_grid_year(self.year - 1)?
        } else {
            self.year
        };
        self.month = self.month.previous();
        self.year = year;
        log::debug!("moved back to {} {}", self.month, self.year);
        Ok(())
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        let year = if self.month == December {
            check_grid_year(self.year + 1)?
        } else {
            self.year
        };
        self.month = self.month.next();
        self.year = year;
        log::debug!("moved forwards to {} {}", self.month, self.year);
        Ok(())
    }

    /// Returns `false` if already at `MIN_YEAR` or earlier
    pub(crate) fn back_year(&mut self) -> bool {
        if self.year > MIN_YEAR {
            self.year -= 1;
            log::debug!("moved back to {} {}", self.month, self.year);
            true
        } else {
            false
        }
    }

    /// Returns `false` if already at `MAX_YEAR` or later
    pub(crate) fn next_year(&mut self) -> bool {
        if self.year < MAX_YEAR {
            self.year += 1;
            log::debug!("moved forwards to {} {}", self.month, self.year);
            true
        } else {
            false
        }
    }

    pub(crate) fn jump_to_today(&mut self) {
        let today = at_midnight(self.clock.now());
        self.month = today.month();
        self.year = today.year();
        self.selected_day = today.day();
        self.selected_date = today;
        log::debug!("jumped to today, {today}");
    }

    /// Returns the number of the month that the day number `day` in week row
    /// `week_index` of the grid belongs to.  The result is one less than the
    /// current month's number for trailing days of the previous month and
    /// one more for leading days of the next month, so it can be 0 or 13.
    ///
    /// This goes by the position and magnitude of the day number alone: a
    /// number over 7 in the first row is taken to be from the previous month,
    /// and a number under 20 in rows 4 or 5 from the next month.  The sixth
    /// row of a 28-day February that starts on a Sunday repeats days 8
    /// through 14 and is therefore attributed to March.
    pub(crate) fn month_for_grid_cell(&self, day: u8, week_index: usize) -> u8 {
        let current = u8::from(self.month);
        if week_index == 0 && day > 7 {
            current - 1
        } else if matches!(week_index, 4 | 5) && day < 20 {
            current + 1
        } else {
            current
        }
    }

    fn resolve_cell(&self, day: u8, week_index: usize) -> (Month, i32) {
        let number = self.month_for_grid_cell(day, week_index);
        match Month::try_from(number) {
            Ok(month) => (month, self.year),
            Err(_) if number < 1 => (December, self.year - 1),
            Err(_) => (January, self.year + 1),
        }
    }

    /// Selects the day in the given grid cell, switching to the cell's month
    /// (and year) if it's a spill-over day
    pub(crate) fn select_date(&mut self, day: u8, week_index: usize) -> Result<(), OutOfTimeError> {
        let (month, year) = self.resolve_cell(day, week_index);
        let year = check_grid_year(year)?;
        let selected_date = make_date(i32::from(day), month, year)?;
        self.month = month;
        self.year = year;
        self.selected_day = day;
        self.selected_date = selected_date;
        log::debug!("selected {selected_date}");
        Ok(())
    }

    /// Tests whether selecting the given grid cell would select the
    /// currently-selected date
    pub(crate) fn is_selected(&self, day: u8, week_index: usize) -> bool {
        let (month, year) = self.resolve_cell(day, week_index);
        make_date(i32::from(day), month, year).is_ok_and(|date| date == self.selected_date)
    }

    /// Tests whether day `day` of month number `month` in the current year is
    /// today.  The current year is used even when `month` comes from
    /// `month_for_grid_cell()` for a spill-over day in an adjacent year, so
    /// such days are never reported as today.  Month numbers outside 1-12
    /// never match.
    pub(crate) fn is_today(&self, day: u8, month: u8) -> bool {
        let Ok(month) = Month::try_from(month) else {
            return false;
        };
        let today = at_midnight(self.clock.now());
        make_date(i32::from(day), month, self.year).is_ok_and(|date| date == today)
    }

    /// # Panics
    ///
    /// Panics if the current year is one in which a complete grid cannot be
    /// represented, i.e., at the very ends of `time::Date`'s range.  Month
    /// navigation and selection never go there.
    pub(crate) fn grid(&self) -> CalendarGrid {
        self.try_grid()
            .expect("grid for a navigable month should be representable")
    }

    fn try_grid(&self) -> Result<CalendarGrid, OutOfTimeError> {
        let mut rows = Vec::with_capacity(MAX_WEEKS);
        let mut row = week_from(1, self.month, self.year)?;
        rows.push(row);
        while rows.len() < BASE_WEEKS {
            row = next_week(&row, self.month, self.year)?;
            rows.push(row);
        }
        if !row.contains(last_day_of_month(self.month, self.year)) {
            rows.push(next_week(&row, self.month, self.year)?);
        }
        Ok(CalendarGrid(rows))
    }
}

fn check_grid_year(year: i32) -> Result<i32, OutOfTimeError> {
    if (FIRST_GRID_YEAR..=LAST_GRID_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(OutOfTimeError)
    }
}
