use std::fmt;
use std::iter::successors;
use std::ops::Index;
use thiserror::Error;
use time::{
    util::days_in_month, Date, Duration, Month, PrimitiveDateTime, Weekday, Weekday::*,
};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

/// A calendar day.  Dates carry no time of day, so two `CalendarDate`s
/// compare equal whenever they name the same day.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct CalendarDate(Date);

impl CalendarDate {
    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> Month {
        self.0.month()
    }

    pub(crate) fn day(self) -> u8 {
        self.0.day()
    }

    pub(crate) fn weekday(self) -> Weekday {
        self.0.weekday()
    }
}

impl From<Date> for CalendarDate {
    fn from(date: Date) -> CalendarDate {
        CalendarDate(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.year(),
            u8::from(self.month()),
            self.day()
        )
    }
}

/// The seven day-of-month numbers of a week, Sunday first.  A number on its
/// own does not say which month it belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct WeekRow([u8; DAYS_IN_WEEK]);

impl WeekRow {
    pub(crate) fn last(&self) -> u8 {
        self.0[DAYS_IN_WEEK - 1]
    }

    pub(crate) fn contains(&self, day: u8) -> bool {
        self.0.contains(&day)
    }

    pub(crate) fn enumerate(&self) -> impl Iterator<Item = (Weekday, u8)> + '_ {
        WeekdayIter::new().zip(self.0.iter().copied())
    }
}

impl Index<Weekday> for WeekRow {
    type Output = u8;

    fn index(&self, wd: Weekday) -> &u8 {
        &self.0[usize::from(wd.index0())]
    }
}

#[cfg(test)]
impl From<[u8; DAYS_IN_WEEK]> for WeekRow {
    fn from(days: [u8; DAYS_IN_WEEK]) -> WeekRow {
        WeekRow(days)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekdayIter(Option<Weekday>);

impl WeekdayIter {
    pub(crate) fn new() -> Self {
        WeekdayIter(Some(Sunday))
    }
}

impl Iterator for WeekdayIter {
    type Item = Weekday;

    fn next(&mut self) -> Option<Weekday> {
        let r = self.0;
        if let Some(wd) = r {
            self.0 = match wd.next() {
                Sunday => None,
                wd2 => Some(wd2),
            };
        }
        r
    }
}

/// Returns the date `day - 1` days after the first of the given month.  Days
/// past the end of the month (or zero or negative) roll over into the
/// neighboring months.
pub(crate) fn make_date(day: i32, month: Month, year: i32) -> Result<CalendarDate, OutOfTimeError> {
    Date::from_calendar_date(year, month, 1)
        .ok()
        .and_then(|first| first.checked_add(Duration::days(i64::from(day) - 1)))
        .map(CalendarDate)
        .ok_or(OutOfTimeError)
}

/// Returns the dates of the Sunday-to-Saturday week containing
/// `make_date(day, month, year)`
pub(crate) fn week_dates(
    day: i32,
    month: Month,
    year: i32,
) -> Result<[CalendarDate; DAYS_IN_WEEK], OutOfTimeError> {
    let anchor = make_date(day, month, year)?.0;
    let sunday = anchor
        .checked_sub(Duration::days(anchor.weekday().index0().into()))
        .ok_or(OutOfTimeError)?;
    let days = successors(Some(sunday), |&d| d.next_day())
        .take(DAYS_IN_WEEK)
        .map(CalendarDate)
        .collect::<Vec<_>>();
    <[CalendarDate; DAYS_IN_WEEK]>::try_from(days).map_err(|_| OutOfTimeError)
}

pub(crate) fn week_from(day: i32, month: Month, year: i32) -> Result<WeekRow, OutOfTimeError> {
    week_dates(day, month, year).map(|dates| WeekRow(dates.map(CalendarDate::day)))
}

// `month` is the month being displayed, not necessarily the month of the
// row's last cell.  When that cell is the last day of the month, the
// reference day rolls over into the next month.
pub(crate) fn next_week(previous: &WeekRow, month: Month, year: i32) -> Result<WeekRow, OutOfTimeError> {
    week_from(i32::from(previous.last()) + 1, month, year)
}

pub(crate) fn last_day_of_month(month: Month, year: i32) -> u8 {
    days_in_month(month, year)
}

/// Uppercases the first character of `text` and leaves the rest alone
pub(crate) fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn at_midnight(datetime: PrimitiveDateTime) -> CalendarDate {
    CalendarDate(datetime.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Month::*;

    #[test]
    fn test_make_date() {
        assert_eq!(make_date(16, November, 2023), Ok(date!(2023 - 11 - 16).into()));
    }

    #[test]
    fn test_make_date_rolls_over() {
        assert_eq!(make_date(32, January, 2024), Ok(date!(2024 - 02 - 01).into()));
        assert_eq!(make_date(29, February, 2023), Ok(date!(2023 - 03 - 01).into()));
        assert_eq!(make_date(0, March, 2024), Ok(date!(2024 - 02 - 29).into()));
        assert_eq!(make_date(-1, January, 2024), Ok(date!(2023 - 12 - 30).into()));
        assert_eq!(make_date(62, December, 2024), Ok(date!(2025 - 01 - 31).into()));
    }

    #[test]
    fn test_make_date_out_of_time() {
        assert_eq!(make_date(32, December, 9999), Err(OutOfTimeError));
        assert_eq!(make_date(0, January, -9999), Err(OutOfTimeError));
    }

    #[test]
    fn test_week_from() {
        let week = week_from(16, November, 2023).unwrap();
        let mut iter = week.enumerate();
        assert_eq!(iter.next(), Some((Sunday, 12)));
        assert_eq!(iter.next(), Some((Monday, 13)));
        assert_eq!(iter.next(), Some((Tuesday, 14)));
        assert_eq!(iter.next(), Some((Wednesday, 15)));
        assert_eq!(iter.next(), Some((Thursday, 16)));
        assert_eq!(iter.next(), Some((Friday, 17)));
        assert_eq!(iter.next(), Some((Saturday, 18)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_week_from_sunday() {
        assert_eq!(
            week_from(12, November, 2023),
            Ok(WeekRow::from([12, 13, 14, 15, 16, 17, 18]))
        );
    }

    #[test]
    fn test_week_from_saturday() {
        assert_eq!(
            week_from(18, November, 2023),
            Ok(WeekRow::from([12, 13, 14, 15, 16, 17, 18]))
        );
    }

    #[test]
    fn test_week_from_spans_months() {
        assert_eq!(
            week_from(1, January, 2024),
            Ok(WeekRow::from([31, 1, 2, 3, 4, 5, 6]))
        );
        assert_eq!(
            week_from(31, March, 2024),
            Ok(WeekRow::from([31, 1, 2, 3, 4, 5, 6]))
        );
    }

    #[test]
    fn test_week_dates() {
        let dates = week_dates(1, January, 2024).unwrap();
        assert_eq!(dates[0], date!(2023 - 12 - 31).into());
        assert_eq!(dates[6], date!(2024 - 01 - 06).into());
        assert!(dates
            .iter()
            .zip(WeekdayIter::new())
            .all(|(d, wd)| d.weekday() == wd));
    }

    #[test]
    fn test_week_dates_end_of_time() {
        assert_eq!(week_dates(31, December, 9999), Err(OutOfTimeError));
    }

    #[test]
    fn test_next_week() {
        let week = week_from(1, January, 2024).unwrap();
        assert_eq!(
            next_week(&week, January, 2024),
            Ok(WeekRow::from([7, 8, 9, 10, 11, 12, 13]))
        );
    }

    #[test]
    fn test_next_week_rolls_into_next_month() {
        // February 2026 starts on a Sunday and has exactly four weeks
        let week = WeekRow::from([22, 23, 24, 25, 26, 27, 28]);
        assert_eq!(
            next_week(&week, February, 2026),
            Ok(WeekRow::from([1, 2, 3, 4, 5, 6, 7]))
        );
    }

    #[test]
    fn test_next_week_uses_given_month() {
        let week = WeekRow::from([1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            next_week(&week, February, 2026),
            Ok(WeekRow::from([8, 9, 10, 11, 12, 13, 14]))
        );
    }

    #[test]
    fn test_week_row_index() {
        let week = WeekRow::from([26, 27, 28, 29, 30, 31, 1]);
        assert_eq!(week[Sunday], 26);
        assert_eq!(week[Friday], 31);
        assert_eq!(week[Saturday], 1);
        assert_eq!(week.last(), 1);
        assert!(week.contains(31));
        assert!(!week.contains(25));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(January, 2024), 31);
        assert_eq!(last_day_of_month(February, 2024), 29);
        assert_eq!(last_day_of_month(February, 2023), 28);
        assert_eq!(last_day_of_month(February, 1900), 28);
        assert_eq!(last_day_of_month(February, 2000), 29);
        assert_eq!(last_day_of_month(April, 2024), 30);
        assert_eq!(last_day_of_month(December, 9999), 31);
        assert_eq!(last_day_of_month(February, -9999), 28);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("janeiro"), "Janeiro");
        assert_eq!(title_case("March"), "March");
        assert_eq!(title_case("ábril"), "Ábril");
        assert_eq!(title_case("a"), "A");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_at_midnight() {
        assert_eq!(
            at_midnight(datetime!(2024-05-15 23:59:59.999)),
            at_midnight(datetime!(2024-05-15 0:00))
        );
        assert_eq!(
            at_midnight(datetime!(2024-05-15 13:45)),
            date!(2024 - 05 - 15).into()
        );
        assert_ne!(
            at_midnight(datetime!(2024-05-15 0:00)),
            at_midnight(datetime!(2024-05-16 0:00))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CalendarDate::from(date!(2024 - 05 - 07)).to_string(), "2024-05-07");
    }

    #[test]
    fn test_weekday_iter() {
        assert_eq!(
            WeekdayIter::new().collect::<Vec<_>>(),
            [Sunday, Monday, Tuesday, Wednesday, Thursday, Friday, Saturday]
        );
    }
}
