mod clock;
mod datemath;
mod model;
mod widget;
#[cfg(test)]
pub(crate) use self::clock::FixedClock;
pub(crate) use self::clock::{Clock, SystemClock};
pub(crate) use self::model::CalendarModel;
pub(crate) use self::widget::{GridPos, MonthView};
use time::{Month, Weekday};

/// Names of weekdays and months in some language
pub(crate) trait DateFormatter {
    fn weekday_name(&self, weekday: Weekday) -> String;

    fn month_name(&self, month: Month) -> String;

    /// The first letter of the weekday's name, uppercased, for use as a
    /// column header
    fn weekday_initial(&self, weekday: Weekday) -> char {
        self.weekday_name(weekday)
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or(' ')
    }
}
