use crate::calendar::DateFormatter;
use std::str::FromStr;
use thiserror::Error;
use time::{Month, Weekday};

static PT_BR_WEEKDAYS: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

static PT_BR_MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Language for month & weekday names.  English unless `--locale` says
/// otherwise.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Locale {
    #[default]
    English,
    BrazilianPortuguese,
}

impl DateFormatter for Locale {
    fn weekday_name(&self, weekday: Weekday) -> String {
        match self {
            Locale::English => weekday.to_string(),
            Locale::BrazilianPortuguese => {
                PT_BR_WEEKDAYS[usize::from(weekday.number_days_from_sunday())].to_owned()
            }
        }
    }

    // Portuguese month names are not capitalized; callers that want a title
    // should pass them through `title_case()`.
    fn month_name(&self, month: Month) -> String {
        match self {
            Locale::English => month.to_string(),
            Locale::BrazilianPortuguese => {
                PT_BR_MONTHS[usize::from(u8::from(month) - 1)].to_owned()
            }
        }
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Locale, ParseLocaleError> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(Locale::English),
            "pt" | "pt-br" => Ok(Locale::BrazilianPortuguese),
            _ => Err(ParseLocaleError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown locale {0:?}; expected \"en\" or \"pt-BR\"")]
pub(crate) struct ParseLocaleError(String);
