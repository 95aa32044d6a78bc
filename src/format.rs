//! Locale-aware formatting of dates, numbers, currency amounts and relative times.
//!
//! Every function is pure: the same value, locale and options always produce the
//! same string. Dates are rendered in UTC.

use icu::locale::locale;

use crate::locale::Locale;

pub mod date;
pub mod number;
pub mod relative;

pub use date::{
    DateOptions,
    MonthStyle,
    format_date,
};
pub use number::{
    DEFAULT_CURRENCY,
    NumberOptions,
    format_currency,
    format_number,
};
pub use relative::{
    TimeUnit,
    format_relative_time,
    format_relative_time_from,
};

/// ICU4X locale carrying the formatting data of `locale`
fn icu_locale(locale: Locale) -> icu::locale::Locale {
    match locale {
        Locale::En => locale!("en"),
        Locale::De => locale!("de"),
        Locale::Fr => locale!("fr"),
        Locale::Es => locale!("es"),
        Locale::Pl => locale!("pl"),
        Locale::Gsw => locale!("gsw"),
    }
}
