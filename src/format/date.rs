//! Date formatting on ICU4X date field sets.

use chrono::{
    DateTime,
    Datelike,
    Utc,
};
use icu::calendar::{
    Date,
    Iso,
};
use icu::datetime::DateTimeFormatter;
use icu::datetime::fieldsets::enums::{
    CalendarPeriodFieldSet,
    DateFieldSet,
};
use icu::datetime::fieldsets;
use icu::datetime::options::{
    Length,
    YearStyle,
};

use crate::locale::Locale;

/// How the month is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthStyle {
    /// Short numeric pattern, e.g. `1/5/2024`
    Numeric,
    /// Spelled-out month, e.g. `January 5, 2024`
    Long,
}

/// Date components to include.
///
/// Options with no component selected render like [`DateOptions::default`].
/// The weekday is only shown next to a day, or on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DateOptions {
    /// Prefix with the weekday name
    pub weekday: bool,
    pub year: bool,
    /// `None` leaves the month out
    pub month: Option<MonthStyle>,
    /// Day of month
    pub day: bool,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self { weekday: false, year: true, month: Some(MonthStyle::Long), day: true }
    }
}

impl DateOptions {
    /// Day, numeric month and year.
    #[must_use]
    pub const fn numeric() -> Self {
        Self { weekday: false, year: true, month: Some(MonthStyle::Numeric), day: true }
    }

    /// Weekday, day, long month and year.
    #[must_use]
    pub const fn full() -> Self {
        Self { weekday: true, year: true, month: Some(MonthStyle::Long), day: true }
    }

    /// Whether no component is selected
    const fn is_empty(self) -> bool {
        !self.weekday && !self.year && self.month.is_none() && !self.day
    }
}

/// Formats `date` (in UTC) for `locale`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use i18n_runtime::format::format_date;
/// use i18n_runtime::locale::Locale;
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
/// assert_eq!(format_date(&date, Locale::En, None), "January 5, 2024");
/// assert_eq!(format_date(&date, Locale::De, None), "5. Januar 2024");
/// ```
#[must_use]
pub fn format_date(date: &DateTime<Utc>, locale: Locale, options: Option<DateOptions>) -> String {
    let options = options.filter(|options| !options.is_empty()).unwrap_or_default();
    let Some(iso) = iso_date(date) else {
        return date.format("%Y-%m-%d").to_string();
    };

    let formatted = match field_set(options) {
        FieldSet::Date(fields) => {
            DateTimeFormatter::try_new(super::icu_locale(locale).into(), fields)
                .ok()
                .map(|formatter| formatter.format(&iso).to_string())
        }
        FieldSet::Period(fields) => {
            DateTimeFormatter::try_new(super::icu_locale(locale).into(), fields)
                .ok()
                .map(|formatter| formatter.format(&iso).to_string())
        }
    };
    formatted.unwrap_or_else(|| {
        tracing::warn!(%locale, "Date formatting data unavailable");
        date.format("%Y-%m-%d").to_string()
    })
}

/// ICU4X calendar date of `date`; `None` outside the supported range
fn iso_date(date: &DateTime<Utc>) -> Option<Date<Iso>> {
    let month = u8::try_from(date.month()).ok()?;
    let day = u8::try_from(date.day()).ok()?;
    Date::try_new_iso(date.year(), month, day).ok()
}

/// ICU4X field set for a combination of [`DateOptions`]
enum FieldSet {
    /// Sets containing a day or weekday
    Date(DateFieldSet),
    /// Year and month sets without a day
    Period(CalendarPeriodFieldSet),
}

/// Maps options onto the closest field set
fn field_set(options: DateOptions) -> FieldSet {
    let length = match options.month {
        Some(MonthStyle::Numeric) => Length::Short,
        Some(MonthStyle::Long) | None => Length::Long,
    };
    let DateOptions { weekday, year, day, .. } = options;
    let month = options.month.is_some();

    match (year, month, day, weekday) {
        (true, _, true, false) => {
            let fields = fieldsets::YMD::for_length(length).with_year_style(YearStyle::Full);
            FieldSet::Date(DateFieldSet::YMD(fields))
        }
        (true, _, true, true) => {
            let fields = fieldsets::YMDE::for_length(length).with_year_style(YearStyle::Full);
            FieldSet::Date(DateFieldSet::YMDE(fields))
        }
        (false, true, true, false) => {
            FieldSet::Date(DateFieldSet::MD(fieldsets::MD::for_length(length)))
        }
        (false, true, true, true) => {
            FieldSet::Date(DateFieldSet::MDE(fieldsets::MDE::for_length(length)))
        }
        (false, false, true, false) => {
            FieldSet::Date(DateFieldSet::D(fieldsets::D::for_length(length)))
        }
        (false, false, true, true) => {
            FieldSet::Date(DateFieldSet::DE(fieldsets::DE::for_length(length)))
        }
        (true, true, false, _) => {
            let fields = fieldsets::YM::for_length(length).with_year_style(YearStyle::Full);
            FieldSet::Period(CalendarPeriodFieldSet::YM(fields))
        }
        (true, false, false, _) => {
            let fields = fieldsets::Y::for_length(length).with_year_style(YearStyle::Full);
            FieldSet::Period(CalendarPeriodFieldSet::Y(fields))
        }
        (false, true, false, _) => {
            FieldSet::Period(CalendarPeriodFieldSet::M(fieldsets::M::for_length(length)))
        }
        (false, false, false, _) => {
            FieldSet::Date(DateFieldSet::E(fieldsets::E::for_length(length)))
        }
    }
}
