//! Relative time phrases such as "3 days ago" or "dans 2 heures".

use chrono::{
    DateTime,
    Utc,
};

use super::number::format_number;
use crate::locale::Locale;
use crate::plural::{
    PluralCategory,
    get_plural_form,
};

/// Seconds per minute
const MINUTE: i64 = 60;
/// Seconds per hour
const HOUR: i64 = 60 * MINUTE;
/// Seconds per day
const DAY: i64 = 24 * HOUR;

/// Unit a relative phrase is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Picks the unit for an absolute difference and returns the whole count in it.
    ///
    /// Months are 30 days and years 365 days.
    #[must_use]
    pub const fn select(seconds: i64) -> (i64, Self) {
        let seconds = seconds.saturating_abs();
        let days = seconds / DAY;
        if seconds < MINUTE {
            (seconds, Self::Second)
        } else if seconds < HOUR {
            (seconds / MINUTE, Self::Minute)
        } else if seconds < DAY {
            (seconds / HOUR, Self::Hour)
        } else if days < 7 {
            (days, Self::Day)
        } else if days < 30 {
            (days / 7, Self::Week)
        } else if days < 365 {
            (days / 30, Self::Month)
        } else {
            (days / 365, Self::Year)
        }
    }
}

/// Describes `date` relative to the current time.
#[must_use]
pub fn format_relative_time(date: &DateTime<Utc>, locale: Locale) -> String {
    format_relative_time_from(date, locale, &Utc::now())
}

/// Describes `date` relative to `base`.
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use i18n_runtime::format::format_relative_time_from;
/// use i18n_runtime::locale::Locale;
///
/// let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
/// let date = base - Duration::days(3);
/// assert_eq!(format_relative_time_from(&date, Locale::En, &base), "3 days ago");
/// assert_eq!(format_relative_time_from(&date, Locale::De, &base), "vor 3 Tagen");
/// ```
#[must_use]
pub fn format_relative_time_from(
    date: &DateTime<Utc>,
    locale: Locale,
    base: &DateTime<Utc>,
) -> String {
    let difference = date.signed_duration_since(*base).num_seconds();
    if difference == 0 {
        return now_word(locale).to_string();
    }

    let (count, unit) = TimeUnit::select(difference);
    // Counts stay far below 2^32 for any representable date
    let count_value = f64::from(u32::try_from(count).unwrap_or(u32::MAX));
    let word = unit_word(locale, unit, get_plural_form(count_value, locale));
    let amount = format!("{} {word}", format_number(count_value, locale, None));

    if difference < 0 { past(locale, &amount) } else { future(locale, &amount) }
}

/// Word for a zero difference
const fn now_word(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "now",
        Locale::De => "jetzt",
        Locale::Fr => "maintenant",
        Locale::Es => "ahora",
        Locale::Pl => "teraz",
        Locale::Gsw => "jetz",
    }
}

/// Wraps `amount` in the locale's past phrasing
fn past(locale: Locale, amount: &str) -> String {
    match locale {
        Locale::En => format!("{amount} ago"),
        Locale::De | Locale::Gsw => format!("vor {amount}"),
        Locale::Fr => format!("il y a {amount}"),
        Locale::Es => format!("hace {amount}"),
        Locale::Pl => format!("{amount} temu"),
    }
}

/// Wraps `amount` in the locale's future phrasing
fn future(locale: Locale, amount: &str) -> String {
    match locale {
        Locale::En | Locale::De | Locale::Gsw => format!("in {amount}"),
        Locale::Fr => format!("dans {amount}"),
        Locale::Es => format!("dentro de {amount}"),
        Locale::Pl => format!("za {amount}"),
    }
}

/// Unit word in the grammatical form for `category`
///
/// Forms are `[one, few, many, other]`. German words are dative since they follow "vor"/"in".
fn unit_word(locale: Locale, unit: TimeUnit, category: PluralCategory) -> &'static str {
    let [one, few, many, other] = match (locale, unit) {
        (Locale::En, TimeUnit::Second) => binary("second", "seconds"),
        (Locale::En, TimeUnit::Minute) => binary("minute", "minutes"),
        (Locale::En, TimeUnit::Hour) => binary("hour", "hours"),
        (Locale::En, TimeUnit::Day) => binary("day", "days"),
        (Locale::En, TimeUnit::Week) => binary("week", "weeks"),
        (Locale::En, TimeUnit::Month) => binary("month", "months"),
        (Locale::En, TimeUnit::Year) => binary("year", "years"),

        (Locale::De, TimeUnit::Second) => binary("Sekunde", "Sekunden"),
        (Locale::De, TimeUnit::Minute) => binary("Minute", "Minuten"),
        (Locale::De, TimeUnit::Hour) => binary("Stunde", "Stunden"),
        (Locale::De, TimeUnit::Day) => binary("Tag", "Tagen"),
        (Locale::De, TimeUnit::Week) => binary("Woche", "Wochen"),
        (Locale::De, TimeUnit::Month) => binary("Monat", "Monaten"),
        (Locale::De, TimeUnit::Year) => binary("Jahr", "Jahren"),

        (Locale::Gsw, TimeUnit::Second) => binary("Sekunde", "Sekunde"),
        (Locale::Gsw, TimeUnit::Minute) => binary("Minuute", "Minuute"),
        (Locale::Gsw, TimeUnit::Hour) => binary("Stund", "Stunde"),
        (Locale::Gsw, TimeUnit::Day) => binary("Tag", "Täg"),
        (Locale::Gsw, TimeUnit::Week) => binary("Wuche", "Wuche"),
        (Locale::Gsw, TimeUnit::Month) => binary("Monet", "Mönet"),
        (Locale::Gsw, TimeUnit::Year) => binary("Jahr", "Jahr"),

        (Locale::Fr, TimeUnit::Second) => binary("seconde", "secondes"),
        (Locale::Fr, TimeUnit::Minute) => binary("minute", "minutes"),
        (Locale::Fr, TimeUnit::Hour) => binary("heure", "heures"),
        (Locale::Fr, TimeUnit::Day) => binary("jour", "jours"),
        (Locale::Fr, TimeUnit::Week) => binary("semaine", "semaines"),
        (Locale::Fr, TimeUnit::Month) => binary("mois", "mois"),
        (Locale::Fr, TimeUnit::Year) => binary("an", "ans"),

        (Locale::Es, TimeUnit::Second) => binary("segundo", "segundos"),
        (Locale::Es, TimeUnit::Minute) => binary("minuto", "minutos"),
        (Locale::Es, TimeUnit::Hour) => binary("hora", "horas"),
        (Locale::Es, TimeUnit::Day) => binary("día", "días"),
        (Locale::Es, TimeUnit::Week) => binary("semana", "semanas"),
        (Locale::Es, TimeUnit::Month) => binary("mes", "meses"),
        (Locale::Es, TimeUnit::Year) => binary("año", "años"),

        (Locale::Pl, TimeUnit::Second) => ["sekundę", "sekundy", "sekund", "sekundy"],
        (Locale::Pl, TimeUnit::Minute) => ["minutę", "minuty", "minut", "minuty"],
        (Locale::Pl, TimeUnit::Hour) => ["godzinę", "godziny", "godzin", "godziny"],
        (Locale::Pl, TimeUnit::Day) => ["dzień", "dni", "dni", "dnia"],
        (Locale::Pl, TimeUnit::Week) => ["tydzień", "tygodnie", "tygodni", "tygodnia"],
        (Locale::Pl, TimeUnit::Month) => ["miesiąc", "miesiące", "miesięcy", "miesiąca"],
        (Locale::Pl, TimeUnit::Year) => ["rok", "lata", "lat", "roku"],
    };

    match category {
        PluralCategory::One => one,
        PluralCategory::Few => few,
        PluralCategory::Many => many,
        PluralCategory::Zero | PluralCategory::Two | PluralCategory::Other => other,
    }
}

/// Forms for a language with only singular and plural
const fn binary(one: &'static str, other: &'static str) -> [&'static str; 4] {
    [one, other, other, other]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{
        Duration,
        TimeZone,
    };
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case(30, (30, TimeUnit::Second))]
    #[case(59, (59, TimeUnit::Second))]
    #[case(60, (1, TimeUnit::Minute))]
    #[case(3599, (59, TimeUnit::Minute))]
    #[case(3600, (1, TimeUnit::Hour))]
    #[case(86_399, (23, TimeUnit::Hour))]
    #[case(86_400, (1, TimeUnit::Day))]
    #[case(6 * 86_400, (6, TimeUnit::Day))]
    #[case(7 * 86_400, (1, TimeUnit::Week))]
    #[case(29 * 86_400, (4, TimeUnit::Week))]
    #[case(30 * 86_400, (1, TimeUnit::Month))]
    #[case(364 * 86_400, (12, TimeUnit::Month))]
    #[case(365 * 86_400, (1, TimeUnit::Year))]
    #[case(-90, (1, TimeUnit::Minute))]
    fn test_select_unit(#[case] seconds: i64, #[case] expected: (i64, TimeUnit)) {
        assert_that!(TimeUnit::select(seconds), eq(expected));
    }

    #[rstest]
    #[case(Locale::En, -3 * DAY, "3 days ago")]
    #[case(Locale::En, -DAY, "1 day ago")]
    #[case(Locale::En, 2 * HOUR, "in 2 hours")]
    #[case(Locale::De, -3 * DAY, "vor 3 Tagen")]
    #[case(Locale::De, -DAY, "vor 1 Tag")]
    #[case(Locale::De, 5 * MINUTE, "in 5 Minuten")]
    #[case(Locale::Fr, -2 * HOUR, "il y a 2 heures")]
    #[case(Locale::Fr, 14 * DAY, "dans 2 semaines")]
    #[case(Locale::Es, -45, "hace 45 segundos")]
    #[case(Locale::Es, 60 * DAY, "dentro de 2 meses")]
    #[case(Locale::Gsw, -2 * DAY, "vor 2 Täg")]
    #[case(Locale::Pl, -MINUTE, "1 minutę temu")]
    #[case(Locale::Pl, -3 * DAY, "3 dni temu")]
    #[case(Locale::Pl, -5 * MINUTE, "5 minut temu")]
    #[case(Locale::Pl, 22 * MINUTE, "za 22 minuty")]
    #[case(Locale::Pl, -12 * HOUR, "12 godzin temu")]
    #[case(Locale::Pl, 2 * 365 * DAY, "za 2 lata")]
    fn test_relative_phrases(
        base: DateTime<Utc>,
        #[case] locale: Locale,
        #[case] offset_seconds: i64,
        #[case] expected: &str,
    ) {
        let date = base + Duration::seconds(offset_seconds);

        assert_that!(format_relative_time_from(&date, locale, &base), eq(expected));
    }

    #[rstest]
    #[case(Locale::En, "now")]
    #[case(Locale::De, "jetzt")]
    #[case(Locale::Fr, "maintenant")]
    #[case(Locale::Es, "ahora")]
    #[case(Locale::Pl, "teraz")]
    #[case(Locale::Gsw, "jetz")]
    fn test_zero_difference(base: DateTime<Utc>, #[case] locale: Locale, #[case] expected: &str) {
        assert_that!(format_relative_time_from(&base, locale, &base), eq(expected));
    }

    #[rstest]
    fn test_large_counts_are_grouped(base: DateTime<Utc>) {
        let date = base - Duration::days(365 * 1500);

        assert_that!(format_relative_time_from(&date, Locale::En, &base), eq("1,500 years ago"));
    }

    #[rstest]
    fn test_relative_to_now() {
        let an_hour_ago = Utc::now() - Duration::minutes(61);

        assert_that!(format_relative_time(&an_hour_ago, Locale::En), eq("1 hour ago"));
    }
}
