//! Number and currency formatting.
//!
//! Digits, separators and grouping come from ICU4X decimal data. Currency symbols
//! and their placement are kept in a small table here.

use fixed_decimal::{
    Decimal,
    FloatPrecision,
    SignedRoundingMode,
    UnsignedRoundingMode,
};
use icu::decimal::DecimalFormatter;
use icu::decimal::options::DecimalFormatterOptions;

use crate::locale::Locale;

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Fraction digit bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberOptions {
    pub minimum_fraction_digits: usize,
    pub maximum_fraction_digits: usize,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self { minimum_fraction_digits: 0, maximum_fraction_digits: 3 }
    }
}

impl NumberOptions {
    /// Exactly `digits` fraction digits.
    #[must_use]
    pub const fn fixed(digits: usize) -> Self {
        Self { minimum_fraction_digits: digits, maximum_fraction_digits: digits }
    }
}

/// Formats `value` with the locale's grouping and decimal separators.
///
/// ```
/// use i18n_runtime::format::format_number;
/// use i18n_runtime::locale::Locale;
///
/// assert_eq!(format_number(1234567.891, Locale::En, None), "1,234,567.891");
/// assert_eq!(format_number(1234567.891, Locale::De, None), "1.234.567,891");
/// ```
#[must_use]
pub fn format_number(value: f64, locale: Locale, options: Option<NumberOptions>) -> String {
    let options = options.unwrap_or_default();
    format_decimal(value, locale, options.minimum_fraction_digits, options.maximum_fraction_digits)
}

/// Largest fraction digit count honoured
const MAX_FRACTION_DIGITS: i16 = 20;

/// Fraction digit count as a `Decimal` magnitude bound
fn fraction_digits(digits: usize) -> i16 {
    i16::try_from(digits).map_or(MAX_FRACTION_DIGITS, |digits| digits.min(MAX_FRACTION_DIGITS))
}

/// Shared body of [`format_number`] and [`format_currency`]
///
/// Rounds half away from zero at `max_digits`, then pads to `min_digits`.
fn format_decimal(value: f64, locale: Locale, min_digits: usize, max_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let min_digits = fraction_digits(min_digits);
    let max_digits = fraction_digits(max_digits).max(min_digits);
    let Ok(mut decimal) = Decimal::try_from_f64(value, FloatPrecision::RoundTrip) else {
        return value.to_string();
    };
    decimal.round_with_mode(
        -max_digits,
        SignedRoundingMode::Unsigned(UnsignedRoundingMode::HalfExpand),
    );
    decimal.trim_end();
    decimal.pad_end(-min_digits);

    let options = DecimalFormatterOptions::default();
    match DecimalFormatter::try_new(super::icu_locale(locale).into(), options) {
        Ok(formatter) => formatter.format(&decimal).to_string(),
        Err(error) => {
            tracing::warn!(%locale, %error, "Number formatting data unavailable");
            decimal.to_string()
        }
    }
}

/// Display data of a currency
struct Currency {
    /// Symbol or code shown next to the amount
    symbol: String,
    /// Fraction digits of the minor unit
    digits: usize,
}

/// Looks up an upper-case ISO 4217 code; unknown codes show the code itself
fn currency(code: &str) -> Currency {
    let (symbol, digits) = match code {
        "EUR" => ("€", 2),
        "USD" => ("$", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        "PLN" => ("zł", 2),
        other => (other, 2),
    };
    Currency { symbol: symbol.to_string(), digits }
}

/// Formats an amount of `currency_code` (default [`DEFAULT_CURRENCY`]).
///
/// English places the symbol first; the other locales put it after the amount.
#[must_use]
pub fn format_currency(amount: f64, locale: Locale, currency_code: Option<&str>) -> String {
    let code = currency_code.unwrap_or(DEFAULT_CURRENCY).trim().to_ascii_uppercase();
    let Currency { symbol, digits } = currency(&code);
    let number = format_decimal(amount.abs(), locale, digits, digits);
    let sign = if amount < 0.0 { "-" } else { "" };

    match locale {
        Locale::En => {
            // Letter symbols such as "CHF" need a gap before the digits
            let gap = if symbol.chars().all(char::is_alphabetic) { " " } else { "" };
            format!("{sign}{symbol}{gap}{number}")
        }
        _ => format!("{sign}{number}\u{a0}{symbol}"),
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Locale::En, 1_234_567.891, "1,234,567.891")]
    #[case(Locale::De, 1_234_567.891, "1.234.567,891")]
    #[case(Locale::Fr, 1_234_567.891, "1\u{202f}234\u{202f}567,891")]
    #[case(Locale::Es, 1_234_567.891, "1.234.567,891")]
    #[case(Locale::Pl, 1_234_567.891, "1\u{a0}234\u{a0}567,891")]
    #[case(Locale::Gsw, 1_234_567.891, "1’234’567.891")]
    #[case(Locale::En, 123_456.0, "123,456")]
    #[case(Locale::De, 123_456.0, "123.456")]
    #[case(Locale::En, 1234.0, "1,234")]
    #[case(Locale::Es, 1234.0, "1234")]
    #[case(Locale::Pl, 1234.5, "1234,5")]
    #[case(Locale::Es, 12_345.0, "12.345")]
    #[case(Locale::En, 0.0, "0")]
    #[case(Locale::De, 0.000_001, "0")]
    #[case(Locale::En, 0.125, "0.125")]
    #[case(Locale::En, 2.5, "2.5")]
    #[case(Locale::En, 999.9999, "1,000")]
    #[case(Locale::En, -1234.5, "-1,234.5")]
    #[case(Locale::De, -0.5, "-0,5")]
    #[case(Locale::En, 1.005, "1.005")]
    fn test_format_number(#[case] locale: Locale, #[case] value: f64, #[case] expected: &str) {
        assert_that!(format_number(value, locale, None), eq(expected));
    }

    #[rstest]
    #[case(NumberOptions::fixed(2), 1234.5, "1,234.50")]
    #[case(NumberOptions::fixed(0), 1234.5, "1,235")]
    #[case(NumberOptions::fixed(0), 2.5, "3")]
    #[case(NumberOptions::fixed(0), 3.5, "4")]
    #[case(NumberOptions::fixed(2), 1.005, "1.01")]
    #[case(NumberOptions::fixed(1), -0.25, "-0.3")]
    #[case(NumberOptions { minimum_fraction_digits: 1, maximum_fraction_digits: 4 }, 3.0, "3.0")]
    #[case(NumberOptions { minimum_fraction_digits: 1, maximum_fraction_digits: 4 }, 3.141_59, "3.1416")]
    #[case(NumberOptions { minimum_fraction_digits: 3, maximum_fraction_digits: 1 }, 1.0, "1.000")]
    fn test_format_number_options(
        #[case] options: NumberOptions,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_that!(format_number(value, Locale::En, Some(options)), eq(expected));
    }

    #[rstest]
    fn test_tiny_values_round_to_zero() {
        for locale in Locale::ALL {
            let text = format_number(-0.0001, locale, None);
            assert!(text.ends_with('0') && !text.contains('1'), "{locale}: {text}");
        }
    }

    #[rstest]
    fn test_format_number_non_finite() {
        assert_that!(format_number(f64::NAN, Locale::En, None), eq("NaN"));
        assert_that!(format_number(f64::NEG_INFINITY, Locale::De, None), eq("-∞"));
    }

    #[rstest]
    fn test_finite_values_never_render_nan_or_infinity() {
        for value in [0.0, -0.0, 1e-12, -1e-12, 5e5, 123_456.789, -987_654.321, 1e15, f64::MAX] {
            for locale in Locale::ALL {
                let text = format_number(value, locale, None);
                assert!(!text.contains("NaN") && !text.contains('∞'), "{value} in {locale}: {text}");
            }
        }
    }

    #[rstest]
    #[case(Locale::En, 1234.5, None, "€1,234.50")]
    #[case(Locale::De, 1234.5, None, "1.234,50\u{a0}€")]
    #[case(Locale::Fr, 1234.5, Some("EUR"), "1\u{202f}234,50\u{a0}€")]
    #[case(Locale::En, 1234.5, Some("USD"), "$1,234.50")]
    #[case(Locale::En, 1234.5, Some("gbp"), "£1,234.50")]
    #[case(Locale::En, 1234.5, Some("JPY"), "¥1,235")]
    #[case(Locale::En, 99.0, Some("CHF"), "CHF 99.00")]
    #[case(Locale::Gsw, 99.0, Some("CHF"), "99.00\u{a0}CHF")]
    #[case(Locale::Pl, 10.0, Some("PLN"), "10,00\u{a0}zł")]
    #[case(Locale::En, -5.0, None, "-€5.00")]
    #[case(Locale::Es, -5.0, Some("USD"), "-5,00\u{a0}$")]
    fn test_format_currency(
        #[case] locale: Locale,
        #[case] amount: f64,
        #[case] code: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_that!(format_currency(amount, locale, code), eq(expected));
    }

    #[rstest]
    fn test_currency_default_is_euro() {
        for locale in Locale::ALL {
            assert_that!(format_currency(42.0, locale, None), contains_substring("€"));
        }
    }

    #[rstest]
    fn test_currency_codes_are_distinguishable() {
        let rendered: Vec<String> = ["EUR", "USD", "GBP"]
            .into_iter()
            .map(|code| format_currency(100.0, Locale::De, Some(code)))
            .collect();

        assert_that!(rendered, elements_are![
            eq("100,00\u{a0}€"),
            eq("100,00\u{a0}$"),
            eq("100,00\u{a0}£")
        ]);
    }
}
