//! CLDR-style plural category selection.
//!
//! Only the rule families of the supported locales are implemented: the
//! binary `one`/`other` rule (English, German, Spanish, Swiss German, French)
//! and the Polish `one`/`few`/`many`/`other` rule.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::locale::Locale;

/// Plural category names, in CLDR order.
pub const PLURAL_CATEGORIES: &[&str] = &["zero", "one", "two", "few", "many", "other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message variants keyed by plural category. `other` is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluralRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub few: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub many: Option<String>,
    pub other: String,
}

impl PluralRules {
    #[must_use]
    pub fn new(other: impl Into<String>) -> Self {
        Self { other: other.into(), ..Self::default() }
    }

    /// Sets the message for `category`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, category: PluralCategory, message: impl Into<String>) -> Self {
        let message = message.into();
        match category {
            PluralCategory::Zero => self.zero = Some(message),
            PluralCategory::One => self.one = Some(message),
            PluralCategory::Two => self.two = Some(message),
            PluralCategory::Few => self.few = Some(message),
            PluralCategory::Many => self.many = Some(message),
            PluralCategory::Other => self.other = message,
        }
        self
    }

    /// Message for exactly `category`, without falling back to `other`.
    #[must_use]
    pub fn get(&self, category: PluralCategory) -> Option<&str> {
        match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => self.one.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => Some(&self.other),
        }
    }

    /// Builds rules from a JSON object that passes [`is_plural_rules`].
    ///
    /// Members that are not category names, or whose values are not strings, are ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let other = map.get("other")?.as_str()?;
        let rules = map
            .iter()
            .filter_map(|(key, value)| Some((PluralCategory::from_key(key)?, value.as_str()?)))
            .fold(Self::new(other), |rules, (category, message)| rules.with(category, message));
        Some(rules)
    }
}

/// Returns true if `value` is an object whose `other` member is a string.
#[must_use]
pub fn is_plural_rules(value: &Value) -> bool {
    value.as_object().and_then(|map| map.get("other")).is_some_and(Value::is_string)
}

/// Plural category of `count` in `locale`.
#[must_use]
pub fn get_plural_form(count: f64, locale: Locale) -> PluralCategory {
    match locale {
        Locale::En | Locale::De | Locale::Es | Locale::Gsw | Locale::Fr => {
            if count == 1.0 {
                PluralCategory::One
            } else {
                PluralCategory::Other
            }
        }
        Locale::Pl => polish_plural_form(count),
    }
}

/// Polish rule: one, few (2-4 except 12-14), many, and other for fractions
fn polish_plural_form(count: f64) -> PluralCategory {
    if count == 1.0 {
        return PluralCategory::One;
    }
    if count == 0.0 {
        return PluralCategory::Many;
    }
    // fract() is NaN for NaN and infinities, so they land here too
    if count.fract() != 0.0 {
        return PluralCategory::Other;
    }

    let mod10 = count % 10.0;
    let mod100 = count % 100.0;
    if (2.0..=4.0).contains(&mod10) && !(12.0..=14.0).contains(&mod100) {
        PluralCategory::Few
    } else {
        PluralCategory::Many
    }
}

/// Picks the message for `count`, falling back to `other` when the category has none.
#[must_use]
pub fn select_plural_form(rules: &PluralRules, count: f64, locale: Locale) -> &str {
    rules.get(get_plural_form(count, locale)).unwrap_or(&rules.other)
}

/// Selects the message for `count` and substitutes its `{count}` placeholder.
#[must_use]
pub fn format_plural(rules: &PluralRules, count: f64, locale: Locale) -> String {
    select_plural_form(rules, count, locale).replace("{count}", &number_to_string(count))
}

/// Plain numeric-to-string conversion used for interpolated values.
#[must_use]
pub fn number_to_string(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value.is_sign_positive() { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        value.to_string()
    }
}
