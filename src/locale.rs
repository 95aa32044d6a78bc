//! Supported locale registry.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// Error returned when a locale code is outside the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unsupported locale '{0}'. Supported locales: en, de, fr, es, pl, gsw")]
    Unsupported(String),
}

/// A supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    De,
    Fr,
    Es,
    Pl,
    Gsw,
}

impl Locale {
    /// Every supported locale, in registry order.
    pub const ALL: [Self; 6] = [Self::En, Self::De, Self::Fr, Self::Es, Self::Pl, Self::Gsw];

    /// Fallback target for failed loads and baseline for coverage.
    pub const REFERENCE: Self = Self::En;

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Es => "es",
            Self::Pl => "pl",
            Self::Gsw => "gsw",
        }
    }

    /// Name of the language in the language itself.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::De => "Deutsch",
            Self::Fr => "Français",
            Self::Es => "Español",
            Self::Pl => "Polski",
            Self::Gsw => "Schwiizerdütsch",
        }
    }

    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::En)
    }

    /// Resolves a code such as `de`, `DE`, `de-CH` or `pl_PL` by its primary subtag.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        Self::ALL.into_iter().find(|locale| locale.code().eq_ignore_ascii_case(primary))
    }
}

/// Returns true if `code` names a supported locale.
#[must_use]
pub fn is_supported(code: &str) -> bool {
    Locale::from_code(code).is_some()
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| LocaleError::Unsupported(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("en", Some(Locale::En))]
    #[case("DE", Some(Locale::De))]
    #[case("de-CH", Some(Locale::De))]
    #[case("pl_PL", Some(Locale::Pl))]
    #[case("gsw", Some(Locale::Gsw))]
    #[case(" fr ", Some(Locale::Fr))]
    #[case("ja", None)]
    #[case("", None)]
    #[case("english", None)]
    fn test_from_code(#[case] code: &str, #[case] expected: Option<Locale>) {
        assert_that!(Locale::from_code(code), eq(expected));
        assert_that!(is_supported(code), eq(expected.is_some()));
    }

    #[rstest]
    fn test_from_str_rejects_unsupported() {
        let result: std::result::Result<Locale, _> = "xx".parse();

        assert_that!(result, err(eq(&LocaleError::Unsupported("xx".to_string()))));
    }

    #[rstest]
    fn test_codes_round_trip_through_registry() {
        for locale in Locale::ALL {
            assert_that!(locale.code().parse::<Locale>(), ok(eq(&locale)));
            assert!(!locale.display_name().is_empty());
        }
    }

    #[rstest]
    fn test_only_english_is_reference() {
        let references: Vec<_> = Locale::ALL.into_iter().filter(|l| l.is_reference()).collect();

        assert_that!(references, elements_are![eq(&Locale::REFERENCE)]);
        assert_that!(Locale::Gsw.to_string(), eq("gsw"));
    }
}
