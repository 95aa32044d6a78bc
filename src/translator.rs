//! Key lookup and `{placeholder}` interpolation for the active locale.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};

use crate::input::{
    Dictionary,
    Node,
    TranslationSource,
};
use crate::loader::TranslationLoader;
use crate::locale::Locale;
use crate::plural::{
    number_to_string,
    select_plural_form,
};

/// Whether lookup misses are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticsMode {
    /// Every miss logs a warning naming the key and locale
    #[default]
    Development,
    /// Misses are silent
    Production,
}

/// A value substituted into a message.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl ParamValue {
    /// Numeric view used for plural selection.
    #[must_use]
    pub fn as_count(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => f.write_str(&number_to_string(*n)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                Self::Number(f64::from(value))
            }
        })*
    };
}

impl_from_integer!(i8, i16, i32, u8, u16, u32, f32);

impl From<usize> for ParamValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: usize) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i64> for ParamValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Named values for interpolation.
///
/// ```
/// use i18n_runtime::translator::Params;
///
/// let params = Params::new().with("name", "Ada").with("count", 3);
/// assert_eq!(params.get("count").and_then(|v| v.as_count()), Some(3.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// The `count` parameter, if it is numeric.
    #[must_use]
    pub fn count(&self) -> Option<f64> {
        self.get("count").and_then(ParamValue::as_count)
    }
}

/// Resolves keys against one locale's dictionary.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    dictionary: Arc<Dictionary>,
    mode: DiagnosticsMode,
}

impl Translator {
    #[must_use]
    pub const fn new(locale: Locale, dictionary: Arc<Dictionary>, mode: DiagnosticsMode) -> Self {
        Self { locale, dictionary, mode }
    }

    /// Loads `locale` through `loader` and wraps the result.
    pub async fn load<S: TranslationSource>(
        loader: &TranslationLoader<S>,
        locale: Locale,
        mode: DiagnosticsMode,
    ) -> Self {
        Self::new(locale, loader.load(locale).await, mode)
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Message for `key`, or `key` itself when it does not resolve.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translate(key, None)
    }

    /// Like [`t`](Self::t), with `{name}` placeholders filled from `params`.
    ///
    /// A plural rule set is resolved with `params`' `count`, or `other` without one.
    #[must_use]
    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translate(key, Some(params))
    }

    /// Shared body of `t` and `t_with`
    fn translate(&self, key: &str, params: Option<&Params>) -> String {
        let template = match self.dictionary.get(key) {
            Some(Node::Text(text)) => text.as_str(),
            Some(Node::Plural(rules)) => match params.and_then(Params::count) {
                Some(count) => select_plural_form(rules, count, self.locale),
                None => rules.other.as_str(),
            },
            Some(Node::Tree(_) | Node::Other(_)) | None => {
                self.report_missing(key);
                return key.to_string();
            }
        };

        match params {
            Some(params) => interpolate(template, params),
            None => template.to_string(),
        }
    }

    /// Logs a miss in development mode
    fn report_missing(&self, key: &str) {
        if self.mode == DiagnosticsMode::Development {
            tracing::warn!(key, locale = %self.locale, "Missing translation");
        }
    }
}

/// Single-pass `{name}` interpolation. Placeholders without a value are left as-is.
#[must_use]
pub fn interpolate(template: &str, params: &Params) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((before, after_open)) = rest.split_once('{') {
        result.push_str(before);
        match after_open.split_once('}') {
            Some((name, tail)) if !name.contains('{') => {
                match params.get(name) {
                    Some(value) => result.push_str(&value.to_string()),
                    None => {
                        result.push('{');
                        result.push_str(name);
                        result.push('}');
                    }
                }
                rest = tail;
            }
            // Unclosed, or another '{' comes first: this brace is literal
            _ => {
                result.push('{');
                rest = after_open;
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::test_utils::{
        LogBuffer,
        MockSource,
    };

    fn dictionary() -> Arc<Dictionary> {
        Arc::new(
            Dictionary::from_json(json!({
                "greeting": "Hello {name}!",
                "welcome": "Welcome back, {name}. You have {count} new {what}.",
                "nav": {
                    "home": "Home",
                    "projects": { "title": "Projects" }
                },
                "items": { "one": "{count} item", "other": "{count} items" },
                "files": {
                    "one": "{count} plik",
                    "few": "{count} pliki",
                    "many": "{count} plików",
                    "other": "{count} pliku"
                },
                "maxItems": 10
            }))
            .unwrap(),
        )
    }

    fn translator(locale: Locale, mode: DiagnosticsMode) -> Translator {
        Translator::new(locale, dictionary(), mode)
    }

    #[rstest]
    #[case("nav.home", "Home")]
    #[case("nav.projects.title", "Projects")]
    #[case("greeting", "Hello {name}!")]
    fn test_t_resolves_text(#[case] key: &str, #[case] expected: &str) {
        let t = translator(Locale::En, DiagnosticsMode::Production);

        assert_that!(t.t(key), eq(expected));
    }

    #[rstest]
    #[case::missing_leaf("nav.settings")]
    #[case::missing_group("footer.copyright")]
    #[case::through_text("nav.home.icon")]
    #[case::ends_on_group("nav.projects")]
    #[case::ends_on_number("maxItems")]
    #[case::empty("")]
    fn test_t_returns_key_on_miss(
        #[case] key: &str,
        #[values(DiagnosticsMode::Development, DiagnosticsMode::Production)] mode: DiagnosticsMode,
    ) {
        assert_that!(translator(Locale::En, mode).t(key), eq(key));
    }

    #[googletest::test]
    fn test_missing_key_warns_in_development_only() {
        let development = LogBuffer::new();
        let production = LogBuffer::new();

        let dev_result = tracing::subscriber::with_default(development.subscriber(), || {
            translator(Locale::De, DiagnosticsMode::Development).t("nav.settings")
        });
        let prod_result = tracing::subscriber::with_default(production.subscriber(), || {
            translator(Locale::De, DiagnosticsMode::Production).t("nav.settings")
        });

        assert_that!(dev_result, eq(&prod_result));
        let logs = development.contents();
        assert_that!(logs.matches("Missing translation").count(), eq(1));
        expect_that!(logs, contains_substring("nav.settings"));
        expect_that!(logs, contains_substring("locale=de"));
        assert_that!(production.contents(), eq(""));
    }

    #[rstest]
    fn test_interpolates_params() {
        let t = translator(Locale::En, DiagnosticsMode::Production);
        let params = Params::new().with("name", "Ada").with("count", 3).with("what", "tasks");

        assert_that!(t.t_with("greeting", &params), eq("Hello Ada!"));
        assert_that!(
            t.t_with("welcome", &params),
            eq("Welcome back, Ada. You have 3 new tasks.")
        );
    }

    #[rstest]
    fn test_unmatched_placeholder_is_left_verbatim() {
        let t = translator(Locale::En, DiagnosticsMode::Production);

        assert_that!(t.t_with("greeting", &Params::new()), eq("Hello {name}!"));
        assert_that!(
            t.t_with("welcome", &Params::new().with("name", "Ada")),
            eq("Welcome back, Ada. You have {count} new {what}.")
        );
    }

    #[rstest]
    #[case(Locale::En, "items", 1, "1 item")]
    #[case(Locale::En, "items", 5, "5 items")]
    #[case(Locale::En, "items", 0, "0 items")]
    #[case(Locale::Pl, "files", 1, "1 plik")]
    #[case(Locale::Pl, "files", 3, "3 pliki")]
    #[case(Locale::Pl, "files", 12, "12 plików")]
    #[case(Locale::Pl, "files", 22, "22 pliki")]
    fn test_plural_lookup(
        #[case] locale: Locale,
        #[case] key: &str,
        #[case] count: i32,
        #[case] expected: &str,
    ) {
        let t = translator(locale, DiagnosticsMode::Production);

        assert_that!(t.t_with(key, &Params::new().with("count", count)), eq(expected));
    }

    #[rstest]
    fn test_plural_without_count_uses_other() {
        let t = translator(Locale::En, DiagnosticsMode::Production);

        assert_that!(t.t("items"), eq("{count} items"));
        assert_that!(t.t_with("items", &Params::new().with("count", "2")), eq("2 items"));
        assert_that!(t.t_with("items", &Params::new().with("count", true)), eq("true items"));
    }

    #[rstest]
    #[case::text("many", "many items")]
    #[case::digit_with_suffix("1x", "1x items")]
    #[case::empty_text("", " items")]
    fn test_non_numeric_count_selects_other(#[case] count: &str, #[case] expected: &str) {
        let t = translator(Locale::En, DiagnosticsMode::Production);

        assert_that!(t.t_with("items", &Params::new().with("count", count)), eq(expected));
    }

    #[rstest]
    #[case("{a}{b}", "12")]
    #[case("{{a}}", "{1}")]
    #[case("{a", "{a")]
    #[case("a}", "a}")]
    #[case("{}", "{}")]
    #[case("{ratio} and {flag}", "1.5 and true")]
    #[case("{neg}", "-4")]
    #[case("plain", "plain")]
    #[case("ünï {a} cödé", "ünï 1 cödé")]
    fn test_interpolate_edge_cases(#[case] template: &str, #[case] expected: &str) {
        let params = Params::new()
            .with("a", 1)
            .with("b", 2u8)
            .with("ratio", 1.5)
            .with("flag", true)
            .with("neg", -4_i64);

        assert_that!(interpolate(template, &params), eq(expected));
    }

    #[tokio::test]
    async fn test_load_uses_loader() {
        let source = MockSource::new().json(Locale::Fr, json!({"nav": {"home": "Accueil"}}));
        let loader = TranslationLoader::new(source);

        let t = Translator::load(&loader, Locale::Fr, DiagnosticsMode::Production).await;

        assert_that!(t.locale(), eq(Locale::Fr));
        assert_that!(t.t("nav.home"), eq("Accueil"));
        assert!(loader.is_cached(Locale::Fr));
    }
}
