//! 翻訳カバレッジ分析
//!
//! 参照ロケール（英語）のキー集合を基準に、各ロケールの欠落キーと
//! カバレッジ率を算出します。

use std::collections::BTreeMap;
use std::io::{
    self,
    Write,
};

use chrono::{
    DateTime,
    Utc,
};
use futures::future::join_all;
use serde::Serialize;

use crate::input::{
    LeafKind,
    TranslationSource,
};
use crate::loader::TranslationLoader;
use crate::locale::Locale;
use crate::translator::DiagnosticsMode;

/// カバレッジレポート
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub reference_locale: Locale,
    pub generated_at: DateTime<Utc>,
    /// 参照ロケールのリーフキー数
    pub total_keys: usize,
    /// `Locale::ALL` 順。参照ロケールも含む
    pub locales: Vec<LocaleCoverage>,
    /// 参照ロケール以外のカバレッジ率の平均（四捨五入）
    pub overall_coverage: u32,
}

impl CoverageReport {
    /// `locale` のレコード
    #[must_use]
    pub fn locale(&self, locale: Locale) -> Option<&LocaleCoverage> {
        self.locales.iter().find(|record| record.locale == locale)
    }

    /// カバレッジ率が `threshold` % 未満の参照以外のロケール
    #[must_use]
    pub fn below(&self, threshold: u32) -> Vec<&LocaleCoverage> {
        self.locales
            .iter()
            .filter(|record| !record.locale.is_reference() && record.coverage_percent < threshold)
            .collect()
    }
}

/// ロケールごとのカバレッジ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCoverage {
    pub locale: Locale,
    pub total_keys: usize,
    pub translated_keys: usize,
    pub missing_keys: usize,
    /// 0〜100
    pub coverage_percent: u32,
    /// 欠落している、または種類が一致しないキー（ソート済み）
    pub missing_key_paths: Vec<String>,
}

impl LocaleCoverage {
    /// `keys` を参照ロケールのキー集合と比較する
    fn compute(
        locale: Locale,
        reference: &BTreeMap<String, LeafKind>,
        keys: &BTreeMap<String, LeafKind>,
    ) -> Self {
        let missing_key_paths: Vec<String> = reference
            .iter()
            .filter(|&(key, kind)| keys.get(key) != Some(kind))
            .map(|(key, _)| key.clone())
            .collect();
        let total_keys = reference.len();
        let missing_keys = missing_key_paths.len();
        let translated_keys = total_keys.saturating_sub(missing_keys);

        Self {
            locale,
            total_keys,
            translated_keys,
            missing_keys,
            coverage_percent: percent(translated_keys, total_keys),
            missing_key_paths,
        }
    }
}

/// `round(100 * part / total)` を 0..=100 に収める。`total` が 0 なら 100
fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    let part = part.min(total);
    let rounded = (200 * part + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100).min(100)
}

/// `values` の平均（四捨五入）。空なら 100
fn rounded_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 100;
    }
    let count = u64::try_from(values.len()).unwrap_or(u64::MAX);
    let sum: u64 = values.iter().copied().map(u64::from).sum();
    u32::try_from((2 * sum + count) / (2 * count)).unwrap_or(100)
}

/// Loader 経由で全ロケールを読み込み、参照ロケールと比較する
#[derive(Debug)]
pub struct CoverageAnalyzer<'a, S> {
    loader: &'a TranslationLoader<S>,
}

impl<'a, S: TranslationSource> CoverageAnalyzer<'a, S> {
    #[must_use]
    pub const fn new(loader: &'a TranslationLoader<S>) -> Self {
        Self { loader }
    }

    /// 全対応ロケールを読み込み、参照ロケールと比較する
    pub async fn generate_coverage_report(&self) -> CoverageReport {
        let loaded = join_all(Locale::ALL.into_iter().map(|locale| self.keys_of(locale))).await;
        let reference = Locale::ALL
            .into_iter()
            .zip(&loaded)
            .find_map(|(locale, keys)| locale.is_reference().then_some(keys))
            .cloned()
            .unwrap_or_default();

        let locales: Vec<LocaleCoverage> = Locale::ALL
            .into_iter()
            .zip(&loaded)
            .map(|(locale, keys)| LocaleCoverage::compute(locale, &reference, keys))
            .collect();
        let percents: Vec<u32> = locales
            .iter()
            .filter(|record| !record.locale.is_reference())
            .map(|record| record.coverage_percent)
            .collect();

        let report = CoverageReport {
            reference_locale: Locale::REFERENCE,
            generated_at: Utc::now(),
            total_keys: reference.len(),
            overall_coverage: rounded_mean(&percents),
            locales,
        };
        tracing::info!(
            total_keys = report.total_keys,
            overall = report.overall_coverage,
            "Coverage report generated"
        );
        report
    }

    /// `locale` の欠落キー。参照ロケールでは常に空
    pub async fn get_missing_translations(&self, locale: Locale) -> Vec<String> {
        if locale.is_reference() {
            return Vec::new();
        }
        let (reference, keys) =
            futures::join!(self.keys_of(Locale::REFERENCE), self.keys_of(locale));
        LocaleCoverage::compute(locale, &reference, &keys).missing_key_paths
    }

    /// `locale` のフラット化したキー。自身の辞書を読み込めなければ空
    async fn keys_of(&self, locale: Locale) -> BTreeMap<String, LeafKind> {
        let resolution = self.loader.resolve(locale).await;
        if resolution.is_fallback(locale) {
            tracing::warn!(
                %locale,
                source = ?resolution.source,
                "Translations not loaded, counting every key as missing"
            );
            return BTreeMap::new();
        }
        resolution.dictionary.flatten()
    }
}

/// 人が読む形式のレポートを `out` に書き出す
///
/// `include_details` が真なら、各ロケールの下に欠落キーを列挙する
pub fn print_coverage_report<W: Write>(
    report: &CoverageReport,
    include_details: bool,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Translation coverage")?;
    writeln!(
        out,
        "Reference: {} ({}), {} keys",
        report.reference_locale,
        report.reference_locale.display_name(),
        report.total_keys
    )?;
    writeln!(out, "Generated: {}", report.generated_at.to_rfc3339())?;
    writeln!(out)?;

    for record in &report.locales {
        writeln!(
            out,
            "  {:<4}{:<16}{:>4}%  {}/{} translated, {} missing",
            record.locale.code(),
            record.locale.display_name(),
            record.coverage_percent,
            record.translated_keys,
            record.total_keys,
            record.missing_keys
        )?;
        if include_details {
            for key in &record.missing_key_paths {
                writeln!(out, "        - {key}")?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Overall coverage: {}%", report.overall_coverage)
}

/// 開発モードなら欠落キーを 1 件ずつ `warn` で記録し、記録した件数を返す
///
/// 本番モードでは何も記録しない。
#[must_use]
pub fn log_missing_keys(report: &CoverageReport, mode: DiagnosticsMode) -> usize {
    if mode != DiagnosticsMode::Development {
        return 0;
    }
    let mut logged = 0;
    for record in &report.locales {
        for key in &record.missing_key_paths {
            tracing::warn!(key = %key, locale = %record.locale, "Missing translation");
            logged += 1;
        }
    }
    logged
}
