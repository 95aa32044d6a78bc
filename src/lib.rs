//! i18n-runtime
//!
//! 翻訳辞書の読み込み（キャッシュ・重複排除・リトライ・フォールバック）、
//! 複数形の選択、補間、ロケール別フォーマット、カバレッジ分析を提供するライブラリ

pub mod config;
pub mod coverage;
pub mod format;
pub mod input;
pub mod loader;
pub mod locale;
pub mod plural;
pub mod translator;

mod test_utils;

pub use loader::TranslationLoader;
pub use locale::Locale;
pub use translator::{
    DiagnosticsMode,
    Params,
    Translator,
};
