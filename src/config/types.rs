use std::path::PathBuf;
use std::time::Duration;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::input::source::DEFAULT_PATH_TEMPLATE;
use crate::locale::Locale;
use crate::translator::DiagnosticsMode;

/// `baseUrl` も `localesDir` も未指定のときに読むディレクトリ
pub const DEFAULT_LOCALES_DIR: &str = "public/locales";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// camelCase のフィールド名（例: "fetchTimeoutMs"）
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 1 行に 1 エラーの番号付きリスト
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `.i18n.json` の内容
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// 翻訳 JSON を HTTP で取得する場合のオリジン（例: `https://cdn.example.com`）
    ///
    /// `locales_dir` とは同時に指定できない。
    pub base_url: Option<String>,

    /// `base_url` に連結するパス。`{locale}` がロケールコードに置換される
    pub path_template: String,

    /// 翻訳 JSON (`{code}.json`) を置いたディレクトリ。相対パスはワークスペース基準
    pub locales_dir: Option<PathBuf>,

    /// 1 回の取得のタイムアウト。未指定なら無制限
    pub fetch_timeout_ms: Option<u64>,

    /// 開発モードでは欠落キーを警告として記録する
    pub mode: DiagnosticsMode,

    /// アプリが起動時に使うロケール。CLI の `--missing` の既定対象
    pub default_locale: String,
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            locales_dir: None,
            fetch_timeout_ms: None,
            mode: DiagnosticsMode::default(),
            default_locale: Locale::REFERENCE.code().to_string(),
        }
    }
}

/// 翻訳の取得元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// `{base_url}{path_template}` を HTTP で取得
    Http { base_url: String, path_template: String },
    /// ディレクトリ内の `{code}.json`
    Directory(PathBuf),
}

impl I18nSettings {
    /// # Errors
    /// - `baseUrl` と `localesDir` の両方が指定されている
    /// - `baseUrl` が http(s) の URL ではない
    /// - `pathTemplate` が空、または `{locale}` を含まない
    /// - `fetchTimeoutMs` が 0
    /// - `defaultLocale` が未対応のロケール
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.base_url.is_some() && self.locales_dir.is_some() {
            errors.push(ValidationError::new(
                "baseUrl/localesDir",
                "Cannot specify both 'baseUrl' and 'localesDir'. Please use only one",
            ));
        }

        if let Some(base_url) = &self.base_url
            && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
        {
            errors.push(ValidationError::new(
                "baseUrl",
                format!(
                    "Expected an http(s) URL, got '{base_url}'. Example: \"https://cdn.example.com\""
                ),
            ));
        }

        if self.path_template.is_empty() {
            errors.push(ValidationError::new(
                "pathTemplate",
                "The template cannot be empty. Example: \"/locales/{locale}.json\"",
            ));
        } else if !self.path_template.contains("{locale}") {
            errors.push(ValidationError::new(
                "pathTemplate",
                format!(
                    "The template '{}' must contain the {{locale}} placeholder",
                    self.path_template
                ),
            ));
        }

        if let Some(dir) = &self.locales_dir
            && dir.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Please specify a path, or remove this field",
            ));
        }

        if self.fetch_timeout_ms == Some(0) {
            errors.push(ValidationError::new(
                "fetchTimeoutMs",
                "The timeout must be greater than 0. Remove this field to disable the timeout",
            ));
        }

        if !crate::locale::is_supported(&self.default_locale) {
            let supported: Vec<&str> = Locale::ALL.iter().map(|locale| locale.code()).collect();
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "Unsupported locale '{}'. Supported: {}",
                    self.default_locale,
                    supported.join(", ")
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 設定されたデフォルトロケール。解釈できなければ参照ロケール
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        Locale::from_code(&self.default_locale).unwrap_or(Locale::REFERENCE)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// `baseUrl` があれば HTTP、なければ `localesDir`（既定値は [`DEFAULT_LOCALES_DIR`]）
    #[must_use]
    pub fn source_location(&self) -> SourceLocation {
        match &self.base_url {
            Some(base_url) => SourceLocation::Http {
                base_url: base_url.clone(),
                path_template: self.path_template.clone(),
            },
            None => SourceLocation::Directory(
                self.locales_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_LOCALES_DIR)),
            ),
        }
    }
}
