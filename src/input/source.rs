//! Transports that fetch a locale's raw translation document.

use std::future::Future;
use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;

use super::FetchError;
use crate::locale::Locale;

/// Resource path used when none is configured. `{locale}` is replaced by the locale code.
pub const DEFAULT_PATH_TEMPLATE: &str = "/locales/{locale}.json";

/// Fetches the JSON document holding one locale's translations.
///
/// A single call is a single attempt; retrying and falling back is the loader's job.
pub trait TranslationSource: Send + Sync + 'static {
    /// # Errors
    /// Any transport, status or parse failure of this attempt.
    fn fetch(&self, locale: Locale) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// Fetches `{base_url}{path_template}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    path_template: String,
}

impl HttpSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into(), path_template: DEFAULT_PATH_TEMPLATE.to_string() }
    }

    #[must_use]
    pub fn with_path_template(mut self, path_template: impl Into<String>) -> Self {
        self.path_template = path_template.into();
        self
    }

    /// URL requested for `locale`.
    #[must_use]
    pub fn url_for(&self, locale: Locale) -> String {
        let path = self.path_template.replace("{locale}", locale.code());
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl TranslationSource for HttpSource {
    async fn fetch(&self, locale: Locale) -> Result<Value, FetchError> {
        let url = self.url_for(locale);
        tracing::debug!(%url, "Requesting translations");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Parsed separately so a bad body is reported as a parse failure
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Reads `{root}/{code}.json` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, locale: Locale) -> PathBuf {
        self.root.join(format!("{}.json", locale.code()))
    }
}

impl TranslationSource for DirectorySource {
    async fn fetch(&self, locale: Locale) -> Result<Value, FetchError> {
        let path = self.path_for(locale);
        tracing::debug!(path = %path.display(), "Reading translations");

        let content = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
