//! テスト用ユーティリティ
//!
//! 複数のテストモジュールで使用される共通のヘルパーを提供します。
#![cfg(test)]

use std::collections::HashMap;
use std::io;
use std::sync::{
    Arc,
    Mutex,
    PoisonError,
};
use std::time::Duration;

use serde_json::Value;
use tracing_subscriber::fmt::MakeWriter;

use crate::input::{
    FetchError,
    TranslationSource,
};
use crate::locale::Locale;

/// `MockSource` の応答
#[derive(Debug, Clone)]
pub(crate) enum MockResponse {
    /// 毎回この JSON を返す
    Json(Value),
    /// 初回のみ失敗し、以降はこの JSON を返す
    FailOnce(Value),
    /// 毎回失敗する
    Fail,
}

/// ロケールごとに応答を設定できる `TranslationSource`
///
/// 呼び出し回数をロケール単位で記録します。未設定のロケールは 404 を返します。
#[derive(Debug, Default)]
pub(crate) struct MockSource {
    responses: HashMap<Locale, MockResponse>,
    delays: HashMap<Locale, Duration>,
    calls: Mutex<HashMap<Locale, usize>>,
}

impl MockSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, locale: Locale, response: MockResponse) -> Self {
        self.responses.insert(locale, response);
        self
    }

    pub(crate) fn json(self, locale: Locale, value: Value) -> Self {
        self.respond(locale, MockResponse::Json(value))
    }

    pub(crate) fn delay(mut self, locale: Locale, delay: Duration) -> Self {
        self.delays.insert(locale, delay);
        self
    }

    /// `locale` に対する fetch 回数
    pub(crate) fn calls(&self, locale: Locale) -> usize {
        self.lock_calls().get(&locale).copied().unwrap_or_default()
    }

    /// 全ロケールの fetch 回数の合計
    pub(crate) fn total_calls(&self) -> usize {
        self.lock_calls().values().sum()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<Locale, usize>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TranslationSource for MockSource {
    async fn fetch(&self, locale: Locale) -> Result<Value, FetchError> {
        let attempt = {
            let mut calls = self.lock_calls();
            let count = calls.entry(locale).or_default();
            *count += 1;
            *count
        };

        if let Some(delay) = self.delays.get(&locale) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&locale) {
            Some(MockResponse::Json(value)) => Ok(value.clone()),
            Some(MockResponse::FailOnce(value)) if attempt > 1 => Ok(value.clone()),
            Some(MockResponse::FailOnce(_) | MockResponse::Fail) => Err(FetchError::Status(500)),
            None => Err(FetchError::Status(404)),
        }
    }
}

/// tracing の出力を蓄積するバッファ
///
/// `tracing::subscriber::with_default` と組み合わせて、診断ログの有無を検証します。
#[derive(Debug, Clone, Default)]
pub(crate) struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// このバッファに書き込む subscriber
    pub(crate) fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish()
    }

    pub(crate) fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
