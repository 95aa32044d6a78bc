//! Translation loading with caching, request de-duplication and fallback.
//!
//! # Failure policy
//!
//! | Requested | First attempt | Retry | Then |
//! |-----------|---------------|-------|------|
//! | any locale | fails | succeeds | cached under the requested locale |
//! | non-reference | fails | fails | reference locale is loaded (and cached under its own key) |
//! | reference | fails | fails | empty dictionary, nothing cached |
//!
//! Worst case for one `load` is four fetches: two for the requested locale and
//! two for the reference locale.
//!
//! # Clearing while loading
//!
//! `clear_cache` drops matching in-flight loads. Callers already waiting on such
//! a load still receive its result, but the result is not written to the cache.

use std::collections::HashMap;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
    Weak,
};
use std::time::Duration;

use futures::FutureExt;
use futures::future::{
    BoxFuture,
    Shared,
};

use crate::input::{
    Dictionary,
    FetchError,
    TranslationSource,
};
use crate::locale::Locale;

/// Outcome of resolving a locale.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub dictionary: Arc<Dictionary>,
    /// Locale that supplied `dictionary`; `None` when every attempt failed.
    pub source: Option<Locale>,
}

impl Resolution {
    /// True if the dictionary came from a different locale than `requested`.
    #[must_use]
    pub fn is_fallback(&self, requested: Locale) -> bool {
        self.source != Some(requested)
    }
}

/// Loader tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoaderOptions {
    /// Upper bound for a single fetch attempt. A timeout counts as a failed attempt.
    pub fetch_timeout: Option<Duration>,
}

/// Load shared by every caller waiting on the same locale
type LoadFuture = Shared<BoxFuture<'static, Resolution>>;

/// A load that has started but not settled yet.
struct InFlight {
    /// Distinguishes this load from a later one for the same locale
    id: u64,
    /// Joined by every caller
    future: LoadFuture,
}

/// Cache contents. The lock is never held across an `.await`.
#[derive(Default)]
struct CacheState {
    /// Dictionaries fetched successfully
    dictionaries: HashMap<Locale, Arc<Dictionary>>,
    /// Loads still running
    in_flight: HashMap<Locale, InFlight>,
}

/// Shared by every clone of a loader
struct Inner<S> {
    /// Shared with in-flight loads
    source: Arc<S>,
    /// Tuning applied to every fetch
    options: LoaderOptions,
    /// Cache and in-flight loads
    state: Mutex<CacheState>,
    /// Source of `InFlight::id`
    next_id: AtomicU64,
}

/// Outcome of looking up a locale under the lock
enum Begin {
    /// Cache hit
    Ready(Resolution),
    /// Join this load
    Waiting(LoadFuture),
}

/// Drives one in-flight load.
///
/// The future is stored in the cache it settles into, so it must only hold the
/// cache weakly.
struct Load<S> {
    /// Cache to settle into; gone once every loader handle is dropped
    loader: Weak<Inner<S>>,
    /// Where translations come from
    source: Arc<S>,
    /// Copied from the loader
    options: LoaderOptions,
}

/// Loads and caches per-locale dictionaries.
///
/// Cloning is cheap and every clone shares the same cache.
pub struct TranslationLoader<S> {
    /// State shared by clones
    inner: Arc<Inner<S>>,
}

impl<S> Clone for TranslationLoader<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S> std::fmt::Debug for TranslationLoader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_state();
        let mut cached: Vec<_> = state.dictionaries.keys().copied().collect();
        cached.sort_unstable();
        let mut loading: Vec<_> = state.in_flight.keys().copied().collect();
        loading.sort_unstable();
        f.debug_struct("TranslationLoader")
            .field("options", &self.inner.options)
            .field("cached", &cached)
            .field("in_flight", &loading)
            .finish_non_exhaustive()
    }
}

impl<S> Inner<S> {
    /// Locks the cache, recovering from a poisoned lock
    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: TranslationSource> TranslationLoader<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_options(source, LoaderOptions::default())
    }

    #[must_use]
    pub fn with_options(source: S, options: LoaderOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: Arc::new(source),
                options,
                state: Mutex::new(CacheState::default()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Dictionary for `locale`, from the cache when possible.
    ///
    /// Never fails: the worst case is an empty dictionary.
    pub async fn load(&self, locale: Locale) -> Arc<Dictionary> {
        self.resolve(locale).await.dictionary
    }

    /// Like [`load`](Self::load), but also reports which locale supplied the dictionary.
    pub async fn resolve(&self, locale: Locale) -> Resolution {
        match self.begin(locale) {
            Begin::Ready(resolution) => resolution,
            Begin::Waiting(future) => future.await,
        }
    }

    /// Starts loading `locale` in the background and returns immediately.
    ///
    /// Does nothing if `locale` is cached or no tokio runtime is running.
    pub fn preload(&self, locale: Locale) {
        if self.is_cached(locale) {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(%locale, "No async runtime available, skipping preload");
            return;
        };

        let loader = self.clone();
        drop(runtime.spawn(async move {
            let resolution = loader.resolve(locale).await;
            if resolution.is_fallback(locale) {
                tracing::debug!(%locale, source = ?resolution.source, "Preload fell back");
            }
        }));
    }

    /// Removes `locale` from the cache, or every locale when `None`.
    pub fn clear_cache(&self, locale: Option<Locale>) {
        let mut state = self.inner.lock_state();
        match locale {
            Some(locale) => {
                state.dictionaries.remove(&locale);
                state.in_flight.remove(&locale);
            }
            None => {
                state.dictionaries.clear();
                state.in_flight.clear();
            }
        }
        tracing::debug!(locale = ?locale, "Translation cache cleared");
    }

    #[must_use]
    pub fn is_cached(&self, locale: Locale) -> bool {
        self.inner.lock_state().dictionaries.contains_key(&locale)
    }

    /// Cached locales, in registry order.
    #[must_use]
    pub fn cached_locales(&self) -> Vec<Locale> {
        let state = self.inner.lock_state();
        Locale::ALL.into_iter().filter(|locale| state.dictionaries.contains_key(locale)).collect()
    }

    /// Returns the cached dictionary, joins the in-flight load, or starts a new one.
    fn begin(&self, locale: Locale) -> Begin {
        let mut state = self.inner.lock_state();
        if let Some(dictionary) = state.dictionaries.get(&locale) {
            return Begin::Ready(Resolution {
                dictionary: Arc::clone(dictionary),
                source: Some(locale),
            });
        }
        if let Some(in_flight) = state.in_flight.get(&locale) {
            return Begin::Waiting(in_flight.future.clone());
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let load = Load {
            loader: Arc::downgrade(&self.inner),
            source: Arc::clone(&self.inner.source),
            options: self.inner.options,
        };
        let future = load.run(locale, id).boxed().shared();
        state.in_flight.insert(locale, InFlight { id, future: future.clone() });
        Begin::Waiting(future)
    }
}

impl<S: TranslationSource> Load<S> {
    /// Fetches `locale`, falls back to the reference locale, then settles.
    async fn run(self, locale: Locale, id: u64) -> Resolution {
        let resolution = match self.fetch_with_retry(locale).await {
            Ok(dictionary) => Resolution { dictionary: Arc::new(dictionary), source: Some(locale) },
            Err(error) if locale.is_reference() => {
                tracing::error!(%locale, %error, "Reference translations unavailable, using empty dictionary");
                Resolution { dictionary: Arc::default(), source: None }
            }
            Err(error) => {
                tracing::warn!(
                    %locale,
                    %error,
                    fallback = %Locale::REFERENCE,
                    "Failed to load translations, falling back"
                );
                // The upgraded handle is released before awaiting
                let fallback = self
                    .loader
                    .upgrade()
                    .map(|inner| TranslationLoader { inner }.begin(Locale::REFERENCE));
                match fallback {
                    Some(Begin::Ready(resolution)) => resolution,
                    Some(Begin::Waiting(future)) => future.await,
                    None => {
                        tracing::debug!(%locale, "Loader dropped, skipping fallback");
                        Resolution { dictionary: Arc::default(), source: None }
                    }
                }
            }
        };

        self.settle(locale, id, &resolution);
        resolution
    }

    /// Removes the in-flight entry and caches a direct success.
    fn settle(&self, locale: Locale, id: u64, resolution: &Resolution) {
        let Some(inner) = self.loader.upgrade() else {
            return;
        };
        let mut state = inner.lock_state();
        if state.in_flight.get(&locale).is_none_or(|in_flight| in_flight.id != id) {
            tracing::debug!(%locale, "Cache cleared during load, result not cached");
            return;
        }
        state.in_flight.remove(&locale);

        // A fallback result is cached by the reference locale's own load
        if resolution.source == Some(locale) {
            state.dictionaries.insert(locale, Arc::clone(&resolution.dictionary));
        }
    }

    /// Fetches `locale`, retrying once on failure
    async fn fetch_with_retry(&self, locale: Locale) -> Result<Dictionary, FetchError> {
        match self.fetch_once(locale).await {
            Ok(dictionary) => Ok(dictionary),
            Err(error) => {
                tracing::warn!(%locale, %error, "Failed to load translations, retrying once");
                self.fetch_once(locale).await
            }
        }
    }

    /// One fetch attempt, bounded by the configured timeout
    async fn fetch_once(&self, locale: Locale) -> Result<Dictionary, FetchError> {
        tracing::debug!(%locale, "Fetching translations");
        let fetch = self.source.fetch(locale);
        let value = match self.options.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| FetchError::Timeout(limit.as_millis()))??,
            None => fetch.await?,
        };
        Dictionary::from_json(value)
    }
}
