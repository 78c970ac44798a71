//! Resolved per-document settings and their cache.
//!
//! When the host can answer scoped configuration requests, settings are fetched once per
//! document URI and cached until the host signals a configuration change. Otherwise a
//! single process-wide value is used, replaced only by configuration-change notifications.
//!
//! Concurrent resolves for the same URI share one in-flight fetch. A failed fetch leaves
//! nothing behind, so the next pass asks again.

use serde::Deserialize;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell, RwLock};

pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub max_number_of_problems: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings payload: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("maxNumberOfProblems must be a non-negative number, got {0}")]
    OutOfRange(Number),
}

/// Client payload; every key is optional and falls back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialSettings {
    max_number_of_problems: Option<Number>,
}

/// Whole-number limit from a JSON number; fractional values are floored.
fn problem_limit(number: &Number) -> Result<usize, SettingsError> {
    if let Some(limit) = number.as_u64() {
        return Ok(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    match number.as_f64() {
        // float-to-int `as` saturates at usize::MAX
        Some(limit) if limit.is_finite() && limit >= 0.0 => Ok(limit.floor() as usize),
        _ => Err(SettingsError::OutOfRange(number.clone())),
    }
}

impl Settings {
    /// Merge a client-supplied settings object over `defaults`.
    ///
    /// `null` and non-object payloads carry no overrides. Unknown keys are ignored.
    /// `maxNumberOfProblems` accepts any non-negative number and is floored.
    pub fn from_value(value: &Value, defaults: &Settings) -> Result<Settings, SettingsError> {
        if !value.is_object() {
            return Ok(*defaults);
        }
        let partial = PartialSettings::deserialize(value)?;
        let max_number_of_problems = match &partial.max_number_of_problems {
            Some(number) => problem_limit(number)?,
            None => defaults.max_number_of_problems,
        };
        Ok(Settings {
            max_number_of_problems,
        })
    }
}

type Slot = Arc<OnceCell<Settings>>;

#[derive(Debug)]
pub struct SettingsCache {
    scoped: bool,
    global: RwLock<Settings>,
    documents: Mutex<HashMap<String, Slot>>,
}

impl SettingsCache {
    /// `scoped` is whether the host answers per-document configuration requests.
    pub fn new(scoped: bool, global: Settings) -> Self {
        Self {
            scoped,
            global: RwLock::new(global),
            documents: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_scoped(&self) -> bool {
        self.scoped
    }

    /// Settings for `uri`, calling `fetch` only on a scoped cache miss.
    pub async fn resolve<F, Fut, E>(&self, uri: &str, fetch: F) -> Result<Settings, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Settings, E>>,
    {
        if !self.scoped {
            return Ok(*self.global.read().await);
        }
        let slot = {
            let mut documents = self.documents.lock().await;
            documents.entry(uri.to_string()).or_default().clone()
        };
        slot.get_or_try_init(fetch).await.copied()
    }

    /// Replace the process-wide value used when the host has no scoped configuration.
    pub async fn set_global(&self, settings: Settings) {
        *self.global.write().await = settings;
    }

    pub async fn global(&self) -> Settings {
        *self.global.read().await
    }

    /// Drop every cached document entry.
    pub async fn clear(&self) {
        self.documents.lock().await.clear();
    }

    pub async fn remove(&self, uri: &str) {
        self.documents.lock().await.remove(uri);
    }

    pub async fn cached_documents(&self) -> usize {
        self.documents.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn limited(max: usize) -> Settings {
        Settings {
            max_number_of_problems: max,
        }
    }

    #[test]
    fn from_value_merges_over_defaults() {
        let defaults = limited(10);
        let merged = Settings::from_value(&json!({ "maxNumberOfProblems": 3 }), &defaults);
        assert_eq!(merged.unwrap(), limited(3));
        let untouched = Settings::from_value(&json!({ "other": true }), &defaults);
        assert_eq!(untouched.unwrap(), defaults);
        assert_eq!(Settings::from_value(&Value::Null, &defaults).unwrap(), defaults);
    }

    #[test]
    fn from_value_floors_fractional_limits() {
        let defaults = limited(10);
        for (payload, expected) in [
            (json!({ "maxNumberOfProblems": 50.0 }), 50),
            (json!({ "maxNumberOfProblems": 1e3 }), 1000),
            (json!({ "maxNumberOfProblems": 2.7 }), 2),
            (json!({ "maxNumberOfProblems": 0.5 }), 0),
        ] {
            assert_eq!(Settings::from_value(&payload, &defaults).unwrap(), limited(expected));
        }
    }

    #[test]
    fn from_value_rejects_negative_limits() {
        for payload in [
            json!({ "maxNumberOfProblems": -1 }),
            json!({ "maxNumberOfProblems": -0.5 }),
        ] {
            let result = Settings::from_value(&payload, &limited(10));
            assert!(matches!(result, Err(SettingsError::OutOfRange(_))));
        }
    }

    #[test]
    fn from_value_rejects_non_numeric_limits() {
        let result = Settings::from_value(&json!({ "maxNumberOfProblems": "ten" }), &limited(10));
        assert!(matches!(result, Err(SettingsError::Invalid(_))));
    }

    #[tokio::test]
    async fn global_mode_never_fetches() {
        let cache = SettingsCache::new(false, limited(7));
        let resolved: Result<Settings, ()> = cache
            .resolve("file:///a", || async { Ok(limited(99)) })
            .await;
        assert_eq!(resolved, Ok(limited(7)));
        assert_eq!(cache.cached_documents().await, 0);

        cache.set_global(limited(2)).await;
        let resolved: Result<Settings, ()> = cache
            .resolve("file:///a", || async { Ok(limited(99)) })
            .await;
        assert_eq!(resolved, Ok(limited(2)));
    }

    #[tokio::test]
    async fn scoped_mode_caches_until_cleared() {
        let cache = SettingsCache::new(true, Settings::default());
        let fetches = AtomicUsize::new(0);
        let fetch = |max| {
            let fetches = &fetches;
            move || async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(limited(max))
            }
        };

        assert_eq!(cache.resolve("file:///a", fetch(1)).await, Ok(limited(1)));
        assert_eq!(cache.resolve("file:///a", fetch(2)).await, Ok(limited(1)));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        cache.clear().await;
        assert_eq!(cache.resolve("file:///a", fetch(2)).await, Ok(limited(2)));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = SettingsCache::new(true, Settings::default());
        let failed = cache
            .resolve("file:///a", || async { Err::<Settings, _>("offline") })
            .await;
        assert_eq!(failed, Err("offline"));
        let resolved = cache
            .resolve("file:///a", || async { Ok::<_, &str>(limited(4)) })
            .await;
        assert_eq!(resolved, Ok(limited(4)));
    }

    #[tokio::test]
    async fn remove_forgets_one_document() {
        let cache = SettingsCache::new(true, Settings::default());
        for uri in ["file:///a", "file:///b"] {
            let _ = cache
                .resolve(uri, || async { Ok::<_, ()>(limited(1)) })
                .await;
        }
        assert_eq!(cache.cached_documents().await, 2);
        cache.remove("file:///a").await;
        assert_eq!(cache.cached_documents().await, 1);
    }
}
