//! Durable on-disk cache of raw census responses.
//!
//! One file per `(table_id, geo_id)` at `<dir>/<table_id>.<geo_id>.json`
//! holding the response body verbatim. Entries never expire: once a key is
//! cached the network is not consulted for it again.

use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CensusError, Result};
use crate::services::census_api::CensusApi;

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, table_id: &str, geo_id: &str) -> PathBuf {
        self.dir.join(format!("{table_id}.{geo_id}.json"))
    }

    /// Returns the cached body, or `None` if the key has never been stored.
    pub fn read(&self, table_id: &str, geo_id: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(table_id, geo_id);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(cache_error(&path, e)),
        }
    }

    /// Stores `bytes` under the key.
    ///
    /// The body is written to a temp file in the cache directory and renamed
    /// into place, so concurrent runs never observe a partial entry.
    pub fn write(&self, table_id: &str, geo_id: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(table_id, geo_id);
        std::fs::create_dir_all(&self.dir).map_err(|e| cache_error(&self.dir, e))?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| cache_error(&self.dir, e))?;
        tmp.write_all(bytes).map_err(|e| cache_error(tmp.path(), e))?;
        tmp.persist(&path).map_err(|e| cache_error(&path, e.error))?;

        Ok(path)
    }
}

fn cache_error(path: &Path, source: std::io::Error) -> CensusError {
    CensusError::Cache {
        path: path.display().to_string(),
        source,
    }
}

/// A [`CensusApi`] wrapper that serves from a [`ResponseCache`] and only
/// falls through to `inner` on a miss.
pub struct CachedApi<A> {
    pub inner: A,
    pub cache: ResponseCache,
}

impl<A> CachedApi<A> {
    pub fn new(inner: A, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<A: CensusApi> CensusApi for CachedApi<A> {
    async fn fetch_raw(&self, table_id: &str, geo_id: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.cache.read(table_id, geo_id)? {
            debug!(table_id, geo_id, "Cache hit");
            return Ok(bytes);
        }

        let path = self.cache.path(table_id, geo_id);
        info!(path = %path.display(), "Getting data");
        let bytes = self.inner.fetch_raw(table_id, geo_id).await?;

        // Only JSON gets cached; anything else would poison the key forever.
        serde_json::from_slice::<serde_json::Value>(&bytes)?;
        self.cache.write(table_id, geo_id, &bytes)?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingApi {
        body: Vec<u8>,
        calls: AtomicUsize,
    }

    impl CountingApi {
        fn new(body: &str) -> Self {
            Self {
                body: body.as_bytes().to_vec(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CensusApi for CountingApi {
        async fn fetch_raw(&self, _table_id: &str, _geo_id: &str) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    struct FailingApi;

    #[async_trait]
    impl CensusApi for FailingApi {
        async fn fetch_raw(&self, _table_id: &str, _geo_id: &str) -> Result<Vec<u8>> {
            Err(CensusError::Fetch {
                status: 500,
                url: "http://localhost/".to_string(),
            })
        }
    }

    #[test]
    fn test_cache_path_layout() {
        let cache = ResponseCache::new("./cache");
        assert_eq!(
            cache.path("B03002", "05000US06037"),
            PathBuf::from("./cache/B03002.05000US06037.json")
        );
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        assert!(cache.read("B01001", "04000US39").unwrap().is_none());
    }

    #[test]
    fn test_write_creates_directory_and_stores_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path().join("nested"));
        let body = br#"{"data": {},   "tables": {}}"#;

        let path = cache.write("B01001", "04000US39", body).unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), body);
        assert_eq!(cache.read("B01001", "04000US39").unwrap().unwrap(), body);
        // Only the entry itself, no leftover temp files.
        assert_eq!(std::fs::read_dir(cache.dir()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_cached_api_fetches_once() {
        let dir = tempfile::tempdir().unwrap();
        let api = CachedApi::new(CountingApi::new(r#"{"ok": true}"#), ResponseCache::new(dir.path()));

        let first = api.fetch_raw("B19001", "04000US37").await.unwrap();
        let second = api.fetch_raw("B19001", "04000US37").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(api.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_api_hit_skips_inner() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path());
        cache.write("B16007", "04000US45", br#"{"cached": 1}"#).unwrap();

        let api = CachedApi::new(FailingApi, cache);
        let bytes = api.fetch_raw("B16007", "04000US45").await.unwrap();
        assert_eq!(bytes, br#"{"cached": 1}"#);
    }

    #[tokio::test]
    async fn test_cached_api_does_not_cache_errors() {
        let dir = tempfile::tempdir().unwrap();
        let api = CachedApi::new(FailingApi, ResponseCache::new(dir.path()));

        let result = api.fetch_raw("B16007", "04000US45").await;
        assert!(matches!(result, Err(CensusError::Fetch { status: 500, .. })));
        assert!(api.cache.read("B16007", "04000US45").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cached_api_rejects_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let api = CachedApi::new(CountingApi::new("<html>"), ResponseCache::new(dir.path()));

        let result = api.fetch_raw("B01001", "04000US39").await;
        assert!(matches!(result, Err(CensusError::Parse(_))));
        assert!(api.cache.read("B01001", "04000US39").unwrap().is_none());
    }
}
