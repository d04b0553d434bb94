//! Filesystem store with lazy TTL eviction.
//!
//! Every operation is best effort: I/O and parse failures are logged and
//! degrade to a miss or a skipped write. A cache fault never fails a lookup.

use super::entry::{CacheEntry, Lookup};
use super::hash::{ENTRY_SUFFIX, entry_file_name, origin_label};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tokio::fs;

/// Default entry lifetime (24 hours).
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Disk-backed cache handle.
///
/// Cheap to clone; holds only the root path and TTL. There is no locking:
/// concurrent writers to the same key are last-writer-wins.
#[derive(Clone, Debug)]
pub struct DiskCache {
    root: PathBuf,
    ttl: Duration,
}

impl DiskCache {
    /// Create a handle without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { root: root.into(), ttl }
    }

    /// Create a handle and make sure the root directory exists.
    pub async fn open(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        let cache = Self::new(root, ttl);
        cache.ensure_root().await;
        cache
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Storage location for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(origin_label(key)).join(entry_file_name(key))
    }

    /// Fetch the payload stored under `key`, if present and fresh.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).await.into_content()
    }

    /// Read `key`, distinguishing why nothing was returned.
    ///
    /// Stale entries are deleted as a side effect.
    pub async fn lookup(&self, key: &str) -> Lookup {
        let path = self.entry_path(key);
        let lookup = self.read_entry(&path).await;
        match &lookup {
            Lookup::Hit(_) => tracing::debug!(key, "cache hit"),
            Lookup::Miss => tracing::debug!(key, "cache miss"),
            Lookup::Expired => tracing::debug!(key, "cache entry expired"),
            Lookup::Unreadable => tracing::debug!(key, "cache entry unreadable, treating as miss"),
        }
        lookup
    }

    /// Store `content` under `key`, replacing any previous entry.
    pub async fn set(&self, key: &str, content: &str) {
        let path = self.entry_path(key);

        if let Some(parent) = path.parent()
            && let Err(e) = fs::create_dir_all(parent).await
        {
            tracing::warn!(dir = %parent.display(), error = %e, "failed to create cache partition");
            return;
        }

        let entry = CacheEntry::new(content);
        let json = match serde_json::to_string_pretty(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        // Readers only ever see a complete file: write aside, then rename over.
        let tmp_path = temp_path_for(&path);
        if let Err(e) = fs::write(&tmp_path, json).await {
            tracing::warn!(file = %tmp_path.display(), error = %e, "failed to write cache entry");
            return;
        }

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            tracing::warn!(file = %path.display(), error = %e, "failed to commit cache entry");
            let _ = fs::remove_file(&tmp_path).await;
        }
    }

    /// Delete every entry and recreate an empty root.
    pub async fn clear(&self) {
        match fs::remove_dir_all(&self.root).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(dir = %self.root.display(), error = %e, "failed to clear cache directory");
            }
        }
        self.ensure_root().await;
    }

    /// Sweep the whole tree and delete stale entries.
    ///
    /// Returns the number of entries removed. Unreadable entries are left
    /// alone, exactly as on the read path.
    pub async fn purge_expired(&self) -> usize {
        let mut removed = 0;

        let mut partitions = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                tracing::warn!(dir = %self.root.display(), error = %e, "failed to list cache directory");
                return 0;
            }
        };

        while let Ok(Some(partition)) = partitions.next_entry().await {
            if !partition.file_type().await.is_ok_and(|t| t.is_dir()) {
                continue;
            }
            let dir = partition.path();

            let mut files = match fs::read_dir(&dir).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "failed to list cache partition");
                    continue;
                }
            };

            while let Ok(Some(file)) = files.next_entry().await {
                let path = file.path();
                let is_entry = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(ENTRY_SUFFIX));
                if is_entry && self.read_entry(&path).await == Lookup::Expired {
                    removed += 1;
                }
            }
        }

        tracing::info!(removed, "purged expired cache entries");
        removed
    }

    async fn ensure_root(&self) {
        if let Err(e) = fs::create_dir_all(&self.root).await {
            tracing::warn!(dir = %self.root.display(), error = %e, "failed to create cache directory");
        }
    }

    /// Two-layer TTL check: file mtime first, then the embedded timestamp.
    async fn read_entry(&self, path: &Path) -> Lookup {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Lookup::Miss,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to stat cache entry");
                return Lookup::Unreadable;
            }
        };

        if let Ok(modified) = metadata.modified()
            && self.is_stale_since(modified)
        {
            self.evict(path).await;
            return Lookup::Expired;
        }

        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Lookup::Miss,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to read cache entry");
                return Lookup::Unreadable;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to parse cache entry");
                return Lookup::Unreadable;
            }
        };

        if entry.is_expired_at(chrono::Utc::now().timestamp_millis(), self.ttl) {
            self.evict(path).await;
            return Lookup::Expired;
        }

        Lookup::Hit(entry.content)
    }

    fn is_stale_since(&self, modified: SystemTime) -> bool {
        // A modification time in the future reads as age zero.
        SystemTime::now()
            .duration_since(modified)
            .is_ok_and(|age| age > self.ttl)
    }

    async fn evict(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "failed to evict cache entry"),
        }
    }
}

/// Sibling temp file, unique per process and write.
fn temp_path_for(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let seq = NEXT.fetch_add(1, Ordering::Relaxed);
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}-{seq}.tmp", std::process::id()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TTL: Duration = Duration::from_secs(60);

    async fn open_temp() -> (TempDir, DiskCache) {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::open(dir.path().join("cache"), TTL).await;
        (dir, cache)
    }

    fn write_raw(cache: &DiskCache, key: &str, entry: &CacheEntry) -> PathBuf {
        let path = cache.entry_path(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, serde_json::to_string(entry).unwrap()).unwrap();
        path
    }

    fn backdate_mtime(path: &Path, by: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[tokio::test]
    async fn test_open_creates_root() {
        let (_dir, cache) = open_temp().await;
        assert!(cache.root().is_dir());
        assert_eq!(cache.ttl(), TTL);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (_dir, cache) = open_temp().await;
        let key = "discovered_pages:limit=5:https://docs.example.com";

        cache.set(key, r#"[{"url":"https://docs.example.com/a"}]"#).await;

        assert_eq!(cache.get(key).await.as_deref(), Some(r#"[{"url":"https://docs.example.com/a"}]"#));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (_dir, cache) = open_temp().await;
        assert_eq!(cache.lookup("https://example.com/none").await, Lookup::Miss);
        assert!(cache.get("https://example.com/none").await.is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (_dir, cache) = open_temp().await;
        cache.set("https://example.com", "first").await;
        cache.set("https://example.com", "second").await;
        assert_eq!(cache.get("https://example.com").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_set_leaves_no_temp_files() {
        let (_dir, cache) = open_temp().await;
        let key = "https://docs.example.com/guide";
        cache.set(key, "first").await;
        cache.set(key, "second").await;

        let partition = cache.entry_path(key).parent().unwrap().to_path_buf();
        let names: Vec<String> = std::fs::read_dir(partition)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![entry_file_name(key)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rewrites_never_read_partial() {
        let (_dir, cache) = open_temp().await;
        let key = "discovered_pages:limit=5:https://docs.example.com";
        let payload = "x".repeat(64 * 1024);
        cache.set(key, &payload).await;

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let (cache, payload) = (cache.clone(), payload.clone());
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    cache.set(key, &payload).await;
                }
            }));
        }
        for _ in 0..8 {
            let (cache, payload) = (cache.clone(), payload.clone());
            tasks.push(tokio::spawn(async move {
                for _ in 0..10 {
                    assert_eq!(cache.lookup(key).await, Lookup::Hit(payload.clone()));
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_persisted_layout() {
        let (_dir, cache) = open_temp().await;
        let key = "https://docs.example.com/guide";
        cache.set(key, "payload").await;

        let path = cache.entry_path(key);
        assert_eq!(path.parent().unwrap(), cache.root().join("docs.example.com"));

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["content"], "payload");
        assert!(raw["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_expired_embedded_timestamp_evicts() {
        let (_dir, cache) = open_temp().await;
        let key = "https://example.com/old";
        let stale = CacheEntry {
            timestamp: chrono::Utc::now().timestamp_millis() - 61_000,
            content: "old".into(),
        };
        let path = write_raw(&cache, key, &stale);

        assert_eq!(cache.lookup(key).await, Lookup::Expired);
        assert!(!path.exists());
        assert!(cache.get(key).await.is_none());
    }

    #[tokio::test]
    async fn test_stale_mtime_evicts_without_reading() {
        let (_dir, cache) = open_temp().await;
        let key = "https://example.com/copied";
        cache.set(key, "fresh by timestamp").await;
        let path = cache.entry_path(key);
        backdate_mtime(&path, Duration::from_secs(120));

        assert_eq!(cache.lookup(key).await, Lookup::Expired);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss_and_kept() {
        let (_dir, cache) = open_temp().await;
        let key = "https://example.com/corrupt";
        let path = cache.entry_path(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(cache.lookup(key).await, Lookup::Unreadable);
        assert!(cache.get(key).await.is_none());
        assert!(path.exists());

        cache.set(key, "repaired").await;
        assert_eq!(cache.get(key).await.as_deref(), Some("repaired"));
    }

    #[tokio::test]
    async fn test_partitions_by_origin() {
        let (_dir, cache) = open_temp().await;
        let a = cache.entry_path("https://a.example.com/x");
        let b = cache.entry_path("https://b.example.com/x");
        assert_ne!(a.parent(), b.parent());

        let c = cache.entry_path("https://a.example.com/y");
        assert_eq!(a.parent(), c.parent());
        assert_ne!(a.file_name(), c.file_name());
    }

    #[tokio::test]
    async fn test_invalid_key_partition() {
        let (_dir, cache) = open_temp().await;
        cache.set("just a label", "value").await;
        assert!(cache.entry_path("just a label").starts_with(cache.root().join("_invalid")));
        assert_eq!(cache.get("just a label").await.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_set_recreates_missing_root() {
        let (_dir, cache) = open_temp().await;
        std::fs::remove_dir_all(cache.root()).unwrap();

        cache.set("https://example.com", "value").await;
        assert_eq!(cache.get("https://example.com").await.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let cache = DiskCache::new(&blocker, TTL);

        cache.set("https://example.com", "value").await;
        assert!(cache.get("https://example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (_dir, cache) = open_temp().await;
        cache.set("https://a.example.com", "1").await;
        cache.set("https://b.example.com", "2").await;

        cache.clear().await;

        assert!(cache.root().is_dir());
        assert_eq!(std::fs::read_dir(cache.root()).unwrap().count(), 0);
        assert!(cache.get("https://a.example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (_dir, cache) = open_temp().await;
        cache.set("https://example.com/fresh", "fresh").await;
        let old = CacheEntry { timestamp: 0, content: "old".into() };
        let old_path = write_raw(&cache, "https://example.com/old", &old);
        let copied = write_raw(&cache, "https://other.example.com/copied", &CacheEntry::new("copied"));
        backdate_mtime(&copied, Duration::from_secs(3600));

        assert_eq!(cache.purge_expired().await, 2);
        assert!(!old_path.exists());
        assert!(!copied.exists());
        assert_eq!(cache.get("https://example.com/fresh").await.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_purge_expired_missing_root() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("absent"), TTL);
        assert_eq!(cache.purge_expired().await, 0);
    }
}
