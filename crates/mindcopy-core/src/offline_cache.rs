//! Offline cache worker: precache a versioned asset manifest, then answer every asset
//! request cache-first with a network fallback.
//!
//! Lifecycle: `Parsed → Installing → Installed → Activating → Activated`. A failed
//! install ends in `Redundant` and writes nothing; caches of earlier versions stay in
//! place and keep answering `fetch`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::error::{CacheError, CacheResult};
use crate::policy;

pub const DEFAULT_CACHE_VERSION: &str = "mindcopy-202508190523";

/// Assets precached on install, in request form.
pub const DEFAULT_ASSET_MANIFEST: [&str; 8] = [
    "./",
    "./index.html",
    "./styles.css",
    "./script.js",
    "./manifest.json",
    "./data/HEART_CORE_v3_1.md",
    "./data/HEART_CORE_FreeLayer_v1.md",
    "./data/SevenDay_Cahetel_Ritual.md",
];

const TREE_PREFIX: &str = "cache/";
const META_TREE: &str = "cache_meta";

/// Stored (or passed-through) response for one asset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalizes a request path into a cache key: `./` and leading `/` are dropped, so
/// `./`, `/` and `` all name the root.
pub fn normalize_path(path: &str) -> String {
    let p = path.trim();
    let p = p.strip_prefix("./").unwrap_or(p);
    let p = if p == "." { "" } else { p };
    p.trim_start_matches('/').to_string()
}

/// Content type guessed from the file extension.
pub fn content_type_for(path: &str) -> &'static str {
    let ext = path.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "" | "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "md" => "text/markdown; charset=utf-8",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// The network side of the worker.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, path: &str) -> CacheResult<CachedResponse>;
}

/// Named cache regions keyed by version string.
pub trait CacheStorage: Send + Sync {
    /// Region names, oldest (first created) first.
    fn keys(&self) -> CacheResult<Vec<String>>;
    /// Creates (or replaces) `region` holding exactly `entries`.
    fn put_region(&self, region: &str, entries: Vec<(String, CachedResponse)>) -> CacheResult<()>;
    /// Returns true when the region existed.
    fn delete(&self, region: &str) -> CacheResult<bool>;
    fn lookup(&self, region: &str, path: &str) -> CacheResult<Option<CachedResponse>>;

    /// Searches every region, oldest first.
    fn match_any(&self, path: &str) -> CacheResult<Option<CachedResponse>> {
        for region in self.keys()? {
            if let Some(hit) = self.lookup(&region, path)? {
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }
}

/// Cache regions as Sled trees named `cache/<version>`. A `cache_meta` tree maps each
/// region to its creation sequence number, which gives `keys` its order.
pub struct SledCacheStorage {
    db: sled::Db,
    meta: sled::Tree,
}

impl SledCacheStorage {
    pub fn open(path: impl AsRef<std::path::Path>) -> CacheResult<Self> {
        Self::with_db(sled::open(path)?)
    }

    pub fn temporary() -> CacheResult<Self> {
        Self::with_db(sled::Config::new().temporary(true).open()?)
    }

    fn with_db(db: sled::Db) -> CacheResult<Self> {
        let meta = db.open_tree(META_TREE)?;
        Ok(Self { db, meta })
    }

    fn tree_name(region: &str) -> String {
        format!("{}{}", TREE_PREFIX, region)
    }
}

impl CacheStorage for SledCacheStorage {
    fn keys(&self) -> CacheResult<Vec<String>> {
        let mut regions = Vec::new();
        for item in self.meta.iter() {
            let (name, seq) = item?;
            let seq = <[u8; 8]>::try_from(&seq[..])
                .map(u64::from_be_bytes)
                .unwrap_or(u64::MAX);
            regions.push((seq, String::from_utf8_lossy(&name).into_owned()));
        }
        regions.sort();
        Ok(regions.into_iter().map(|(_, name)| name).collect())
    }

    fn put_region(&self, region: &str, entries: Vec<(String, CachedResponse)>) -> CacheResult<()> {
        let tree = self.db.open_tree(Self::tree_name(region))?;
        let mut batch = sled::Batch::default();
        for (path, response) in &entries {
            batch.insert(path.as_bytes(), serde_json::to_vec(response)?);
        }
        tree.clear()?;
        tree.apply_batch(batch)?;
        tree.flush()?;
        // Replacing a region keeps its original place in the order.
        if !self.meta.contains_key(region.as_bytes())? {
            let seq = self.db.generate_id()?;
            self.meta.insert(region.as_bytes(), seq.to_be_bytes().to_vec())?;
            self.meta.flush()?;
        }
        Ok(())
    }

    fn delete(&self, region: &str) -> CacheResult<bool> {
        let registered = self.meta.remove(region.as_bytes())?.is_some();
        self.meta.flush()?;
        let dropped = self.db.drop_tree(Self::tree_name(region))?;
        Ok(registered || dropped)
    }

    fn lookup(&self, region: &str, path: &str) -> CacheResult<Option<CachedResponse>> {
        if !self.meta.contains_key(region.as_bytes())? {
            return Ok(None);
        }
        let tree = self.db.open_tree(Self::tree_name(region))?;
        match tree.get(path.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// Cache regions held in memory, in creation order.
#[derive(Default)]
pub struct MemoryCacheStorage {
    regions: Mutex<Vec<(String, Vec<(String, CachedResponse)>)>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn regions(&self) -> std::sync::MutexGuard<'_, Vec<(String, Vec<(String, CachedResponse)>)>> {
        self.regions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn keys(&self) -> CacheResult<Vec<String>> {
        Ok(self.regions().iter().map(|(k, _)| k.clone()).collect())
    }

    fn put_region(&self, region: &str, entries: Vec<(String, CachedResponse)>) -> CacheResult<()> {
        let mut regions = self.regions();
        match regions.iter().position(|(k, _)| k == region) {
            Some(i) => regions[i].1 = entries,
            None => regions.push((region.to_string(), entries)),
        }
        Ok(())
    }

    fn delete(&self, region: &str) -> CacheResult<bool> {
        let mut regions = self.regions();
        let before = regions.len();
        regions.retain(|(k, _)| k != region);
        Ok(regions.len() != before)
    }

    fn lookup(&self, region: &str, path: &str) -> CacheResult<Option<CachedResponse>> {
        Ok(self
            .regions()
            .iter()
            .find(|(k, _)| k == region)
            .and_then(|(_, entries)| entries.iter().find(|(p, _)| p == path))
            .map(|(_, r)| r.clone()))
    }
}

/// Reads assets from a static directory. The root path is served as `index.html`.
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetFetcher for DirFetcher {
    async fn fetch(&self, path: &str) -> CacheResult<CachedResponse> {
        let key = normalize_path(path);
        let file = if key.is_empty() || key.ends_with('/') {
            format!("{}index.html", key)
        } else {
            key
        };
        if file.split('/').any(|seg| seg == "..") {
            return Err(CacheError::Fetch {
                path: path.to_string(),
                reason: "path escapes the asset root".to_string(),
            });
        }
        match tokio::fs::read(self.root.join(&file)).await {
            Ok(body) => Ok(CachedResponse::ok(content_type_for(&file), body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CachedResponse {
                status: 404,
                content_type: "text/plain; charset=utf-8".to_string(),
                body: b"Not Found".to_vec(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fetches assets over HTTP relative to a base URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> CacheResult<CachedResponse> {
        let url = format!("{}/{}", self.base_url, normalize_path(path));
        let res = self.client.get(&url).send().await?;
        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = res.bytes().await?.to_vec();
        Ok(CachedResponse {
            status,
            content_type,
            body,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// Where a `fetch` answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

pub struct CacheWorker {
    version: String,
    manifest: Vec<String>,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn AssetFetcher>,
    state: RwLock<WorkerState>,
}

impl CacheWorker {
    pub fn new(
        version: impl Into<String>,
        manifest: Vec<String>,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            version: version.into(),
            manifest,
            storage,
            network,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// True once activation completed and the worker answers for open pages.
    pub async fn controls_clients(&self) -> bool {
        self.state().await == WorkerState::Activated
    }

    /// Picks up the region an earlier run installed for this version, without touching
    /// the network. Returns false and leaves the state alone when there is none.
    pub async fn resume(&self) -> CacheResult<bool> {
        if !self.storage.keys()?.contains(&self.version) {
            return Ok(false);
        }
        *self.state.write().await = WorkerState::Installed;
        tracing::info!(
            target: "mindcopy::cache",
            version = %self.version,
            "cache resumed from earlier install"
        );
        Ok(true)
    }

    /// Resume or install, then activate. The cache for a version is filled once; later
    /// starts with the same version serve what that install stored.
    pub async fn start(&self) -> CacheResult<Vec<String>> {
        if !self.resume().await? {
            self.install().await?;
        }
        self.activate().await
    }

    /// Fetches every manifest asset and stores them under the current version. Any
    /// failure aborts the install without writing.
    pub async fn install(&self) -> CacheResult<()> {
        *self.state.write().await = WorkerState::Installing;
        match self.fetch_manifest().await {
            Ok(entries) => {
                let count = entries.len();
                if let Err(e) = self.storage.put_region(&self.version, entries) {
                    self.fail_install(&e).await;
                    return Err(e);
                }
                *self.state.write().await = WorkerState::Installed;
                tracing::info!(
                    target: "mindcopy::cache",
                    version = %self.version,
                    assets = count,
                    "cache installed"
                );
                Ok(())
            }
            Err(e) => {
                self.fail_install(&e).await;
                Err(e)
            }
        }
    }

    async fn fail_install(&self, e: &CacheError) {
        *self.state.write().await = WorkerState::Redundant;
        tracing::warn!(
            target: "mindcopy::cache",
            version = %self.version,
            error = %e,
            policy = %policy::CACHE_INSTALL,
            "cache install failed"
        );
    }

    async fn fetch_manifest(&self) -> CacheResult<Vec<(String, CachedResponse)>> {
        let mut entries = Vec::with_capacity(self.manifest.len());
        for path in &self.manifest {
            let key = normalize_path(path);
            let response = self
                .network
                .fetch(path)
                .await
                .map_err(|e| CacheError::InstallFailed {
                    version: self.version.clone(),
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_ok() {
                return Err(CacheError::InstallFailed {
                    version: self.version.clone(),
                    path: path.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            entries.push((key, response));
        }
        Ok(entries)
    }

    /// Drops every region except the current version and takes control of clients.
    /// Returns the deleted region names.
    pub async fn activate(&self) -> CacheResult<Vec<String>> {
        {
            let mut state = self.state.write().await;
            if *state != WorkerState::Installed {
                return Err(CacheError::NotInstalled(self.version.clone()));
            }
            *state = WorkerState::Activating;
        }
        let mut deleted = Vec::new();
        for key in self.storage.keys()? {
            if key != self.version && self.storage.delete(&key)? {
                deleted.push(key);
            }
        }
        *self.state.write().await = WorkerState::Activated;
        tracing::info!(
            target: "mindcopy::cache",
            version = %self.version,
            deleted = ?deleted,
            "cache activated"
        );
        Ok(deleted)
    }

    /// Answers from any cache region, else from the network unmodified. Network
    /// answers are never written to the cache.
    pub async fn fetch(&self, path: &str) -> CacheResult<(CachedResponse, FetchSource)> {
        let key = normalize_path(path);
        if let Some(hit) = self.storage.match_any(&key)? {
            return Ok((hit, FetchSource::Cache));
        }
        tracing::debug!(target: "mindcopy::cache", path = %key, "cache miss; passing through");
        let response = self.network.fetch(path).await?;
        Ok((response, FetchSource::Network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Network double: fixed bodies, optional failing paths, call counter.
    #[derive(Default)]
    struct FakeNetwork {
        bodies: HashMap<String, String>,
        failing: Vec<String>,
        calls: AtomicUsize,
    }

    impl FakeNetwork {
        fn with(paths: &[(&str, &str)]) -> Self {
            Self {
                bodies: paths
                    .iter()
                    .map(|(p, b)| (normalize_path(p), b.to_string()))
                    .collect(),
                ..Default::default()
            }
        }

        fn failing(mut self, path: &str) -> Self {
            self.failing.push(normalize_path(path));
            self
        }
    }

    #[async_trait]
    impl AssetFetcher for FakeNetwork {
        async fn fetch(&self, path: &str) -> CacheResult<CachedResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = normalize_path(path);
            if self.failing.contains(&key) {
                return Err(CacheError::Fetch {
                    path: key,
                    reason: "offline".into(),
                });
            }
            match self.bodies.get(&key) {
                Some(b) => Ok(CachedResponse::ok("text/plain", b.as_bytes())),
                None => Ok(CachedResponse {
                    status: 404,
                    content_type: "text/plain".into(),
                    body: Vec::new(),
                }),
            }
        }
    }

    fn manifest(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn normalize_strips_relative_prefixes() {
        assert_eq!(normalize_path("./"), "");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("./index.html"), "index.html");
        assert_eq!(normalize_path("/data/a.md"), "data/a.md");
    }

    #[tokio::test]
    async fn install_then_fetch_is_cache_first() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::with(&[("./a.css", "v1 css")]));
        let worker = CacheWorker::new("v1", manifest(&["./a.css"]), storage, network.clone());
        worker.install().await.unwrap();
        assert_eq!(worker.state().await, WorkerState::Installed);
        worker.activate().await.unwrap();
        assert!(worker.controls_clients().await);

        let calls_after_install = network.calls.load(Ordering::SeqCst);
        let (res, source) = worker.fetch("/a.css").await.unwrap();
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(res.body, b"v1 css");
        assert_eq!(network.calls.load(Ordering::SeqCst), calls_after_install);
    }

    #[tokio::test]
    async fn miss_passes_through_without_caching() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::with(&[("./a.css", "css"), ("./late.js", "js")]));
        let worker = CacheWorker::new("v1", manifest(&["./a.css"]), storage.clone(), network);
        worker.install().await.unwrap();

        let (res, source) = worker.fetch("late.js").await.unwrap();
        assert_eq!(source, FetchSource::Network);
        assert_eq!(res.body, b"js");
        assert!(storage.match_any("late.js").unwrap().is_none());
        let (_, again) = worker.fetch("late.js").await.unwrap();
        assert_eq!(again, FetchSource::Network);
    }

    #[tokio::test]
    async fn failed_install_keeps_prior_cache_serving() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let v1_net = Arc::new(FakeNetwork::with(&[("./a.css", "old"), ("./b.js", "old js")]));
        let v1 = CacheWorker::new("v1", manifest(&["./a.css", "./b.js"]), storage.clone(), v1_net);
        v1.install().await.unwrap();
        v1.activate().await.unwrap();

        let v2_net = Arc::new(
            FakeNetwork::with(&[("./a.css", "new"), ("./b.js", "new js")]).failing("./b.js"),
        );
        let v2 = CacheWorker::new("v2", manifest(&["./a.css", "./b.js"]), storage.clone(), v2_net);
        let err = v2.install().await.unwrap_err();
        assert!(matches!(err, CacheError::InstallFailed { .. }));
        assert_eq!(v2.state().await, WorkerState::Redundant);
        assert!(!v2.controls_clients().await);
        assert!(matches!(v2.activate().await, Err(CacheError::NotInstalled(_))));
        assert_eq!(storage.keys().unwrap(), vec!["v1".to_string()]);

        let (res, source) = v2.fetch("./a.css").await.unwrap();
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(res.body, b"old");
    }

    #[tokio::test]
    async fn non_ok_status_fails_install() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(FakeNetwork::with(&[("./a.css", "css")]));
        let worker = CacheWorker::new("v1", manifest(&["./a.css", "./missing.png"]), storage.clone(), network);
        assert!(worker.install().await.is_err());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[tokio::test]
    async fn activate_deletes_stale_versions() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage
            .put_region("v1", vec![("a.css".into(), CachedResponse::ok("text/css", "old"))])
            .unwrap();
        let network = Arc::new(FakeNetwork::with(&[("./a.css", "new")]));
        let worker = CacheWorker::new("v2", manifest(&["./a.css"]), storage.clone(), network);
        worker.install().await.unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["v1".to_string(), "v2".to_string()]);

        let deleted = worker.activate().await.unwrap();
        assert_eq!(deleted, vec!["v1".to_string()]);
        assert_eq!(storage.keys().unwrap(), vec!["v2".to_string()]);
        let (res, _) = worker.fetch("a.css").await.unwrap();
        assert_eq!(res.body, b"new");
    }

    #[tokio::test]
    async fn sled_storage_activate_deletes_stale_versions() {
        let storage = Arc::new(SledCacheStorage::temporary().unwrap());
        let old = Arc::new(FakeNetwork::with(&[("./", "<html>v1</html>")]));
        CacheWorker::new("v1", manifest(&["./"]), storage.clone(), old)
            .install()
            .await
            .unwrap();
        let new = Arc::new(FakeNetwork::with(&[("./", "<html>v2</html>")]));
        let worker = CacheWorker::new("v2", manifest(&["./"]), storage.clone(), new);
        worker.install().await.unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["v1".to_string(), "v2".to_string()]);

        worker.activate().await.unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["v2".to_string()]);
        let (res, source) = worker.fetch("/").await.unwrap();
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(res.body, b"<html>v2</html>");
    }

    #[test]
    fn sled_keys_follow_creation_order() {
        let storage = SledCacheStorage::temporary().unwrap();
        storage
            .put_region("v9", vec![("a.css".into(), CachedResponse::ok("text/css", "nine"))])
            .unwrap();
        storage
            .put_region("v10", vec![("a.css".into(), CachedResponse::ok("text/css", "ten"))])
            .unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["v9".to_string(), "v10".to_string()]);
        assert_eq!(storage.match_any("a.css").unwrap().unwrap().body, b"nine");

        // Refilling a region does not move it.
        storage
            .put_region("v9", vec![("a.css".into(), CachedResponse::ok("text/css", "nine b"))])
            .unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["v9".to_string(), "v10".to_string()]);

        assert!(storage.delete("v9").unwrap());
        assert_eq!(storage.keys().unwrap(), vec!["v10".to_string()]);
        assert!(storage.lookup("v9", "a.css").unwrap().is_none());
        assert!(!storage.delete("v9").unwrap());
    }

    #[tokio::test]
    async fn restart_with_same_version_keeps_installed_assets() {
        let storage = Arc::new(SledCacheStorage::temporary().unwrap());
        let first = Arc::new(FakeNetwork::with(&[("./", "v1 page")]));
        let worker = CacheWorker::new("v1", manifest(&["./"]), storage.clone(), first);
        assert!(!worker.resume().await.unwrap());
        worker.start().await.unwrap();

        let changed = Arc::new(FakeNetwork::with(&[("./", "v2 page")]));
        let again = CacheWorker::new("v1", manifest(&["./"]), storage.clone(), changed.clone());
        assert!(again.start().await.unwrap().is_empty());
        assert!(again.controls_clients().await);
        assert_eq!(changed.calls.load(Ordering::SeqCst), 0);
        let (res, source) = again.fetch("/").await.unwrap();
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(res.body, b"v1 page");

        let bumped = CacheWorker::new("v2", manifest(&["./"]), storage.clone(), changed);
        assert_eq!(bumped.start().await.unwrap(), vec!["v1".to_string()]);
        let (res, _) = bumped.fetch("/").await.unwrap();
        assert_eq!(res.body, b"v2 page");
    }

    #[tokio::test]
    async fn dir_fetcher_serves_index_for_root_and_404_for_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();
        let fetcher = DirFetcher::new(dir.path());

        let root = fetcher.fetch("./").await.unwrap();
        assert_eq!(root.body, b"<h1>hi</h1>");
        assert!(root.content_type.starts_with("text/html"));

        let missing = fetcher.fetch("nope.css").await.unwrap();
        assert_eq!(missing.status, 404);
        assert!(fetcher.fetch("../secret").await.is_err());
    }
}
