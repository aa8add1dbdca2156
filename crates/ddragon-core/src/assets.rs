//! Image asset materialization with cross-version deduplication.
//!
//! Icons are frequently byte-identical across consecutive versions. Before
//! writing a freshly downloaded asset, the cache scans the already-present
//! versions for an identical file and hard-links to it instead of storing
//! a second physical copy. Each version's directory tree stays
//! independently addressable either way.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CdnConfig;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::lock::KeyedLocks;
use crate::paths::{ResolvedDir, UploadPaths};
use crate::resource::ResourceSpec;
use crate::store;
use crate::versions::VersionCatalog;

/// Disk cache for binary image assets.
pub struct AssetCache {
    paths: Arc<UploadPaths>,
    fetcher: Arc<dyn Fetcher>,
    cdn: CdnConfig,
    versions: Arc<VersionCatalog>,
    flights: KeyedLocks,
}

impl AssetCache {
    pub fn new(
        paths: Arc<UploadPaths>,
        fetcher: Arc<dyn Fetcher>,
        cdn: CdnConfig,
        versions: Arc<VersionCatalog>,
    ) -> Self {
        Self {
            paths,
            fetcher,
            cdn,
            versions,
            flights: KeyedLocks::new(),
        }
    }

    /// Resolve (and create) the image directory for a batch of
    /// materializations under one `(version, type)`.
    pub fn image_dir(
        &self,
        version: &str,
        language: &str,
        spec: &ResourceSpec,
    ) -> Result<ResolvedDir> {
        self.paths.dir_for(version, language, spec.name, true)
    }

    /// Make an image available locally and return its relative path.
    ///
    /// Cache hits return immediately. On a miss the bytes are fetched
    /// once, then either hard-linked to an identical copy found under
    /// another version or written out. `dir` short-circuits path
    /// resolution when the caller already resolved the image directory
    /// for a whole batch. `force` re-downloads even when present.
    pub async fn materialize_image(
        &self,
        filename: &str,
        version: &str,
        spec: &ResourceSpec,
        language: &str,
        dir: Option<&ResolvedDir>,
        force: bool,
    ) -> Result<String> {
        let flight_key = format!("{}/{}/{}", version, spec.name, filename);
        let _guard = self.flights.acquire(&flight_key).await;

        let resolved;
        let dir = match dir {
            Some(d) => d,
            None => {
                resolved = self.paths.dir_for(version, language, spec.name, true)?;
                &resolved
            }
        };
        let path = self.paths.file_in(dir, filename);

        if !force && store::exists(&path.abs_path) {
            return Ok(path.rel_path);
        }

        let url = self.cdn.image_url(spec, version, filename);
        let bytes = self.fetcher.get(&url).await?;

        if let Some(existing_rel) = self.find_existing_copy(&bytes, filename, spec).await? {
            let existing_abs = self.paths.base_dir().join(&existing_rel);
            if store::hard_link(&existing_abs, &path.abs_path) {
                debug!("deduplicated {} against {}", path.rel_path, existing_rel);
                return Ok(path.rel_path);
            }
        }

        store::write_binary(&path.abs_path, &bytes)?;
        Ok(path.rel_path)
    }

    /// Scan known versions for a byte-identical copy of `bytes` stored
    /// under the same type and filename; first match wins.
    ///
    /// Linear over the version list with a full content compare per
    /// candidate. Fine at icon scale; a content-hash index would be the
    /// upgrade path for much larger catalogs.
    async fn find_existing_copy(
        &self,
        bytes: &[u8],
        filename: &str,
        spec: &ResourceSpec,
    ) -> Result<Option<String>> {
        if bytes.is_empty() {
            return Ok(None);
        }

        let versions = match self.versions.versions().await {
            Ok(list) => list,
            Err(e) => {
                warn!("version list unavailable, skipping dedup scan: {}", e);
                return Ok(None);
            }
        };

        for v in versions.iter() {
            let rel = format!("upload/{}/{}_img/{}", v, spec.name, filename);
            let abs = self.paths.base_dir().join(&rel);

            // Cheap length filter before reading the candidate.
            match std::fs::metadata(&abs) {
                Ok(meta) if meta.len() == bytes.len() as u64 => {}
                _ => continue,
            }
            if let Some(existing) = store::read_if_exists(&abs)? {
                if existing == bytes {
                    return Ok(Some(rel));
                }
            }
        }
        Ok(None)
    }
}
