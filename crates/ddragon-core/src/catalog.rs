//! Read-through cache for versioned JSON documents.
//!
//! A document for a released version is immutable upstream, so a cached
//! copy is permanently valid: there is no TTL and no revalidation. A
//! corrupt cached file is a fatal decode error, not a silent refetch;
//! trusting the cache blindly but failing loud on corruption is the
//! intended asymmetry.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::CdnConfig;
use crate::error::{MirrorError, Result};
use crate::fetch::Fetcher;
use crate::lock::KeyedLocks;
use crate::paths::UploadPaths;
use crate::resource::{DataRoot, KeyLookup, ResourceSpec};
use crate::store;

/// Decoded JSON document for one (type, version, language) key.
///
/// Immutable for the lifetime of a request; every transformation (slice,
/// sort, filter) happens on views derived from `entries`.
#[derive(Debug, Clone)]
pub struct CatalogDocument {
    root: Value,
}

impl CatalogDocument {
    pub fn from_slice(bytes: &[u8], context: &str) -> Result<Self> {
        let root: Value = serde_json::from_slice(bytes).map_err(|e| MirrorError::Decode {
            context: context.to_string(),
            message: e.to_string(),
            source: Some(e),
        })?;
        Ok(Self { root })
    }

    pub fn raw(&self) -> &Value {
        &self.root
    }

    /// Iterate the document's entities as `(entryKey, entity)` pairs.
    ///
    /// Map-rooted documents yield their `data` map entries (in key order);
    /// list-rooted documents yield array elements keyed by the
    /// descriptor's lookup field.
    pub fn entries<'a>(&'a self, spec: &ResourceSpec) -> Result<Vec<(String, &'a Value)>> {
        match spec.data_root {
            DataRoot::Keyed => {
                let map = self
                    .root
                    .get("data")
                    .and_then(Value::as_object)
                    .ok_or_else(|| shape_error(spec, "missing \"data\" object"))?;
                Ok(map.iter().map(|(k, v)| (k.clone(), v)).collect())
            }
            DataRoot::List => {
                let list = self
                    .root
                    .as_array()
                    .ok_or_else(|| shape_error(spec, "expected a top-level array"))?;
                let key_field = match spec.lookup {
                    KeyLookup::Field(f) => f,
                    KeyLookup::EntryKey => {
                        return Err(shape_error(spec, "list-rooted documents need a key field"))
                    }
                };
                let mut entries = Vec::with_capacity(list.len());
                for entity in list {
                    let key = entity
                        .get(key_field)
                        .and_then(Value::as_str)
                        .ok_or_else(|| shape_error(spec, "entry without key field"))?;
                    entries.push((key.to_string(), entity));
                }
                Ok(entries)
            }
        }
    }

    /// Direct lookup by entry key; only meaningful for map-rooted documents.
    pub fn get_keyed(&self, key: &str) -> Option<&Value> {
        self.root.get("data").and_then(|d| d.get(key))
    }
}

fn shape_error(spec: &ResourceSpec, message: &str) -> MirrorError {
    MirrorError::Decode {
        context: format!("{} document", spec.name),
        message: message.to_string(),
        source: None,
    }
}

/// Read-through cache: serve a document from disk, or fetch it from the
/// CDN and persist it first.
pub struct CatalogCache {
    paths: Arc<UploadPaths>,
    fetcher: Arc<dyn Fetcher>,
    cdn: CdnConfig,
    flights: KeyedLocks,
}

impl CatalogCache {
    pub fn new(paths: Arc<UploadPaths>, fetcher: Arc<dyn Fetcher>, cdn: CdnConfig) -> Self {
        Self {
            paths,
            fetcher,
            cdn,
            flights: KeyedLocks::new(),
        }
    }

    /// Get the full dataset for `(spec, version, language)`.
    ///
    /// Concurrent misses for the same key coalesce into a single fetch;
    /// the per-key lock spans the whole read-or-fetch sequence.
    pub async fn dataset(
        &self,
        spec: &ResourceSpec,
        version: &str,
        language: &str,
    ) -> Result<CatalogDocument> {
        let flight_key = format!("{}/{}/{}", spec.name, version, language);
        let _guard = self.flights.acquire(&flight_key).await;

        let path = self
            .paths
            .resolve(version, language, spec.name, spec.json_filename, false)?;

        if let Some(bytes) = store::read_if_exists(&path.abs_path)? {
            debug!("document cache hit: {}", path.rel_path);
            return CatalogDocument::from_slice(&bytes, &path.rel_path);
        }

        let url = self.cdn.data_url(version, language, spec.json_filename);
        debug!("document cache miss, fetching {}", url);
        let bytes = self.fetcher.get(&url).await?;
        let doc = CatalogDocument::from_slice(&bytes, &url)?;
        store::write_json(&path.abs_dir, &path.file_name, doc.raw())?;
        Ok(doc)
    }
}
