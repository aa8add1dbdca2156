//! Per-resource query surface: lookup, search, image manifests, pagination.
//!
//! One generic engine, specialized by the [`ResourceSpec`] descriptor.
//! Rune trees are the only structural special case: their image manifest
//! is nested (tree icon plus per-slot rune icons) instead of flat.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::assets::AssetCache;
use crate::catalog::{CatalogCache, CatalogDocument};
use crate::config::QueryConfig;
use crate::error::{MirrorError, Result};
use crate::paths::ResolvedDir;
use crate::resource::{ImageRef, KeyLookup, ResourceSpec};

/// Pagination metadata, recomputed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: usize,
    pub page_count: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub resource: String,
}

/// Icons of one rune tree: the tree's own icon plus one map per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeImages {
    pub icon: String,
    pub slots: Vec<BTreeMap<String, String>>,
}

/// Image manifest for a set of entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageManifest {
    /// entityKey -> relative path.
    Flat(BTreeMap<String, String>),
    /// treeKey -> nested tree/slot icons (rune trees only).
    Trees(BTreeMap<String, TreeImages>),
}

impl ImageManifest {
    pub fn as_flat(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            ImageManifest::Flat(m) => Some(m),
            ImageManifest::Trees(_) => None,
        }
    }

    pub fn as_trees(&self) -> Option<&BTreeMap<String, TreeImages>> {
        match self {
            ImageManifest::Trees(m) => Some(m),
            ImageManifest::Flat(_) => None,
        }
    }
}

/// One page of a dataset with its image manifest.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// `(entryKey, entity)` pairs in dataset order.
    pub items: Vec<(String, Value)>,
    pub images: ImageManifest,
    pub meta: PageMeta,
}

/// Query surface for one resource type.
///
/// The entire interface the web and batch layers are allowed to call.
pub struct ResourceCatalog {
    spec: &'static ResourceSpec,
    cache: Arc<CatalogCache>,
    assets: Arc<AssetCache>,
}

impl ResourceCatalog {
    pub fn new(
        spec: &'static ResourceSpec,
        cache: Arc<CatalogCache>,
        assets: Arc<AssetCache>,
    ) -> Self {
        Self { spec, cache, assets }
    }

    pub fn spec(&self) -> &ResourceSpec {
        self.spec
    }

    /// Full dataset for `(version, language)`, read-through cached.
    pub async fn dataset(&self, version: &str, language: &str) -> Result<CatalogDocument> {
        self.cache.dataset(self.spec, version, language).await
    }

    /// Exact lookup by entity key.
    pub async fn get(&self, key: &str, version: &str, language: &str) -> Result<Value> {
        let doc = self.dataset(version, language).await?;

        let found = match self.spec.lookup {
            KeyLookup::EntryKey => doc.get_keyed(key).cloned(),
            KeyLookup::Field(field) => doc
                .entries(self.spec)?
                .into_iter()
                .find(|(_, v)| v.get(field).and_then(Value::as_str) == Some(key))
                .map(|(_, v)| v.clone()),
        };

        found.ok_or_else(|| MirrorError::NotFound {
            resource: self.spec.name.to_string(),
            key: key.to_string(),
            version: version.to_string(),
            language: language.to_string(),
        })
    }

    /// Case-insensitive substring search over entry key, id and display
    /// name. `max == 0` means unbounded; matching stops early once `max`
    /// results are collected.
    pub async fn search(
        &self,
        query: &str,
        version: &str,
        language: &str,
        max: usize,
    ) -> Result<Vec<Value>> {
        let len = query.chars().count();
        if len < QueryConfig::MIN_QUERY_LEN || len > QueryConfig::MAX_QUERY_LEN {
            return Err(MirrorError::InvalidQuery {
                query: query.to_string(),
                min: QueryConfig::MIN_QUERY_LEN,
                max: QueryConfig::MAX_QUERY_LEN,
            });
        }
        let needle = query.to_lowercase();

        let doc = self.dataset(version, language).await?;
        let mut results = Vec::new();
        for (key, entity) in doc.entries(self.spec)? {
            if max != 0 && results.len() >= max {
                break;
            }
            let key_match = key.to_lowercase().contains(&needle);
            let id_match = entity
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| id.to_lowercase().contains(&needle));
            let name_match = entity
                .get(self.spec.name_field)
                .and_then(Value::as_str)
                .is_some_and(|n| n.to_lowercase().contains(&needle));

            if key_match || id_match || name_match {
                results.push(self.with_id(&key, entity));
            }
        }
        Ok(results)
    }

    /// Clone an entity, injecting its entry key as `id` when the document
    /// keys entities externally (items) and the field is absent.
    fn with_id(&self, key: &str, entity: &Value) -> Value {
        let mut out = entity.clone();
        if out.get("id").is_none() {
            if let Some(map) = out.as_object_mut() {
                map.insert("id".to_string(), Value::String(key.to_string()));
            }
        }
        out
    }

    /// Materialize images for `entities` (or the whole dataset) and
    /// return the manifest. Entities without a name or image reference
    /// are skipped; upstream documents contain placeholder entries.
    pub async fn images(
        &self,
        version: &str,
        language: &str,
        force: bool,
        entities: Option<&[(String, Value)]>,
    ) -> Result<ImageManifest> {
        let owned;
        let list: &[(String, Value)] = match entities {
            Some(list) => list,
            None => {
                let doc = self.dataset(version, language).await?;
                owned = doc
                    .entries(self.spec)?
                    .into_iter()
                    .map(|(k, v)| (k, v.clone()))
                    .collect::<Vec<_>>();
                &owned
            }
        };

        if self.spec.nested_slots {
            self.tree_images(version, language, force, list).await
        } else {
            self.flat_images(version, language, force, list).await
        }
    }

    async fn flat_images(
        &self,
        version: &str,
        language: &str,
        force: bool,
        list: &[(String, Value)],
    ) -> Result<ImageManifest> {
        let dir = self
            .assets
            .image_dir(version, language, self.spec)?;

        let mut manifest = BTreeMap::new();
        for (key, entity) in list {
            let Some(filename) = image_filename(entity, self.spec.image) else {
                debug!("skipping {} entry {} without image", self.spec.name, key);
                continue;
            };
            if entity.get(self.spec.name_field).and_then(Value::as_str).is_none() {
                debug!("skipping {} entry {} without name", self.spec.name, key);
                continue;
            }
            let rel = self
                .assets
                .materialize_image(filename, version, self.spec, language, Some(&dir), force)
                .await?;
            manifest.insert(key.clone(), rel);
        }
        Ok(ImageManifest::Flat(manifest))
    }

    /// Rune trees: each tree carries its own icon plus slots of runes,
    /// every rune with its own icon.
    async fn tree_images(
        &self,
        version: &str,
        language: &str,
        force: bool,
        list: &[(String, Value)],
    ) -> Result<ImageManifest> {
        let dir = self
            .assets
            .image_dir(version, language, self.spec)?;

        let mut manifest = BTreeMap::new();
        for (key, tree) in list {
            let Some(tree_icon) = image_filename(tree, self.spec.image) else {
                continue;
            };
            let icon = self
                .assets
                .materialize_image(tree_icon, version, self.spec, language, Some(&dir), force)
                .await?;

            let mut slots_out = Vec::new();
            for slot in tree
                .get("slots")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
            {
                let mut slot_map = BTreeMap::new();
                for rune in slot
                    .get("runes")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                {
                    let (Some(rune_key), Some(rune_icon)) = (
                        rune.get("key").and_then(Value::as_str),
                        rune.get("icon").and_then(Value::as_str),
                    ) else {
                        continue;
                    };
                    let rel = self
                        .assets
                        .materialize_image(
                            rune_icon,
                            version,
                            self.spec,
                            language,
                            Some(&dir),
                            force,
                        )
                        .await?;
                    slot_map.insert(rune_key.to_string(), rel);
                }
                slots_out.push(slot_map);
            }

            manifest.insert(key.clone(), TreeImages { icon, slots: slots_out });
        }
        Ok(ImageManifest::Trees(manifest))
    }

    /// Single-asset variant of [`images`](Self::images).
    pub async fn image(
        &self,
        filename: &str,
        version: &str,
        dir: Option<&ResolvedDir>,
        force: bool,
        language: &str,
    ) -> Result<String> {
        self.assets
            .materialize_image(filename, version, self.spec, language, dir, force)
            .await
    }

    /// One page of the dataset with images for exactly that page.
    ///
    /// A page size of 0 (or one exceeding the dataset) is clamped to
    /// `min(total, 20)`; an out-of-range page number silently resets to
    /// page 1. Both corrections are caller-facing behavior, not errors.
    pub async fn paginate(
        &self,
        version: &str,
        language: &str,
        page_size: usize,
        page_number: usize,
    ) -> Result<Page> {
        let doc = self.dataset(version, language).await?;
        let entries = doc.entries(self.spec)?;
        let total = entries.len();

        if total == 0 {
            return Ok(Page {
                items: Vec::new(),
                images: if self.spec.nested_slots {
                    ImageManifest::Trees(BTreeMap::new())
                } else {
                    ImageManifest::Flat(BTreeMap::new())
                },
                meta: PageMeta {
                    current_page: 1,
                    page_count: 0,
                    items_per_page: 0,
                    total_items: 0,
                    resource: self.spec.name.to_string(),
                },
            });
        }

        let mut size = page_size;
        if size == 0 || size > total {
            size = total.min(QueryConfig::MAX_PAGE_SIZE);
        }
        let page_count = total.div_ceil(size);

        let mut page = page_number.max(1);
        if page > page_count {
            page = 1;
        }

        let offset = size * (page - 1);
        let items: Vec<(String, Value)> = entries
            .into_iter()
            .skip(offset)
            .take(size)
            .map(|(k, v)| (k, v.clone()))
            .collect();

        let images = self.images(version, language, false, Some(&items)).await?;

        Ok(Page {
            items,
            images,
            meta: PageMeta {
                current_page: page,
                page_count,
                items_per_page: size,
                total_items: total,
                resource: self.spec.name.to_string(),
            },
        })
    }

    /// Entities ordered by display name, case-insensitive.
    pub fn sorted_by_name(&self, doc: &CatalogDocument) -> Result<Vec<Value>> {
        let mut list: Vec<Value> = doc
            .entries(self.spec)?
            .into_iter()
            .map(|(_, v)| v.clone())
            .collect();
        list.sort_by_key(|v| {
            v.get(self.spec.name_field)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_lowercase()
        });
        Ok(list)
    }
}

fn image_filename(entity: &Value, image: ImageRef) -> Option<&str> {
    match image {
        ImageRef::Full => entity
            .get("image")
            .and_then(|i| i.get("full"))
            .and_then(Value::as_str),
        ImageRef::Icon => entity.get("icon").and_then(Value::as_str),
    }
}
