//! ddragon-mirror: read-through disk cache for versioned Data Dragon
//! documents and image assets.
//!
//! The mirror answers one question per request: for a given
//! (resource type, version, language), serve the cached copy or fetch,
//! persist and serve. Documents for a released version are immutable
//! upstream, so cached files never expire. Binary assets are
//! deduplicated across versions with hard links.
//!
//! # Example
//!
//! ```rust,ignore
//! use ddragon_mirror::{Mirror, ResourceKind};
//!
//! #[tokio::main]
//! async fn main() -> ddragon_mirror::Result<()> {
//!     let mirror = Mirror::new("/var/lib/ddragon")?;
//!     let champions = mirror.catalog(ResourceKind::Champion);
//!
//!     let page = champions.paginate("15.1.1", "fr_FR", 20, 1).await?;
//!     println!("{} champions, page 1/{}", page.meta.total_items, page.meta.page_count);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod paths;
pub mod resource;
pub mod store;
pub mod validate;
pub mod versions;

mod lock;

pub use catalog::{CatalogCache, CatalogDocument};
pub use config::CdnConfig;
pub use engine::{ImageManifest, Page, PageMeta, ResourceCatalog, TreeImages};
pub use error::{MirrorError, Result};
pub use fetch::{Fetcher, HttpFetcher};
pub use resource::{ResourceKind, ResourceSpec};
pub use versions::{SelectionReport, VersionCatalog};

use std::path::Path;
use std::sync::Arc;

use assets::AssetCache;
use paths::UploadPaths;

/// Entry point wiring fetcher, paths, stores and caches together.
///
/// The web and batch layers hold one `Mirror` and call
/// [`catalog`](Self::catalog) per resource type; everything else is
/// internal.
pub struct Mirror {
    paths: Arc<UploadPaths>,
    versions: Arc<VersionCatalog>,
    catalog: Arc<CatalogCache>,
    assets: Arc<AssetCache>,
}

impl Mirror {
    /// Create a mirror over `base_dir` talking to the default CDN.
    pub fn new(base_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
        Ok(Self::with_fetcher(base_dir, fetcher, CdnConfig::default()))
    }

    /// Create a mirror with an explicit fetcher and CDN root. This is the
    /// seam tests and alternative transports plug into.
    pub fn with_fetcher(
        base_dir: impl Into<std::path::PathBuf>,
        fetcher: Arc<dyn Fetcher>,
        cdn: CdnConfig,
    ) -> Self {
        let paths = Arc::new(UploadPaths::new(base_dir));
        let versions = Arc::new(VersionCatalog::new(fetcher.clone(), cdn.clone()));
        let catalog = Arc::new(CatalogCache::new(paths.clone(), fetcher.clone(), cdn.clone()));
        let assets = Arc::new(AssetCache::new(
            paths.clone(),
            fetcher,
            cdn,
            versions.clone(),
        ));
        Self {
            paths,
            versions,
            catalog,
            assets,
        }
    }

    /// Query surface for one built-in resource type.
    pub fn catalog(&self, kind: ResourceKind) -> ResourceCatalog {
        self.catalog_for(kind.spec())
    }

    /// Query surface for a caller-defined resource descriptor.
    pub fn catalog_for(&self, spec: &'static ResourceSpec) -> ResourceCatalog {
        ResourceCatalog::new(spec, self.catalog.clone(), self.assets.clone())
    }

    /// The upstream version/language lists.
    pub fn versions(&self) -> &VersionCatalog {
        &self.versions
    }

    pub fn base_dir(&self) -> &Path {
        self.paths.base_dir()
    }
}
