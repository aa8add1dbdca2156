//! Upstream version and language lists.
//!
//! Both lists are owned by the CDN, not by this mirror; they are fetched
//! on demand and memoized in-process (versions: 10 minutes, languages:
//! 30 days). The dedup scan and the collaborator layer's parameter
//! validation both consume them.

use std::collections::BTreeMap;
use std::sync::Arc;

use mini_moka::sync::Cache;
use serde::Serialize;

use crate::config::{CdnConfig, UpstreamListConfig};
use crate::error::{MirrorError, Result};
use crate::fetch::Fetcher;

const VERSIONS_KEY: &str = "versions";
const LANGUAGES_KEY: &str = "languages";

/// Locale tags known to exist upstream, used when the language endpoint is
/// unreachable. Mirrors the hand-maintained list the web layer displays.
const FALLBACK_LANGUAGES: &[&str] = &[
    "ar_AE", "cs_CZ", "de_DE", "el_GR", "en_AU", "en_GB", "en_PH", "en_SG", "en_US", "es_AR",
    "es_ES", "es_MX", "fr_FR", "hu_HU", "id_ID", "it_IT", "ja_JP", "ko_KR", "pl_PL", "pt_BR",
    "ro_RO", "ru_RU", "th_TH", "tr_TR", "vi_VN", "zh_CN", "zh_MY", "zh_TW",
];

/// Validation report for a user-selected (version, language) pair.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    pub ok: bool,
    /// Field name -> human-readable problem.
    pub errors: BTreeMap<String, String>,
}

/// Memoized view of the upstream version/language lists.
pub struct VersionCatalog {
    fetcher: Arc<dyn Fetcher>,
    cdn: CdnConfig,
    versions: Cache<&'static str, Arc<Vec<String>>>,
    languages: Cache<&'static str, Arc<Vec<String>>>,
}

impl VersionCatalog {
    pub fn new(fetcher: Arc<dyn Fetcher>, cdn: CdnConfig) -> Self {
        Self {
            fetcher,
            cdn,
            versions: Cache::builder()
                .time_to_live(UpstreamListConfig::VERSIONS_TTL)
                .build(),
            languages: Cache::builder()
                .time_to_live(UpstreamListConfig::LANGUAGES_TTL)
                .build(),
        }
    }

    /// All published versions, newest first.
    pub async fn versions(&self) -> Result<Arc<Vec<String>>> {
        if let Some(cached) = self.versions.get(&VERSIONS_KEY) {
            return Ok(cached);
        }
        let list = self.fetch_list(&self.cdn.versions_url(), "versions.json").await?;
        self.versions.insert(VERSIONS_KEY, list.clone());
        Ok(list)
    }

    /// All supported locale tags.
    pub async fn languages(&self) -> Result<Arc<Vec<String>>> {
        if let Some(cached) = self.languages.get(&LANGUAGES_KEY) {
            return Ok(cached);
        }
        let list = self.fetch_list(&self.cdn.languages_url(), "languages.json").await?;
        self.languages.insert(LANGUAGES_KEY, list.clone());
        Ok(list)
    }

    async fn fetch_list(&self, url: &str, context: &str) -> Result<Arc<Vec<String>>> {
        let bytes = self.fetcher.get(url).await?;
        let list: Vec<String> = serde_json::from_slice(&bytes).map_err(|e| MirrorError::Decode {
            context: context.to_string(),
            message: e.to_string(),
            source: Some(e),
        })?;
        Ok(Arc::new(list))
    }

    pub async fn version_exists(&self, version: &str) -> bool {
        if version.is_empty() {
            return false;
        }
        match self.versions().await {
            Ok(list) => list.iter().any(|v| v == version),
            Err(_) => false,
        }
    }

    /// Falls back to the built-in locale list when the upstream endpoint
    /// is unavailable, matching the original behavior.
    pub async fn language_exists(&self, language: &str) -> bool {
        if language.is_empty() {
            return false;
        }
        match self.languages().await {
            Ok(list) if !list.is_empty() => list.iter().any(|l| l == language),
            _ => FALLBACK_LANGUAGES.contains(&language),
        }
    }

    /// Validate a user-selected (version, language) pair. Empty or absent
    /// values are not an error; only explicitly wrong ones are reported.
    pub async fn validate_selection(
        &self,
        version: Option<&str>,
        language: Option<&str>,
    ) -> SelectionReport {
        let mut errors = BTreeMap::new();

        if let Some(v) = version {
            if !v.is_empty() && !self.version_exists(v).await {
                errors.insert("version".to_string(), format!("unknown version: {}", v));
            }
        }
        if let Some(l) = language {
            if !l.is_empty() && !self.language_exists(l).await {
                errors.insert("language".to_string(), format!("unsupported language: {}", l));
            }
        }

        SelectionReport {
            ok: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetcher;

    fn catalog_with(stub: Arc<StubFetcher>) -> VersionCatalog {
        VersionCatalog::new(stub, CdnConfig::default())
    }

    #[tokio::test]
    async fn test_versions_are_memoized() {
        let stub = Arc::new(StubFetcher::new());
        stub.route(
            "https://ddragon.leagueoflegends.com/api/versions.json",
            br#"["15.1.1","15.1.0","14.24.1"]"#.to_vec(),
        );
        let catalog = catalog_with(stub.clone());

        let first = catalog.versions().await.unwrap();
        let second = catalog.versions().await.unwrap();
        assert_eq!(first.as_slice(), &["15.1.1", "15.1.0", "14.24.1"]);
        assert_eq!(second.as_slice(), first.as_slice());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_version_exists() {
        let stub = Arc::new(StubFetcher::new());
        stub.route(
            "https://ddragon.leagueoflegends.com/api/versions.json",
            br#"["15.1.1"]"#.to_vec(),
        );
        let catalog = catalog_with(stub);

        assert!(catalog.version_exists("15.1.1").await);
        assert!(!catalog.version_exists("0.0.0").await);
        assert!(!catalog.version_exists("").await);
    }

    #[tokio::test]
    async fn test_language_falls_back_when_endpoint_down() {
        // No route registered: the languages fetch fails.
        let stub = Arc::new(StubFetcher::new());
        let catalog = catalog_with(stub);

        assert!(catalog.language_exists("fr_FR").await);
        assert!(!catalog.language_exists("xx_XX").await);
    }

    #[tokio::test]
    async fn test_validate_selection_reports_both_fields() {
        let stub = Arc::new(StubFetcher::new());
        stub.route(
            "https://ddragon.leagueoflegends.com/api/versions.json",
            br#"["15.1.1"]"#.to_vec(),
        );
        stub.route(
            "https://ddragon.leagueoflegends.com/cdn/languages.json",
            br#"["fr_FR","en_US"]"#.to_vec(),
        );
        let catalog = catalog_with(stub);

        let ok = catalog
            .validate_selection(Some("15.1.1"), Some("fr_FR"))
            .await;
        assert!(ok.ok);
        assert!(ok.errors.is_empty());

        let bad = catalog
            .validate_selection(Some("9.9.9"), Some("xx_XX"))
            .await;
        assert!(!bad.ok);
        assert!(bad.errors.contains_key("version"));
        assert!(bad.errors.contains_key("language"));
    }
}
