//! Centralized configuration for the mirror.
//!
//! Constant-carrying structs for network, path and pagination parameters,
//! plus the CDN endpoint builder used by every fetching component.

use std::time::Duration;

use crate::resource::{IconUrl, ResourceSpec};

/// Default Data Dragon root. Override via [`CdnConfig`] for tests or
/// alternative mirrors.
pub const DEFAULT_CDN_ROOT: &str = "https://ddragon.leagueoflegends.com";

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "ddragon-mirror/0.1";
}

/// On-disk layout names.
pub struct PathsConfig;

impl PathsConfig {
    /// Root directory of the cache tree, relative to the base dir.
    pub const UPLOAD_DIR_NAME: &'static str = "upload";
    /// Suffix appended to a resource type name for its image directory.
    pub const IMAGE_DIR_SUFFIX: &'static str = "_img";
}

/// Pagination and search bounds.
pub struct QueryConfig;

impl QueryConfig {
    /// Hard cap applied when a requested page size is 0 or exceeds the
    /// dataset size.
    pub const MAX_PAGE_SIZE: usize = 20;
    pub const MIN_QUERY_LEN: usize = 2;
    pub const MAX_QUERY_LEN: usize = 50;
}

/// TTLs for the upstream version/language list memoization.
pub struct UpstreamListConfig;

impl UpstreamListConfig {
    pub const VERSIONS_TTL: Duration = Duration::from_secs(600);
    pub const LANGUAGES_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
}

/// Upstream endpoint builder.
///
/// Owns the CDN root and derives every URL shape the mirror consumes.
/// Per-type exceptions (summoner spells under `img/spell/`, version-less
/// rune icons) are driven by the [`ResourceSpec`] table, never by call
/// sites.
#[derive(Debug, Clone)]
pub struct CdnConfig {
    root: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_CDN_ROOT.to_string(),
        }
    }
}

impl CdnConfig {
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// URL of a localized JSON document for one version.
    pub fn data_url(&self, version: &str, language: &str, filename: &str) -> String {
        format!("{}/cdn/{}/data/{}/{}", self.root, version, language, filename)
    }

    /// URL of a binary image asset, honoring the per-type URL shape.
    pub fn image_url(&self, spec: &ResourceSpec, version: &str, filename: &str) -> String {
        match spec.icon_url {
            IconUrl::Versioned(segment) => {
                format!("{}/cdn/{}/img/{}/{}", self.root, version, segment, filename)
            }
            IconUrl::Unversioned => format!("{}/cdn/img/{}", self.root, filename),
        }
    }

    /// URL of the upstream version list, newest first.
    pub fn versions_url(&self) -> String {
        format!("{}/api/versions.json", self.root)
    }

    /// URL of the upstream language list.
    pub fn languages_url(&self) -> String {
        format!("{}/cdn/languages.json", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceKind;

    #[test]
    fn test_data_url() {
        let cdn = CdnConfig::default();
        assert_eq!(
            cdn.data_url("15.1.1", "fr_FR", "champion.json"),
            "https://ddragon.leagueoflegends.com/cdn/15.1.1/data/fr_FR/champion.json"
        );
    }

    #[test]
    fn test_image_url_per_type_shapes() {
        let cdn = CdnConfig::default();
        assert_eq!(
            cdn.image_url(ResourceKind::Champion.spec(), "15.1.1", "Aatrox.png"),
            "https://ddragon.leagueoflegends.com/cdn/15.1.1/img/champion/Aatrox.png"
        );
        // Summoner spells live under img/spell/, not img/summoner/.
        assert_eq!(
            cdn.image_url(ResourceKind::SummonerSpell.spec(), "15.1.1", "SummonerFlash.png"),
            "https://ddragon.leagueoflegends.com/cdn/15.1.1/img/spell/SummonerFlash.png"
        );
        // Rune icons have no version segment at all.
        assert_eq!(
            cdn.image_url(
                ResourceKind::RuneTree.spec(),
                "15.1.1",
                "perk-images/Styles/7200_Domination.png"
            ),
            "https://ddragon.leagueoflegends.com/cdn/img/perk-images/Styles/7200_Domination.png"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let cdn = CdnConfig::new("https://mirror.test/");
        assert_eq!(cdn.versions_url(), "https://mirror.test/api/versions.json");
        assert_eq!(cdn.languages_url(), "https://mirror.test/cdn/languages.json");
    }
}
