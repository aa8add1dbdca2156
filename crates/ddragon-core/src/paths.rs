//! Cache tree path resolution.
//!
//! Rules:
//!  - documents: `upload/{version}/{language}/{type}/{filename}`
//!  - images:    `upload/{version}/{type}_img/{filename}` (no language segment;
//!    assets are identical across languages for a given version)
//!
//! Resolution is deterministic; the only side effect is the idempotent
//! creation of the target directory.

use std::path::{Path, PathBuf};

use crate::config::PathsConfig;
use crate::error::{MirrorError, Result};

/// A resolved cache directory, relative and absolute.
#[derive(Debug, Clone)]
pub struct ResolvedDir {
    pub rel_dir: String,
    pub abs_dir: PathBuf,
}

/// A resolved cache file path.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub rel_dir: String,
    pub abs_dir: PathBuf,
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub file_name: String,
}

/// Resolver for the on-disk cache tree under a base directory.
#[derive(Debug)]
pub struct UploadPaths {
    base_dir: PathBuf,
}

impl UploadPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve the directory for `(version, language, type)` and make sure
    /// it exists.
    pub fn dir_for(
        &self,
        version: &str,
        language: &str,
        type_name: &str,
        is_image: bool,
    ) -> Result<ResolvedDir> {
        let rel_dir = if is_image {
            format!(
                "{}/{}/{}{}",
                PathsConfig::UPLOAD_DIR_NAME,
                version,
                type_name,
                PathsConfig::IMAGE_DIR_SUFFIX
            )
        } else {
            format!(
                "{}/{}/{}/{}",
                PathsConfig::UPLOAD_DIR_NAME,
                version,
                language,
                type_name
            )
        };
        let abs_dir = self.base_dir.join(&rel_dir);
        std::fs::create_dir_all(&abs_dir)
            .map_err(|e| MirrorError::io_with_path(e, &abs_dir))?;
        Ok(ResolvedDir { rel_dir, abs_dir })
    }

    /// Resolve a file inside an already-resolved directory. Pure.
    pub fn file_in(&self, dir: &ResolvedDir, file_name: &str) -> ResolvedPath {
        ResolvedPath {
            rel_dir: dir.rel_dir.clone(),
            abs_dir: dir.abs_dir.clone(),
            rel_path: format!("{}/{}", dir.rel_dir, file_name),
            abs_path: dir.abs_dir.join(file_name),
            file_name: file_name.to_string(),
        }
    }

    /// Combined resolve: directory plus file in one call.
    pub fn resolve(
        &self,
        version: &str,
        language: &str,
        type_name: &str,
        file_name: &str,
        is_image: bool,
    ) -> Result<ResolvedPath> {
        let dir = self.dir_for(version, language, type_name, is_image)?;
        Ok(self.file_in(&dir, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_document_path_includes_language() {
        let tmp = TempDir::new().unwrap();
        let paths = UploadPaths::new(tmp.path());
        let p = paths
            .resolve("15.1.1", "fr_FR", "summoner", "summoner.json", false)
            .unwrap();
        assert_eq!(p.rel_path, "upload/15.1.1/fr_FR/summoner/summoner.json");
        assert_eq!(p.abs_path, tmp.path().join(&p.rel_path));
        assert!(p.abs_dir.is_dir());
    }

    #[test]
    fn test_image_path_excludes_language() {
        let tmp = TempDir::new().unwrap();
        let paths = UploadPaths::new(tmp.path());
        let p = paths
            .resolve("15.1.1", "fr_FR", "champion", "Aatrox.png", true)
            .unwrap();
        assert_eq!(p.rel_path, "upload/15.1.1/champion_img/Aatrox.png");
        assert!(!p.rel_path.contains("fr_FR"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let paths = UploadPaths::new(tmp.path());
        let a = paths
            .resolve("14.9.1", "en_US", "item", "item.json", false)
            .unwrap();
        let b = paths
            .resolve("14.9.1", "en_US", "item", "item.json", false)
            .unwrap();
        assert_eq!(a.rel_path, b.rel_path);
        assert_eq!(a.abs_path, b.abs_path);
    }

    #[test]
    fn test_dir_create_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let paths = UploadPaths::new(tmp.path());
        paths.dir_for("15.1.1", "en_US", "champion", true).unwrap();
        // Second call must not fail on the existing directory.
        let dir = paths.dir_for("15.1.1", "en_US", "champion", true).unwrap();
        assert!(dir.abs_dir.is_dir());
    }
}
