//! Disk-backed storage primitives for cached documents and assets.
//!
//! JSON documents are written via temp-file + atomic rename; binary assets
//! are plain writes with parent-directory creation. Hard linking is
//! best-effort: a `false` return tells the caller to fall back to a full
//! write.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MirrorError, Result};

/// Return file content if the path exists, `None` otherwise.
///
/// An existing-but-unreadable file is a fatal [`MirrorError::Read`], never
/// a cache miss.
pub fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    if !path.exists() {
        return Ok(None);
    }
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) => Err(MirrorError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
            source: Some(e),
        }),
    }
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Serialize `value` and write it to `dir/filename` atomically.
///
/// Writes to a temp file with a PID suffix, flushes, then renames onto the
/// target so readers never observe a torn document.
pub fn write_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| MirrorError::io_with_path(e, dir))?;

    let target = dir.join(filename);
    let temp_path = target.with_extension(format!("json.{}.tmp", process::id()));

    let serialized = serde_json::to_string(value).map_err(|e| MirrorError::Decode {
        context: filename.to_string(),
        message: e.to_string(),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| MirrorError::io_with_path(e, &temp_path))?;
        file.write_all(serialized.as_bytes())
            .map_err(|e| MirrorError::io_with_path(e, &temp_path))?;
        file.flush()
            .map_err(|e| MirrorError::io_with_path(e, &temp_path))?;
        file.sync_all()
            .map_err(|e| MirrorError::io_with_path(e, &temp_path))?;
    }

    fs::rename(&temp_path, &target).map_err(|e| MirrorError::io_with_path(e, &target))?;
    debug!("wrote document {}", target.display());
    Ok(target)
}

/// Write raw bytes, creating parent directories as needed.
pub fn write_binary(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MirrorError::io_with_path(e, parent))?;
    }
    let mut file = File::create(path).map_err(|e| MirrorError::io_with_path(e, path))?;
    file.write_all(bytes)
        .map_err(|e| MirrorError::io_with_path(e, path))?;
    Ok(())
}

/// Attempt a hard link from `existing` to `new`.
///
/// Returns `false` on failure (cross-filesystem links, unsupported FS,
/// target already present); the caller falls back to a full write.
pub fn hard_link(existing: &Path, new: &Path) -> bool {
    if let Some(parent) = new.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    match fs::hard_link(existing, new) {
        Ok(()) => {
            debug!("linked {} -> {}", new.display(), existing.display());
            true
        }
        Err(e) => {
            warn!(
                "hard link {} -> {} failed, falling back to write: {}",
                new.display(),
                existing.display(),
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_if_exists_absent() {
        let tmp = TempDir::new().unwrap();
        let got = read_if_exists(&tmp.path().join("missing.json")).unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_write_json_then_read() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("dir");
        let value = json!({"data": {"Flash": {"id": "SummonerFlash"}}});

        let written = write_json(&dir, "summoner.json", &value).unwrap();
        assert_eq!(written, dir.join("summoner.json"));

        let bytes = read_if_exists(&written).unwrap().unwrap();
        let reread: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reread, value);
    }

    #[test]
    fn test_write_json_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        write_json(tmp.path(), "x.json", &json!([1, 2, 3])).unwrap();
        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["x.json"]);
    }

    #[test]
    fn test_write_binary_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.png");
        write_binary(&path, b"\x89PNG").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_hard_link_shares_content() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("v1.png");
        let second = tmp.path().join("v2.png");
        write_binary(&first, b"same-bytes").unwrap();

        assert!(hard_link(&first, &second));
        assert_eq!(fs::read(&second).unwrap(), b"same-bytes");
    }

    #[test]
    fn test_hard_link_failure_is_non_fatal() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("no-such-source.png");
        let target = tmp.path().join("target.png");
        assert!(!hard_link(&missing, &target));
        assert!(!target.exists());
    }
}
