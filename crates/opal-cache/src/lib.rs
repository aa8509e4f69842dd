use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use opal_error::{PackageManagerError, Result};

/// Content-addressed store of extracted packages, keyed by a 128-bit hash
/// of `name@version`. Entries are immutable once present; writers stage
/// into a temp directory and rename, so readers never observe a partial
/// entry. The cache is advisory: anything here can be re-downloaded.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: &Path) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| {
            PackageManagerError::IoError(format!(
                "failed to create cache at {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn entry_path(&self, name: &str, version: &str) -> PathBuf {
        let digest = Md5::digest(format!("{name}@{version}").as_bytes());
        self.root.join(format!("{digest:x}"))
    }

    #[must_use]
    pub fn has(&self, name: &str, version: &str) -> bool {
        self.entry_path(name, version).exists()
    }

    #[must_use]
    pub fn get(&self, name: &str, version: &str) -> Option<PathBuf> {
        let path = self.entry_path(name, version);
        path.exists().then_some(path)
    }

    /// Copy `source_dir` into the cache. A no-op when the entry already
    /// exists. The copy lands in a staging directory first and is renamed
    /// into place, keeping partially written entries invisible.
    pub fn put(&self, name: &str, version: &str, source_dir: &Path) -> Result<()> {
        let entry = self.entry_path(name, version);
        if entry.exists() {
            return Ok(());
        }

        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(&self.root)
            .map_err(|e| PackageManagerError::IoError(e.to_string()))?;

        fs_extra::dir::copy(
            source_dir,
            staging.path(),
            &fs_extra::dir::CopyOptions::new().content_only(true),
        )
        .map_err(|e| {
            PackageManagerError::IoError(format!(
                "failed to cache {name}@{version}: {e}"
            ))
        })?;

        let staged = staging.keep();
        match fs::rename(&staged, &entry) {
            Ok(()) => Ok(()),
            // A concurrent writer finishing first leaves a complete entry;
            // accept it and discard our staging copy.
            Err(_) if entry.exists() => {
                let _ = fs::remove_dir_all(&staged);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_dir_all(&staged);
                Err(PackageManagerError::IoError(format!(
                    "failed to finalize cache entry for {name}@{version}: {e}"
                )))
            }
        }
    }

    /// Remove the cache root and recreate it empty.
    pub fn clear(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)
                .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_fixture(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("package.json"), "{\"name\":\"x\"}").unwrap();
        fs::write(dir.join("index.js"), "module.exports = 1;").unwrap();
    }

    #[test]
    fn put_then_get_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(&tmp.path().join("cache")).unwrap();
        let source = tmp.path().join("pkg");
        package_fixture(&source);

        assert!(!cache.has("x", "1.0.0"));
        cache.put("x", "1.0.0", &source).unwrap();
        assert!(cache.has("x", "1.0.0"));

        let entry = cache.get("x", "1.0.0").unwrap();
        assert!(entry.join("package.json").exists());
        assert!(entry.join("index.js").exists());
    }

    #[test]
    fn put_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(&tmp.path().join("cache")).unwrap();
        let source = tmp.path().join("pkg");
        package_fixture(&source);

        cache.put("x", "1.0.0", &source).unwrap();
        cache.put("x", "1.0.0", &source).unwrap();
        assert!(cache.has("x", "1.0.0"));
    }

    #[test]
    fn distinct_versions_get_distinct_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(&tmp.path().join("cache")).unwrap();
        assert_ne!(
            cache.entry_path("x", "1.0.0"),
            cache.entry_path("x", "2.0.0")
        );
        assert_ne!(
            cache.entry_path("x", "1.0.0"),
            cache.entry_path("y", "1.0.0")
        );
    }

    #[test]
    fn key_is_a_stable_md5_hex_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(&tmp.path().join("cache")).unwrap();
        let entry = cache.entry_path("left-pad", "1.3.0");
        let file_name = entry.file_name().unwrap().to_string_lossy();
        assert_eq!(file_name.len(), 32);
        assert!(file_name.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn clear_empties_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheStore::new(&tmp.path().join("cache")).unwrap();
        let source = tmp.path().join("pkg");
        package_fixture(&source);

        cache.put("x", "1.0.0", &source).unwrap();
        cache.clear().unwrap();
        assert!(!cache.has("x", "1.0.0"));
        assert!(cache.root().exists());
    }
}
