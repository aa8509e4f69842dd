use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use opal_error::{PackageManagerError, Result};
use opal_project::Manifest;
use opal_resolver::Resolution;

/// One locked name: the version hoisted for it plus the child versions
/// observed during resolution. Names nested for version conflicts still get
/// a single top-level entry here; the lock schema keeps one version per
/// name by design.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LockDocument {
    pub dependencies: IndexMap<String, LockEntry>,
}

impl LockDocument {
    /// name -> locked version, in lock order. Used to seed resolution.
    #[must_use]
    pub fn locked_versions(&self) -> IndexMap<String, String> {
        self.dependencies
            .iter()
            .map(|(name, entry)| (name.clone(), entry.version.clone()))
            .collect()
    }
}

/// Collapse a resolution into the lock schema: first-resolved version per
/// name, children deep-sorted for stable output.
#[must_use]
pub fn document_from_resolution(resolution: &Resolution) -> LockDocument {
    let mut doc = LockDocument::default();

    for id in resolution.packages().keys() {
        doc.dependencies
            .entry(id.name.clone())
            .or_insert_with(|| LockEntry {
                version: id.version.clone(),
                dependencies: BTreeMap::new(),
            });
    }

    for (child, parents) in resolution.packages() {
        for parent in parents {
            if let Some(entry) = doc.dependencies.get_mut(&parent.name) {
                if entry.version == parent.version {
                    entry
                        .dependencies
                        .insert(child.name.clone(), child.version.clone());
                }
            }
        }
    }

    doc
}

/// Reads and writes the lock file beside the manifest and decides whether a
/// prior lock is still authoritative for a manifest.
pub struct LockStore {
    path: PathBuf,
}

impl LockStore {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no lock file exists.
    pub fn read(&self) -> Result<Option<LockDocument>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PackageManagerError::LockfileError(e.to_string())),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| PackageManagerError::LockfileError(e.to_string()))
    }

    pub fn write(&self, resolution: &Resolution) -> Result<()> {
        self.write_document(&document_from_resolution(resolution))
    }

    pub fn write_document(&self, doc: &LockDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)
            .map_err(|e| PackageManagerError::LockfileError(e.to_string()))?;
        fs::write(&self.path, content + "\n")
            .map_err(|e| PackageManagerError::LockfileError(e.to_string()))?;
        Ok(())
    }

    /// A lock is current when it exists, covers every runtime dependency of
    /// the manifest, and records exactly the version string the manifest
    /// requests. devDependencies are not consulted; that asymmetry is
    /// long-standing behavior callers rely on.
    #[must_use]
    pub fn is_current(&self, manifest: &Manifest) -> bool {
        let Ok(Some(doc)) = self.read() else {
            return false;
        };

        manifest.runtime_dependencies().iter().all(|(name, range)| {
            doc.dependencies
                .get(name)
                .is_some_and(|entry| entry.version == *range)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_project::DependencyType;

    fn sample_document() -> LockDocument {
        let mut doc = LockDocument::default();
        doc.dependencies.insert(
            "module-a".to_string(),
            LockEntry {
                version: "1.1.0".to_string(),
                dependencies: BTreeMap::from([(
                    "module-b".to_string(),
                    "1.5.0".to_string(),
                )]),
            },
        );
        doc.dependencies.insert(
            "module-b".to_string(),
            LockEntry {
                version: "1.5.0".to_string(),
                dependencies: BTreeMap::new(),
            },
        );
        doc
    }

    #[test]
    fn read_write_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        let doc = sample_document();

        store.write_document(&doc).unwrap();
        let reread = store.read().unwrap().unwrap();
        assert_eq!(reread, doc);
    }

    #[test]
    fn lock_json_shape_and_indentation() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        store.write_document(&sample_document()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"dependencies\": {"));
        assert!(raw.contains("  \"module-a\": {"), "two-space indent expected");
        assert!(raw.contains("\"version\": \"1.1.0\""));
    }

    #[test]
    fn missing_lock_reads_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn missing_lock_is_not_current() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        assert!(!store.is_current(&Manifest::default()));
    }

    #[test]
    fn current_requires_verbatim_version_match() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        store.write_document(&sample_document()).unwrap();

        let mut manifest = Manifest::default();
        manifest.add_dependency("module-a", "1.1.0", DependencyType::Dependencies);
        assert!(store.is_current(&manifest));

        manifest.add_dependency("module-a", "^1.1.0", DependencyType::Dependencies);
        assert!(!store.is_current(&manifest));
    }

    #[test]
    fn new_manifest_dependency_goes_stale() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        store.write_document(&sample_document()).unwrap();

        let mut manifest = Manifest::default();
        manifest.add_dependency("module-a", "1.1.0", DependencyType::Dependencies);
        manifest.add_dependency("brand-new", "1.0.0", DependencyType::Dependencies);
        assert!(!store.is_current(&manifest));
    }

    #[test]
    fn dev_dependencies_are_ignored_by_freshness() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LockStore::new(&tmp.path().join("package-lock.json"));
        store.write_document(&sample_document()).unwrap();

        let mut manifest = Manifest::default();
        manifest.add_dependency("module-a", "1.1.0", DependencyType::Dependencies);
        manifest.add_dependency("not-locked", "^1.0.0", DependencyType::DevDependencies);
        assert!(store.is_current(&manifest));
    }

    #[test]
    fn locked_versions_keep_lock_order() {
        let doc = sample_document();
        let names: Vec<String> = doc.locked_versions().into_keys().collect();
        assert_eq!(names, vec!["module-a", "module-b"]);
    }
}
