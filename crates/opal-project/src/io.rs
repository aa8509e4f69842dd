use std::fs;
use std::io;
use std::path::Path;

use opal_constants::MANIFEST_FILE;
use opal_error::{PackageManagerError, Result};

use crate::manifest::Manifest;

pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PackageManagerError::ManifestMissing(path.display().to_string())
        } else {
            PackageManagerError::IoError(e.to_string())
        }
    })?;

    serde_json::from_str(&content)
        .map_err(|e| PackageManagerError::ManifestInvalid(e.to_string()))
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    let content = serde_json::to_string_pretty(manifest)
        .map_err(|e| PackageManagerError::ManifestInvalid(e.to_string()))?;
    fs::write(path, content + "\n").map_err(|e| PackageManagerError::IoError(e.to_string()))?;
    Ok(())
}

pub fn read_manifest_in(project_dir: &Path) -> Result<Manifest> {
    read_manifest(&project_dir.join(MANIFEST_FILE))
}

pub fn write_manifest_in(project_dir: &Path, manifest: &Manifest) -> Result<()> {
    write_manifest(&project_dir.join(MANIFEST_FILE), manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_manifest_is_its_own_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_manifest_in(tmp.path()).unwrap_err();
        assert!(matches!(err, PackageManagerError::ManifestMissing(_)));
    }

    #[test]
    fn invalid_json_is_its_own_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("package.json"), "{not json").unwrap();
        let err = read_manifest_in(tmp.path()).unwrap_err();
        assert!(matches!(err, PackageManagerError::ManifestInvalid(_)));
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let raw = r#"{
  "name": "fixture",
  "version": "1.0.0",
  "dependencies": {
    "b-module": "^1.0.0",
    "a-module": "^2.0.0"
  },
  "exotic": {"nested": [1, 2, 3]},
  "browserslist": ["defaults"]
}"#;
        fs::write(tmp.path().join("package.json"), raw).unwrap();

        let manifest = read_manifest_in(tmp.path()).unwrap();
        write_manifest_in(tmp.path(), &manifest).unwrap();
        let reread = read_manifest_in(tmp.path()).unwrap();

        assert_eq!(reread.name.as_deref(), Some("fixture"));
        assert!(reread.other.contains_key("exotic"));
        assert!(reread.other.contains_key("browserslist"));
        assert_eq!(
            reread.other.get("exotic"),
            manifest.other.get("exotic")
        );

        // Dependency order is insertion order, not alphabetical.
        let names: Vec<String> = reread.all_dependencies().into_keys().collect();
        assert_eq!(names, vec!["b-module", "a-module"]);
    }
}
