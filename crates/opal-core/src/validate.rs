use std::fs;
use std::path::Path;

use md5::{Digest, Md5};

use opal_constants::REQUIRED_PACKAGE_FILES;
use opal_error::{PackageManagerError, Result};
use opal_project::read_manifest;

/// Post-install structural and consistency checks. Read-only: a failed
/// verdict never undoes an install.
pub struct Validator;

impl Validator {
    /// Check one installed package. Returns the directory digest on success;
    /// the first violation found is the error.
    pub fn verify_package(
        package_path: &Path,
        name: &str,
        version: &str,
        expected_digest: Option<&str>,
    ) -> Result<String> {
        if !package_path.exists() {
            return Err(PackageManagerError::StructureViolation(
                name.to_string(),
                format!("package directory {} does not exist", package_path.display()),
            ));
        }

        Self::verify_manifest(package_path, name, version)?;
        Self::verify_structure(package_path, name)?;

        let digest = Self::directory_digest(package_path)?;
        if let Some(expected) = expected_digest {
            if digest != expected {
                return Err(PackageManagerError::IntegrityMismatch(
                    name.to_string(),
                    format!("expected {expected}, computed {digest}"),
                ));
            }
        }

        Self::verify_dependencies(package_path, name)?;
        Ok(digest)
    }

    /// The installed manifest must agree with the identity we installed.
    fn verify_manifest(package_path: &Path, expected_name: &str, expected_version: &str) -> Result<()> {
        let manifest = read_manifest(&package_path.join("package.json")).map_err(|e| {
            PackageManagerError::StructureViolation(expected_name.to_string(), e.to_string())
        })?;

        if manifest.name.as_deref() != Some(expected_name) {
            return Err(PackageManagerError::StructureViolation(
                expected_name.to_string(),
                format!(
                    "name mismatch: manifest says {:?}",
                    manifest.name.as_deref().unwrap_or("<none>")
                ),
            ));
        }

        if manifest.version.as_deref() != Some(expected_version) {
            return Err(PackageManagerError::StructureViolation(
                expected_name.to_string(),
                format!(
                    "version mismatch: expected {expected_version}, manifest says {:?}",
                    manifest.version.as_deref().unwrap_or("<none>")
                ),
            ));
        }

        Ok(())
    }

    fn verify_structure(package_path: &Path, name: &str) -> Result<()> {
        for required in REQUIRED_PACKAGE_FILES {
            if !package_path.join(required).exists() {
                return Err(PackageManagerError::StructureViolation(
                    name.to_string(),
                    format!("required file {required} is missing"),
                ));
            }
        }
        Ok(())
    }

    /// Every declared dependency must be present under this package's own
    /// node_modules with a manifest that answers to the right name.
    fn verify_dependencies(package_path: &Path, name: &str) -> Result<()> {
        let manifest = read_manifest(&package_path.join("package.json"))
            .map_err(|e| PackageManagerError::StructureViolation(name.to_string(), e.to_string()))?;

        for dep_name in manifest.runtime_dependencies().keys() {
            let dep_path =
                opal_utils::get_scoped_package_path(&package_path.join("node_modules"), dep_name);
            if !dep_path.exists() {
                return Err(PackageManagerError::DependencyMissing(
                    name.to_string(),
                    dep_name.clone(),
                ));
            }

            let dep_manifest = read_manifest(&dep_path.join("package.json")).map_err(|e| {
                PackageManagerError::DependencyMissing(
                    name.to_string(),
                    format!("{dep_name} ({e})"),
                )
            })?;
            if dep_manifest.name.as_deref() != Some(dep_name.as_str()) {
                return Err(PackageManagerError::DependencyMissing(
                    name.to_string(),
                    format!("{dep_name} (manifest name mismatch)"),
                ));
            }
        }

        Ok(())
    }

    /// md5 over every file's bytes, walking the tree with entries in sorted
    /// order so the digest is stable across filesystems.
    pub fn directory_digest(directory: &Path) -> Result<String> {
        let mut hasher = Md5::new();
        Self::digest_walk(directory, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn digest_walk(directory: &Path, hasher: &mut Md5) -> Result<()> {
        let mut entries: Vec<_> = fs::read_dir(directory)
            .and_then(|dir| dir.collect::<std::io::Result<Vec<_>>>())
            .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
        entries.sort_by_key(std::fs::DirEntry::file_name);

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                Self::digest_walk(&path, hasher)?;
            } else {
                let bytes =
                    fs::read(&path).map_err(|e| PackageManagerError::IoError(e.to_string()))?;
                hasher.update(&bytes);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_package(dir: &Path, name: &str, version: &str, deps: &[(&str, &str)]) {
        fs::create_dir_all(dir).unwrap();
        let deps_json: Vec<String> = deps
            .iter()
            .map(|(k, v)| format!("\"{k}\": \"{v}\""))
            .collect();
        let manifest = format!(
            "{{\"name\": \"{name}\", \"version\": \"{version}\", \"dependencies\": {{{}}}}}",
            deps_json.join(", ")
        );
        fs::write(dir.join("package.json"), manifest).unwrap();
        fs::write(dir.join("README.md"), format!("# {name}\n")).unwrap();
        fs::write(dir.join("LICENSE"), "MIT\n").unwrap();
    }

    #[test]
    fn well_formed_package_passes() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("pkg");
        write_package(&pkg, "left-pad", "1.3.0", &[]);

        let digest = Validator::verify_package(&pkg, "left-pad", "1.3.0", None).unwrap();
        assert_eq!(digest.len(), 32);
    }

    #[test]
    fn missing_readme_is_a_structure_violation() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("pkg");
        write_package(&pkg, "left-pad", "1.3.0", &[]);
        fs::remove_file(pkg.join("README.md")).unwrap();

        let err = Validator::verify_package(&pkg, "left-pad", "1.3.0", None).unwrap_err();
        match err {
            PackageManagerError::StructureViolation(_, detail) => {
                assert!(detail.contains("README.md"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn name_mismatch_is_a_structure_violation() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("pkg");
        write_package(&pkg, "impostor", "1.3.0", &[]);

        let err = Validator::verify_package(&pkg, "left-pad", "1.3.0", None).unwrap_err();
        assert!(matches!(err, PackageManagerError::StructureViolation(..)));
    }

    #[test]
    fn declared_dependency_must_be_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("pkg");
        write_package(&pkg, "app", "1.0.0", &[("helper", "^1.0.0")]);

        let err = Validator::verify_package(&pkg, "app", "1.0.0", None).unwrap_err();
        assert!(matches!(err, PackageManagerError::DependencyMissing(..)));

        write_package(
            &pkg.join("node_modules").join("helper"),
            "helper",
            "1.2.0",
            &[],
        );
        assert!(Validator::verify_package(&pkg, "app", "1.0.0", None).is_ok());
    }

    #[test]
    fn digest_is_deterministic_and_content_sensitive() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        write_package(&a, "pkg", "1.0.0", &[]);
        write_package(&b, "pkg", "1.0.0", &[]);

        let da = Validator::directory_digest(&a).unwrap();
        let db = Validator::directory_digest(&b).unwrap();
        assert_eq!(da, db);

        fs::write(b.join("extra.js"), "changed").unwrap();
        assert_ne!(da, Validator::directory_digest(&b).unwrap());
    }

    #[test]
    fn expected_digest_mismatch_is_integrity_error() {
        let tmp = tempfile::tempdir().unwrap();
        let pkg = tmp.path().join("pkg");
        write_package(&pkg, "left-pad", "1.3.0", &[]);

        let err =
            Validator::verify_package(&pkg, "left-pad", "1.3.0", Some("0000")).unwrap_err();
        assert!(matches!(err, PackageManagerError::IntegrityMismatch(..)));
    }
}
