use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use opal_error::{PackageManagerError, Result};
use opal_registry::{PackageMetadata, RegistryClient};

/// In-memory registry: version lists, dependency edges, and "tarballs"
/// that materialize as complete package directories. Calls are recorded so
/// tests can assert what the manager actually asked for.
pub struct MockRegistry {
    versions: IndexMap<String, Vec<String>>,
    dependencies: IndexMap<String, IndexMap<String, String>>,
    unavailable: HashSet<String>,
    pub list_calls: RefCell<Vec<String>>,
    pub download_calls: RefCell<Vec<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            versions: IndexMap::new(),
            dependencies: IndexMap::new(),
            unavailable: HashSet::new(),
            list_calls: RefCell::new(Vec::new()),
            download_calls: RefCell::new(Vec::new()),
        }
    }

    pub fn publish(&mut self, name: &str, versions: &[&str]) -> &mut Self {
        self.versions.insert(
            name.to_string(),
            versions.iter().map(ToString::to_string).collect(),
        );
        self
    }

    pub fn depends(&mut self, name: &str, deps: &[(&str, &str)]) -> &mut Self {
        self.dependencies.insert(
            name.to_string(),
            deps.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn break_transport_for(&mut self, name: &str) -> &mut Self {
        self.unavailable.insert(name.to_string());
        self
    }

    /// The five-package diamond: four roots all wanting module-b, three
    /// incompatible ways.
    pub fn diamond() -> Self {
        let mut registry = Self::new();
        registry
            .publish("module-a", &["1.0.0", "1.1.0", "2.0.0"])
            .publish("module-b", &["1.0.0", "1.5.0", "2.0.0"])
            .publish("module-c", &["1.0.0", "1.2.0", "1.3.0"])
            .publish("module-d", &["1.0.0", "1.1.0", "1.2.0"])
            .publish("module-e", &["1.0.0", "2.0.0", "2.1.0"])
            .depends("module-a", &[("module-b", "^1.0.0")])
            .depends("module-c", &[("module-b", "^2.0.0")])
            .depends("module-d", &[("module-b", "^1.5.0")])
            .depends("module-e", &[("module-b", "~1.0.0")]);
        registry
    }

    fn metadata_for(&self, name: &str, version: &str) -> PackageMetadata {
        PackageMetadata {
            version: version.to_string(),
            dependencies: self.dependencies.get(name).cloned().unwrap_or_default(),
            tarball_url: format!("mock://{name}/{version}"),
            integrity: None,
        }
    }
}

impl RegistryClient for MockRegistry {
    fn list_versions(&self, name: &str) -> Result<Vec<String>> {
        self.list_calls.borrow_mut().push(name.to_string());
        if self.unavailable.contains(name) {
            return Err(PackageManagerError::RegistryUnavailable(format!(
                "connection refused for {name}"
            )));
        }
        self.versions
            .get(name)
            .cloned()
            .ok_or_else(|| PackageManagerError::PackageNotFound(name.to_string()))
    }

    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata> {
        if self.unavailable.contains(name) {
            return Err(PackageManagerError::RegistryUnavailable(format!(
                "connection refused for {name}"
            )));
        }
        let versions = self
            .versions
            .get(name)
            .ok_or_else(|| PackageManagerError::PackageNotFound(name.to_string()))?;

        if version == "latest" {
            let latest = versions.last().ok_or_else(|| {
                PackageManagerError::VersionNotFound(name.to_string(), version.to_string())
            })?;
            return Ok(self.metadata_for(name, latest));
        }

        if !versions.iter().any(|v| v == version) {
            return Err(PackageManagerError::VersionNotFound(
                name.to_string(),
                version.to_string(),
            ));
        }
        Ok(self.metadata_for(name, version))
    }

    fn download_tarball(&self, name: &str, version: &str, target_dir: &Path) -> Result<()> {
        self.download_calls
            .borrow_mut()
            .push(format!("{name}@{version}"));
        self.fetch_metadata(name, version)?;
        write_package_fixture(
            target_dir,
            name,
            version,
            &self.dependencies.get(name).cloned().unwrap_or_default(),
        );
        Ok(())
    }
}

/// Lay down a complete package directory the validator will accept.
pub fn write_package_fixture(
    dir: &Path,
    name: &str,
    version: &str,
    deps: &IndexMap<String, String>,
) {
    fs::create_dir_all(dir).unwrap();

    let deps_json: Vec<String> = deps
        .iter()
        .map(|(k, v)| format!("    \"{k}\": \"{v}\""))
        .collect();
    let manifest = format!(
        "{{\n  \"name\": \"{name}\",\n  \"version\": \"{version}\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
        deps_json.join(",\n")
    );

    fs::write(dir.join("package.json"), manifest).unwrap();
    fs::write(dir.join("README.md"), format!("# {name}\n")).unwrap();
    fs::write(dir.join("LICENSE"), "MIT\n").unwrap();
    fs::write(dir.join("index.js"), format!("module.exports = '{name}';\n")).unwrap();
}

/// A throwaway project directory with the given manifest dependencies.
pub fn write_project_manifest(project_dir: &Path, deps: &[(&str, &str)]) {
    let deps_json: Vec<String> = deps
        .iter()
        .map(|(k, v)| format!("    \"{k}\": \"{v}\""))
        .collect();
    let manifest = format!(
        "{{\n  \"name\": \"fixture-project\",\n  \"version\": \"1.0.0\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
        deps_json.join(",\n")
    );
    fs::write(project_dir.join("package.json"), manifest).unwrap();
}
