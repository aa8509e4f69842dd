use std::path::Path;

use opal_error::{PackageManagerError, Result};
use opal_project::{DependencyType, read_manifest_in, write_manifest_in};
use opal_registry::RegistryClient;
use opal_resolver::VersionRange;
use opal_utils::{format_version_string, parse_pkg_spec};

/// Records a dependency in the manifest. Installation is a separate step;
/// callers that want both run the install manager afterwards.
pub struct AddManager<'a> {
    registry: &'a dyn RegistryClient,
}

impl<'a> AddManager<'a> {
    pub fn new(registry: &'a dyn RegistryClient) -> Self {
        Self { registry }
    }

    /// Add `spec` (`name` or `name@range`) to the manifest. A spec without
    /// a version resolves to the registry's latest and is stored with a
    /// caret unless `save_exact`. Returns (name, recorded range).
    pub fn add(
        &self,
        project_dir: &Path,
        spec: &str,
        dev: bool,
        save_exact: bool,
    ) -> Result<(String, String)> {
        let (name, requested) = parse_pkg_spec(spec);
        if name.is_empty() {
            return Err(PackageManagerError::InvalidPackageSpec(spec.to_string()));
        }

        let recorded = if requested == "latest" {
            let version = self.latest_version(&name)?;
            format_version_string(&version, save_exact)
        } else {
            requested
        };

        let mut manifest = read_manifest_in(project_dir)?;
        let dep_type = if dev {
            DependencyType::DevDependencies
        } else {
            DependencyType::Dependencies
        };
        manifest.add_dependency(&name, &recorded, dep_type);
        write_manifest_in(project_dir, &manifest)?;

        opal_logger::success(&format!(
            "Added {name}@{recorded} to {}",
            if dev { "devDependencies" } else { "dependencies" }
        ));

        Ok((name, recorded))
    }

    fn latest_version(&self, name: &str) -> Result<String> {
        let versions = self.registry.list_versions(name)?;
        let range = VersionRange::parse("latest")?;
        range.max_satisfying(&versions).ok_or_else(|| {
            PackageManagerError::VersionNotFound(name.to_string(), "latest".to_string())
        })
    }
}
