use std::path::Path;

use opal_error::{PackageManagerError, Result};
use opal_project::read_manifest_in;
use opal_project::write_manifest_in;
use opal_registry::RegistryClient;

pub struct UpdateManager<'a> {
    registry: &'a dyn RegistryClient,
}

impl<'a> UpdateManager<'a> {
    pub fn new(registry: &'a dyn RegistryClient) -> Self {
        Self { registry }
    }

    /// Point manifest entries at the registry's current latest. With no
    /// names, every runtime dependency is updated. The installed tree is
    /// untouched until the next install run.
    pub fn update(&self, project_dir: &Path, names: &[String]) -> Result<()> {
        let mut manifest = read_manifest_in(project_dir)?;

        let targets: Vec<String> = if names.is_empty() {
            manifest.runtime_dependencies().keys().cloned().collect()
        } else {
            names.to_vec()
        };

        if targets.is_empty() {
            opal_logger::info("No dependencies to update.");
            return Ok(());
        }

        let mut updated_any = false;
        for name in &targets {
            let Some(deps) = manifest.dependencies.as_mut() else {
                break;
            };
            if !deps.contains_key(name) {
                opal_logger::warn(&format!("{name} not found in package.json"));
                continue;
            }

            match self.registry.fetch_metadata(name, "latest") {
                Ok(metadata) => {
                    deps.insert(name.clone(), metadata.version.clone());
                    updated_any = true;
                    opal_logger::success(&format!(
                        "Updated {name} to version {}",
                        metadata.version
                    ));
                }
                Err(PackageManagerError::PackageNotFound(_)) => {
                    opal_logger::warn(&format!("{name} no longer exists at the registry"));
                }
                Err(e) => return Err(e),
            }
        }

        if updated_any {
            write_manifest_in(project_dir, &manifest)?;
            opal_logger::info("Run 'opal install' to apply the updates.");
        }

        Ok(())
    }
}
