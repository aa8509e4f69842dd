use std::path::Path;

use opal_error::Result;
use opal_project::read_manifest_in;

pub struct ListManager;

pub struct DependencyListing {
    pub name: String,
    pub range: String,
    pub dev: bool,
}

impl ListManager {
    /// The manifest's declared dependencies, runtime first, in manifest
    /// order.
    pub fn list(project_dir: &Path) -> Result<Vec<DependencyListing>> {
        let manifest = read_manifest_in(project_dir)?;
        let mut listings = Vec::new();

        if let Some(deps) = &manifest.dependencies {
            for (name, range) in deps {
                listings.push(DependencyListing {
                    name: name.clone(),
                    range: range.clone(),
                    dev: false,
                });
            }
        }
        if let Some(deps) = &manifest.dev_dependencies {
            for (name, range) in deps {
                listings.push(DependencyListing {
                    name: name.clone(),
                    range: range.clone(),
                    dev: true,
                });
            }
        }

        Ok(listings)
    }
}
