use std::path::Path;

use indexmap::IndexMap;

use opal_error::{PackageManagerError, Result};
use opal_project::{Manifest, write_manifest_in};
use opal_utils::get_manifest_path;

pub struct InitManager;

impl InitManager {
    /// Write a fresh package.json. Refuses to clobber an existing one.
    pub fn init(project_dir: &Path, name: &str, version: Option<&str>) -> Result<()> {
        let manifest_path = get_manifest_path(project_dir);
        if manifest_path.exists() {
            return Err(PackageManagerError::ManifestInvalid(format!(
                "package.json already exists at {}",
                manifest_path.display()
            )));
        }

        let mut scripts = IndexMap::new();
        scripts.insert(
            "test".to_string(),
            "echo \"Error: no test specified\" && exit 1".to_string(),
        );

        let manifest = Manifest {
            name: Some(name.to_string()),
            version: Some(version.unwrap_or("1.0.0").to_string()),
            description: Some(String::new()),
            license: Some("ISC".to_string()),
            main: Some("index.js".to_string()),
            scripts: Some(scripts),
            dependencies: Some(IndexMap::new()),
            ..Manifest::default()
        };

        write_manifest_in(project_dir, &manifest)?;
        opal_logger::success("Initialized package.json");
        Ok(())
    }
}
