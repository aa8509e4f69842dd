use std::path::Path;

use anyhow::{Result, bail};

use opal_core::{AddManager, InstallManager};
use opal_registry::HttpRegistry;

pub struct AddHandler;

impl AddHandler {
    /// Record each package in the manifest, then install the newly added
    /// names.
    pub fn handle_add(packages: &[String], dev: bool, save_exact: bool) -> Result<()> {
        let registry = HttpRegistry::new();
        let project_dir = Path::new(".");
        let add_manager = AddManager::new(&registry);

        let mut added = Vec::new();
        for spec in packages {
            let (name, _) = add_manager.add(project_dir, spec, dev, save_exact)?;
            added.push(name);
        }

        let install_manager = InstallManager::new(&registry, project_dir);
        let outcome = install_manager.install(Some(&added))?;
        if !outcome.is_success() {
            bail!("failed to install added packages");
        }

        Ok(())
    }
}
