use std::path::Path;

use anyhow::Result;

use opal_core::UpdateManager;
use opal_registry::HttpRegistry;

pub struct UpdateHandler;

impl UpdateHandler {
    pub fn handle_update(packages: &[String]) -> Result<()> {
        let registry = HttpRegistry::new();
        let manager = UpdateManager::new(&registry);
        manager.update(Path::new("."), packages)?;
        Ok(())
    }
}
