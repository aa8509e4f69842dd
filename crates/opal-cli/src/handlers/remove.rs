use std::path::Path;

use anyhow::Result;

use opal_core::RemoveManager;

pub struct RemoveHandler;

impl RemoveHandler {
    pub fn handle_remove(packages: &[String]) -> Result<()> {
        for name in packages {
            RemoveManager::remove(Path::new("."), name)?;
        }
        Ok(())
    }
}
