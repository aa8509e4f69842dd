use std::path::Path;

use anyhow::Result;

use opal_core::CleanManager;

pub struct CleanHandler;

impl CleanHandler {
    pub fn handle_clean(modules: bool) -> Result<()> {
        CleanManager::clean_cache(Path::new("."))?;
        if modules {
            CleanManager::clean_modules(Path::new("."))?;
        }
        Ok(())
    }
}
