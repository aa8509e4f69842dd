use std::fs;
use std::path::Path;

use opal_cache::CacheStore;
use opal_error::{PackageManagerError, Result};
use opal_utils::{get_cache_path, get_modules_path};

pub struct CleanManager;

impl CleanManager {
    /// Empty the package cache beside the project's tree.
    pub fn clean_cache(project_dir: &Path) -> Result<()> {
        let cache_root = get_cache_path(&get_modules_path(project_dir));
        if !cache_root.exists() {
            opal_logger::info("No package cache found to clean.");
            return Ok(());
        }

        let cache = CacheStore::new(&cache_root)?;
        cache.clear()?;
        opal_logger::finish("Cleaned package cache");
        Ok(())
    }

    /// Delete the installed tree entirely.
    pub fn clean_modules(project_dir: &Path) -> Result<()> {
        let modules = get_modules_path(project_dir);
        if !modules.exists() {
            opal_logger::info("No node_modules directory found to clean.");
            return Ok(());
        }

        fs::remove_dir_all(&modules)
            .map_err(|e| PackageManagerError::IoError(format!("failed to clean tree: {e}")))?;
        opal_logger::finish("Removed node_modules");
        Ok(())
    }
}
