use indexmap::IndexMap;

use crate::manifest::{DependencyType, Manifest};

pub struct DependencyManager;

impl DependencyManager {
    /// Record `name` at `version` under the given dependency table,
    /// creating the table if the manifest had none.
    pub fn add_dependency(
        manifest: &mut Manifest,
        name: &str,
        version: &str,
        dep_type: DependencyType,
    ) {
        let table = match dep_type {
            DependencyType::Dependencies => &mut manifest.dependencies,
            DependencyType::DevDependencies => &mut manifest.dev_dependencies,
        };
        table
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), version.to_string());
    }

    /// Drop `name` from every dependency table. Returns whether anything
    /// was removed.
    pub fn remove_dependency(manifest: &mut Manifest, name: &str) -> bool {
        let mut removed = false;
        if let Some(deps) = &mut manifest.dependencies {
            removed |= deps.shift_remove(name).is_some();
        }
        if let Some(deps) = &mut manifest.dev_dependencies {
            removed |= deps.shift_remove(name).is_some();
        }
        removed
    }

    #[must_use]
    pub fn has_dependency(manifest: &Manifest, name: &str) -> Option<DependencyType> {
        if manifest
            .dependencies
            .as_ref()
            .is_some_and(|deps| deps.contains_key(name))
        {
            return Some(DependencyType::Dependencies);
        }
        if manifest
            .dev_dependencies
            .as_ref()
            .is_some_and(|deps| deps.contains_key(name))
        {
            return Some(DependencyType::DevDependencies);
        }
        None
    }
}

impl Manifest {
    pub fn add_dependency(&mut self, name: &str, version: &str, dep_type: DependencyType) {
        DependencyManager::add_dependency(self, name, version, dep_type);
    }

    pub fn remove_dependency(&mut self, name: &str) -> bool {
        DependencyManager::remove_dependency(self, name)
    }

    #[must_use]
    pub fn has_dependency(&self, name: &str) -> Option<DependencyType> {
        DependencyManager::has_dependency(self, name)
    }
}
