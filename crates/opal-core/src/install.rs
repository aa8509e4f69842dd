use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use opal_cache::CacheStore;
use opal_constants::MODULES_DIR;
use opal_error::{PackageManagerError, Result};
use opal_logger::Phase;
use opal_registry::RegistryClient;
use opal_resolver::{PackageId, Resolution};
use opal_utils::get_scoped_package_path;

use crate::validate::Validator;

/// Materializes a resolution onto the target tree. Hoisted packages land at
/// `{root}/{name}`; a version that lost the hoist goes under each parent's
/// `node_modules`. Cache hits are symlinked, misses are downloaded once and
/// then fed back into the cache.
pub struct Installer<'a> {
    registry: &'a dyn RegistryClient,
    cache: &'a CacheStore,
    tree_root: PathBuf,
    installed: HashSet<PackageId>,
    order: Vec<PackageId>,
}

impl<'a> Installer<'a> {
    pub fn new(registry: &'a dyn RegistryClient, cache: &'a CacheStore, tree_root: &Path) -> Self {
        Self {
            registry,
            cache,
            tree_root: tree_root.to_path_buf(),
            installed: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// PackageIds materialized so far, in installation order.
    #[must_use]
    pub fn installed_order(&self) -> &[PackageId] {
        &self.order
    }

    #[must_use]
    pub fn is_installed(&self, id: &PackageId) -> bool {
        self.installed.contains(id)
    }

    /// Walk the resolution in insertion order. Per-package failures are
    /// collected, not propagated; validation verdicts are reported the same
    /// way and never undo an install.
    pub fn install_resolution(
        &mut self,
        resolution: &Resolution,
    ) -> Result<Vec<(PackageId, PackageManagerError)>> {
        fs::create_dir_all(&self.tree_root)
            .map_err(|e| PackageManagerError::IoError(e.to_string()))?;

        let mut failures = Vec::new();
        let total = resolution.len();

        for (index, id) in resolution.order().iter().enumerate() {
            if self.installed.contains(id) {
                continue;
            }

            // A destination left by a prior run that still answers to the
            // right name and version is not re-installed.
            if self.already_materialized(id, resolution) {
                continue;
            }

            match self.install_package(id, resolution, (index + 1, total)) {
                Ok(primary_path) => {
                    self.installed.insert(id.clone());
                    self.order.push(id.clone());

                    opal_logger::step(Phase::Validating, &id.to_string(), index + 1, total);
                    if let Err(verdict) =
                        Validator::verify_package(&primary_path, &id.name, &id.version, None)
                    {
                        opal_logger::warn(&format!("Verification failed for {id}: {verdict}"));
                    }
                }
                Err(error) => {
                    opal_logger::error(&format!("Failed to install {id}: {error}"));
                    failures.push((id.clone(), error));
                }
            }
        }

        Ok(failures)
    }

    /// Install one package at every destination the placement rule gives
    /// it. Returns the primary (first) destination.
    fn install_package(
        &mut self,
        id: &PackageId,
        resolution: &Resolution,
        (position, total): (usize, usize),
    ) -> Result<PathBuf> {
        let destinations = self.destinations(id, resolution);
        let Some(primary) = destinations.first().cloned() else {
            // A package with no hoist slot and no parents has nowhere to
            // go; the resolver never produces this shape.
            return Err(PackageManagerError::IoError(format!(
                "no install destination for {id}"
            )));
        };

        if let Some(cached) = self.cache.get(&id.name, &id.version) {
            opal_logger::step(Phase::Linking, &id.to_string(), position, total);
            for dest in &destinations {
                self.link_into_place(&cached, dest)?;
            }
            return Ok(primary);
        }

        opal_logger::step(Phase::Downloading, &id.to_string(), position, total);
        self.prepare_destination(&primary)?;
        self.registry
            .download_tarball(&id.name, &id.version, &primary)?;
        self.cache.put(&id.name, &id.version, &primary)?;

        if destinations.len() > 1 {
            if let Some(cached) = self.cache.get(&id.name, &id.version) {
                for dest in destinations.iter().skip(1) {
                    self.link_into_place(&cached, dest)?;
                }
            }
        }

        Ok(primary)
    }

    /// Whether every destination for `id` already holds a manifest naming
    /// exactly this package and version.
    fn already_materialized(&self, id: &PackageId, resolution: &Resolution) -> bool {
        let destinations = self.destinations(id, resolution);
        !destinations.is_empty()
            && destinations.iter().all(|dest| {
                opal_project::read_manifest(&dest.join("package.json")).is_ok_and(|manifest| {
                    manifest.name.as_deref() == Some(id.name.as_str())
                        && manifest.version.as_deref() == Some(id.version.as_str())
                })
            })
    }

    /// The placement rule: the top-level selection is hoisted to the tree
    /// root, every other version nests under each of its parents.
    fn destinations(&self, id: &PackageId, resolution: &Resolution) -> Vec<PathBuf> {
        if resolution.top_level().get(&id.name) == Some(&id.version) {
            return vec![get_scoped_package_path(&self.tree_root, &id.name)];
        }

        resolution
            .parents(id)
            .map(|parents| {
                parents
                    .iter()
                    .map(|parent| {
                        let parent_dir = get_scoped_package_path(&self.tree_root, &parent.name);
                        get_scoped_package_path(&parent_dir.join(MODULES_DIR), &id.name)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Point `dest` at a cache entry. The link target is absolute so it
    /// survives being looked at from any working directory.
    fn link_into_place(&self, cached: &Path, dest: &Path) -> Result<()> {
        self.prepare_destination(dest)?;
        let cached = cached
            .canonicalize()
            .unwrap_or_else(|_| cached.to_path_buf());
        create_symlink(&cached, dest)
    }

    /// Clear the way for an install at `dest`: make symlinked ancestors
    /// real, create the parent chain, and drop whatever currently occupies
    /// the slot.
    fn prepare_destination(&self, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            self.materialize_symlink_ancestors(parent)?;
            fs::create_dir_all(parent).map_err(|e| PackageManagerError::IoError(e.to_string()))?;
        }

        if dest.exists() || dest.is_symlink() {
            remove_existing(dest)?;
        }

        Ok(())
    }

    /// Between the tree root and `path`, any directory that is a symlink is
    /// a hoisted cache link about to receive nested content; replace it
    /// with a real copy of its target so cache entries stay immutable.
    /// Nothing at or above the tree root is ever touched.
    fn materialize_symlink_ancestors(&self, path: &Path) -> Result<()> {
        let mut chain: Vec<&Path> = Vec::new();
        let mut cursor = Some(path);
        while let Some(current) = cursor {
            if current == self.tree_root {
                break;
            }
            chain.push(current);
            cursor = current.parent();
        }

        for current in chain.into_iter().rev() {
            if current.is_symlink() {
                let target = fs::read_link(current)
                    .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
                fs::remove_file(current)
                    .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
                fs::create_dir_all(current)
                    .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
                fs_extra::dir::copy(
                    &target,
                    current,
                    &fs_extra::dir::CopyOptions::new().content_only(true),
                )
                .map_err(|e| PackageManagerError::IoError(e.to_string()))?;
            }
        }

        Ok(())
    }
}

fn remove_existing(dest: &Path) -> Result<()> {
    let result = if dest.is_dir() && !dest.is_symlink() {
        fs::remove_dir_all(dest)
    } else {
        fs::remove_file(dest)
    };
    result.map_err(|e| PackageManagerError::IoError(e.to_string()))
}

fn create_symlink(source: &Path, dest: &Path) -> Result<()> {
    #[cfg(target_family = "unix")]
    let linked = std::os::unix::fs::symlink(source, dest);

    #[cfg(target_family = "windows")]
    let linked = std::os::windows::fs::symlink_dir(source, dest);

    linked.map_err(|e| PackageManagerError::IoError(e.to_string()))
}
