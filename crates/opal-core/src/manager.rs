use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use opal_cache::CacheStore;
use opal_error::{PackageManagerError, Result};
use opal_lock::LockStore;
use opal_project::{Manifest, read_manifest_in};
use opal_registry::RegistryClient;
use opal_resolver::{PackageId, Resolution, ResolutionFailure, ResolutionSession};
use opal_utils::{get_cache_path, get_lock_path, get_modules_path};

use crate::install::Installer;

/// Everything one install run produced. `is_success` is the orchestrator's
/// contract: true only when every root and every transitively reached node
/// resolved and installed.
#[derive(Debug)]
pub struct InstallOutcome {
    pub resolution: Resolution,
    pub installed: Vec<PackageId>,
    pub resolution_failures: Vec<ResolutionFailure>,
    pub install_failures: Vec<(PackageId, PackageManagerError)>,
    pub cycles: Vec<Vec<PackageId>>,
    pub lock_was_current: bool,
}

impl InstallOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.resolution_failures.is_empty() && self.install_failures.is_empty()
    }
}

/// Sequences an install run: read manifest, consult the lock, resolve,
/// materialize, rewrite the lock.
pub struct InstallManager<'a> {
    registry: &'a dyn RegistryClient,
    project_dir: PathBuf,
}

impl<'a> InstallManager<'a> {
    pub fn new(registry: &'a dyn RegistryClient, project_dir: &Path) -> Self {
        Self {
            registry,
            project_dir: project_dir.to_path_buf(),
        }
    }

    /// Install the manifest's dependencies, or just `specific` names from
    /// it. Manifest errors are fatal; everything downstream is contained
    /// per package and reported through the outcome.
    pub fn install(&self, specific: Option<&[String]>) -> Result<InstallOutcome> {
        let manifest = read_manifest_in(&self.project_dir)?;
        let tree_root = get_modules_path(&self.project_dir);
        let lock_store = LockStore::new(&get_lock_path(&self.project_dir));

        let lock_doc = match lock_store.read() {
            Ok(doc) => doc,
            Err(e) => {
                opal_logger::warn(&format!("Ignoring unreadable lock file: {e}"));
                None
            }
        };

        let lock_was_current =
            specific.is_none() && lock_doc.is_some() && lock_store.is_current(&manifest);

        let roots = if lock_was_current {
            opal_logger::info("Lock file is up to date. Using locked versions.");
            lock_doc
                .as_ref()
                .map(opal_lock::LockDocument::locked_versions)
                .unwrap_or_default()
        } else {
            self.manifest_roots(&manifest, specific)
        };

        let locked_versions = lock_doc
            .as_ref()
            .map(opal_lock::LockDocument::locked_versions)
            .unwrap_or_default();

        let mut session = ResolutionSession::with_locked_versions(self.registry, locked_versions);
        session.resolve_roots(&roots);
        let (resolution, resolution_failures, cycles) = session.into_outcome();

        let cache = CacheStore::new(&get_cache_path(&tree_root))?;
        let mut installer = Installer::new(self.registry, &cache, &tree_root);
        let install_failures = installer.install_resolution(&resolution)?;
        let installed = installer.installed_order().to_vec();

        // A run that was fully lock-driven changed nothing worth
        // re-recording; every other run rewrites the lock from what
        // actually resolved.
        if !lock_was_current {
            lock_store.write(&resolution)?;
        }

        let outcome = InstallOutcome {
            resolution,
            installed,
            resolution_failures,
            install_failures,
            cycles,
            lock_was_current,
        };

        if outcome.is_success() {
            opal_logger::finish(&format!("Installed {} packages", outcome.installed.len()));
        } else {
            opal_logger::warn(&format!(
                "Installed {} packages with {} failures",
                outcome.installed.len(),
                outcome.resolution_failures.len() + outcome.install_failures.len()
            ));
        }

        Ok(outcome)
    }

    /// The resolution frontier from the manifest: runtime deps before dev
    /// deps, optionally narrowed to specific names. Unknown names are
    /// warned about and skipped, as the manifest is authoritative.
    fn manifest_roots(
        &self,
        manifest: &Manifest,
        specific: Option<&[String]>,
    ) -> IndexMap<String, String> {
        let merged = manifest.all_dependencies();

        let Some(names) = specific else {
            return merged;
        };

        let mut roots = IndexMap::new();
        let mut missing = Vec::new();
        for name in names {
            if let Some(range) = merged.get(name) {
                roots.insert(name.clone(), range.clone());
            } else {
                missing.push(name.as_str());
            }
        }

        if !missing.is_empty() {
            opal_logger::warn(&format!(
                "The following packages are not in package.json: {}",
                missing.join(", ")
            ));
        }

        roots
    }
}
