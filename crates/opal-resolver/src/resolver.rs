use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};

use opal_error::{PackageManagerError, Result};
use opal_registry::RegistryClient;

use crate::range::VersionRange;

/// A concrete (name, version) pair. Identity for the resolution map, the
/// installed set, and the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    pub name: String,
    pub version: String,
}

impl PackageId {
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// The output of a resolution run: every package with its parent back-edges
/// in first-seen order, plus the version hoisted to the top of the tree for
/// each name.
#[derive(Debug, Default)]
pub struct Resolution {
    packages: IndexMap<PackageId, IndexSet<PackageId>>,
    top_level: IndexMap<String, String>,
    order: Vec<PackageId>,
}

impl Resolution {
    #[must_use]
    pub fn packages(&self) -> &IndexMap<PackageId, IndexSet<PackageId>> {
        &self.packages
    }

    #[must_use]
    pub fn parents(&self, id: &PackageId) -> Option<&IndexSet<PackageId>> {
        self.packages.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &PackageId) -> bool {
        self.packages.contains_key(id)
    }

    /// name -> hoisted version
    #[must_use]
    pub fn top_level(&self) -> &IndexMap<String, String> {
        &self.top_level
    }

    /// PackageIds in first-seen order; installation follows this order.
    #[must_use]
    pub fn order(&self) -> &[PackageId] {
        &self.order
    }

    /// Packages nothing depends on (the manifest roots).
    pub fn roots(&self) -> impl Iterator<Item = &PackageId> {
        self.packages
            .iter()
            .filter(|(_, parents)| parents.is_empty())
            .map(|(id, _)| id)
    }

    /// Direct dependents-of relation, derived from the parent edges.
    #[must_use]
    pub fn children(&self, parent: &PackageId) -> Vec<&PackageId> {
        self.packages
            .iter()
            .filter(|(_, parents)| parents.contains(parent))
            .map(|(id, _)| id)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// A resolution attempt that was abandoned without aborting its siblings.
#[derive(Debug)]
pub struct ResolutionFailure {
    pub name: String,
    pub range: String,
    pub error: PackageManagerError,
}

/// One depth-first walk over the dependency graph. Created per install run
/// and discarded afterwards; all mutable resolver state lives here.
pub struct ResolutionSession<'a> {
    registry: &'a dyn RegistryClient,
    locked: IndexMap<String, String>,
    resolution: Resolution,
    path: Vec<PackageId>,
    path_set: HashSet<PackageId>,
    cycles: Vec<Vec<PackageId>>,
    failures: Vec<ResolutionFailure>,
}

impl<'a> ResolutionSession<'a> {
    #[must_use]
    pub fn new(registry: &'a dyn RegistryClient) -> Self {
        Self::with_locked_versions(registry, IndexMap::new())
    }

    /// `locked` pins root names to previously locked versions; transitive
    /// edges always resolve against the registry.
    #[must_use]
    pub fn with_locked_versions(
        registry: &'a dyn RegistryClient,
        locked: IndexMap<String, String>,
    ) -> Self {
        Self {
            registry,
            locked,
            resolution: Resolution::default(),
            path: Vec::new(),
            path_set: HashSet::new(),
            cycles: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Resolve every (name, range) root in iteration order. Roots with a
    /// locked version bypass range matching and reuse it verbatim.
    pub fn resolve_roots(&mut self, roots: &IndexMap<String, String>) {
        for (name, range) in roots {
            if let Some(locked_version) = self.locked.get(name).cloned() {
                self.resolve_package(name, &locked_version, None, true, true);
            } else {
                self.resolve_package(name, range, None, true, false);
            }
        }
    }

    /// Consume the session, yielding what the installer needs.
    #[must_use]
    pub fn into_outcome(self) -> (Resolution, Vec<ResolutionFailure>, Vec<Vec<PackageId>>) {
        (self.resolution, self.failures, self.cycles)
    }

    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    #[must_use]
    pub fn failures(&self) -> &[ResolutionFailure] {
        &self.failures
    }

    #[must_use]
    pub fn cycles(&self) -> &[Vec<PackageId>] {
        &self.cycles
    }

    /// Failures are contained here: a bad subtree never takes its siblings
    /// down with it.
    fn resolve_package(
        &mut self,
        name: &str,
        range: &str,
        parent: Option<PackageId>,
        is_top_level: bool,
        use_locked: bool,
    ) {
        if let Err(error) = self.try_resolve(name, range, parent, is_top_level, use_locked) {
            opal_logger::error(&format!("Error resolving {name}@{range}: {error}"));
            self.failures.push(ResolutionFailure {
                name: name.to_string(),
                range: range.to_string(),
                error,
            });
        }
    }

    fn try_resolve(
        &mut self,
        name: &str,
        range: &str,
        parent: Option<PackageId>,
        is_top_level: bool,
        use_locked: bool,
    ) -> Result<()> {
        let version = if use_locked {
            range.to_string()
        } else {
            opal_logger::step(opal_logger::Phase::Resolving, &format!("{name}@{range}"), 0, 0);
            self.select_version(name, range)?
        };
        let id = PackageId::new(name, &version);

        if self.path_set.contains(&id) {
            self.report_cycle(&id);
            return Ok(());
        }

        self.path.push(id.clone());
        self.path_set.insert(id.clone());

        let first_visit = !self.resolution.packages.contains_key(&id);
        if first_visit {
            self.resolution.packages.insert(id.clone(), IndexSet::new());
            self.resolution.order.push(id.clone());
            if is_top_level || !self.resolution.top_level.contains_key(name) {
                self.resolution
                    .top_level
                    .insert(name.to_string(), version.clone());
            }
        }

        if let Some(parent) = parent {
            if let Some(parents) = self.resolution.packages.get_mut(&id) {
                parents.insert(parent);
            }
        }

        // A node already in the map has had its subtree expanded; only the
        // parent edge above was new.
        if first_visit {
            let metadata = match self.registry.fetch_metadata(name, &version) {
                Ok(metadata) => metadata,
                Err(error) => {
                    self.pop_path(&id);
                    // A locked version the registry no longer serves is a
                    // lock conflict, not a plain missing version.
                    if use_locked
                        && matches!(error, PackageManagerError::VersionNotFound(..))
                    {
                        return Err(PackageManagerError::LockConflict(
                            name.to_string(),
                            version,
                        ));
                    }
                    return Err(error);
                }
            };

            for (dep_name, dep_range) in &metadata.dependencies {
                self.resolve_package(dep_name, dep_range, Some(id.clone()), false, false);
            }
        }

        self.pop_path(&id);
        Ok(())
    }

    fn select_version(&self, name: &str, range: &str) -> Result<String> {
        let parsed = VersionRange::parse(range)?;
        let versions = self.registry.list_versions(name)?;
        parsed.max_satisfying(&versions).ok_or_else(|| {
            PackageManagerError::VersionNotFound(name.to_string(), range.to_string())
        })
    }

    fn report_cycle(&mut self, id: &PackageId) {
        let start = self.path.iter().position(|p| p == id).unwrap_or(0);
        let mut cycle: Vec<PackageId> = self.path.get(start..).unwrap_or_default().to_vec();
        cycle.push(id.clone());

        let rendered = cycle
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        opal_logger::warn(&format!("Circular dependency detected: {rendered}"));

        self.cycles.push(cycle);
    }

    fn pop_path(&mut self, id: &PackageId) {
        self.path_set.remove(id);
        if self.path.last() == Some(id) {
            self.path.pop();
        }
    }
}
