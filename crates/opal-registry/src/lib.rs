pub mod extract;
pub mod http;
pub mod integrity;

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use opal_error::Result;

pub use http::HttpRegistry;

/// Per-version registry metadata: the subset of the version document the
/// manager needs to resolve and install a package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    pub version: String,
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,
    #[serde(default)]
    pub tarball_url: String,
    pub integrity: Option<String>,
}

/// The registry surface the resolver and installer are written against.
/// `HttpRegistry` talks to a real npm-compatible registry; tests drive the
/// same seam with an in-memory implementation.
pub trait RegistryClient {
    /// All published versions of `name`, in registry document order.
    fn list_versions(&self, name: &str) -> Result<Vec<String>>;

    /// Metadata for one version. `version` may be the literal `latest`.
    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata>;

    /// Download and extract the package contents into `target_dir`.
    fn download_tarball(&self, name: &str, version: &str, target_dir: &Path) -> Result<()>;
}
