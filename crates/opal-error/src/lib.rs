use std::fmt;

/// Every failure the manager can surface. Whether a variant is fatal is the
/// caller's call: the orchestrator aborts on manifest errors and contains
/// everything else at the package boundary.
#[derive(Debug)]
pub enum PackageManagerError {
    ManifestMissing(String),
    ManifestInvalid(String),
    InvalidRange(String, String),
    PackageNotFound(String),
    VersionNotFound(String, String),
    RegistryUnavailable(String),
    DownloadFailed(String, String),
    ExtractionFailed(String, String),
    IntegrityMismatch(String, String),
    StructureViolation(String, String),
    DependencyMissing(String, String),
    LockConflict(String, String),
    LockfileError(String),
    InvalidPackageSpec(String),
    IoError(String),
}

impl fmt::Display for PackageManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ManifestMissing(path) => {
                write!(f, "package.json not found at {path}")
            }
            Self::ManifestInvalid(msg) => {
                write!(f, "package.json is not valid JSON: {msg}")
            }
            Self::InvalidRange(range, detail) => {
                write!(f, "Invalid version range '{range}': {detail}")
            }
            Self::PackageNotFound(name) => {
                write!(f, "Package '{name}' not found in registry")
            }
            Self::VersionNotFound(name, range) => {
                write!(f, "No version of '{name}' satisfies '{range}'")
            }
            Self::RegistryUnavailable(msg) => {
                write!(f, "Registry unavailable: {msg}")
            }
            Self::DownloadFailed(name, version) => {
                write!(f, "Failed to download {name}@{version}")
            }
            Self::ExtractionFailed(name, msg) => {
                write!(f, "Failed to extract tarball for '{name}': {msg}")
            }
            Self::IntegrityMismatch(name, detail) => {
                write!(f, "Integrity check failed for '{name}': {detail}")
            }
            Self::StructureViolation(name, detail) => {
                write!(f, "Package '{name}' failed structural checks: {detail}")
            }
            Self::DependencyMissing(name, dep) => {
                write!(f, "Package '{name}' is missing its dependency '{dep}'")
            }
            Self::LockConflict(name, version) => {
                write!(f, "Locked version {name}@{version} no longer exists at the registry")
            }
            Self::LockfileError(msg) => {
                write!(f, "Lockfile error: {msg}")
            }
            Self::InvalidPackageSpec(spec) => {
                write!(f, "Invalid package specification: {spec}")
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {msg}")
            }
        }
    }
}

impl std::error::Error for PackageManagerError {}

impl From<anyhow::Error> for PackageManagerError {
    fn from(err: anyhow::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<std::io::Error> for PackageManagerError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PackageManagerError>;
