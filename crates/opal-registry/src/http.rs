use std::path::Path;
use std::time::Duration;

use lazy_static::lazy_static;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use opal_constants::{DEFAULT_REGISTRY_URL, USER_AGENT};
use opal_error::{PackageManagerError, Result};

use crate::extract::extract_tarball;
use crate::integrity::verify_integrity;
use crate::{PackageMetadata, RegistryClient};

lazy_static! {
    static ref CLIENT: reqwest::blocking::Client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(45))
        .connect_timeout(Duration::from_secs(20))
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::blocking::Client::new());
}

/// Blocking client for an npm-compatible registry.
pub struct HttpRegistry {
    base_url: String,
}

#[derive(Deserialize)]
struct VersionDocument {
    version: String,
    #[serde(default)]
    dependencies: indexmap::IndexMap<String, String>,
    dist: Option<DistInfo>,
}

#[derive(Deserialize)]
struct DistInfo {
    tarball: String,
    integrity: Option<String>,
}

impl HttpRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_REGISTRY_URL)
    }

    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Scoped names keep their leading `@` but the scope separator must be
    /// percent-encoded in registry paths.
    fn encode_name(name: &str) -> String {
        urlencoding::encode(name).replace("%40", "@")
    }

    fn get(&self, url: &str) -> std::result::Result<reqwest::blocking::Response, reqwest::Error> {
        CLIENT.get(url).send()
    }
}

impl Default for HttpRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for HttpRegistry {
    fn list_versions(&self, name: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}", self.base_url, Self::encode_name(name));
        let resp = self
            .get(&url)
            .map_err(|e| PackageManagerError::RegistryUnavailable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(PackageManagerError::PackageNotFound(name.to_string()));
        }
        if !resp.status().is_success() {
            return Err(PackageManagerError::RegistryUnavailable(format!(
                "HTTP {} for {url}",
                resp.status()
            )));
        }

        let doc: Value = resp
            .json()
            .map_err(|e| PackageManagerError::RegistryUnavailable(e.to_string()))?;

        let versions = doc
            .get("versions")
            .and_then(Value::as_object)
            .ok_or_else(|| PackageManagerError::PackageNotFound(name.to_string()))?;

        Ok(versions.keys().cloned().collect())
    }

    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata> {
        let url = format!(
            "{}/{}/{version}",
            self.base_url,
            Self::encode_name(name)
        );
        let resp = self
            .get(&url)
            .map_err(|e| PackageManagerError::RegistryUnavailable(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            // The registry answers 404 both for unknown names and unknown
            // versions; an unknown name would already have failed
            // list_versions, so report the version.
            return Err(PackageManagerError::VersionNotFound(
                name.to_string(),
                version.to_string(),
            ));
        }
        if !resp.status().is_success() {
            return Err(PackageManagerError::RegistryUnavailable(format!(
                "HTTP {} for {url}",
                resp.status()
            )));
        }

        let doc: VersionDocument = resp
            .json()
            .map_err(|e| PackageManagerError::RegistryUnavailable(e.to_string()))?;

        let (tarball_url, integrity) = doc
            .dist
            .map_or((String::new(), None), |d| (d.tarball, d.integrity));

        Ok(PackageMetadata {
            version: doc.version,
            dependencies: doc.dependencies,
            tarball_url,
            integrity,
        })
    }

    fn download_tarball(&self, name: &str, version: &str, target_dir: &Path) -> Result<()> {
        let metadata = self.fetch_metadata(name, version)?;
        if metadata.tarball_url.is_empty() {
            return Err(PackageManagerError::DownloadFailed(
                name.to_string(),
                version.to_string(),
            ));
        }

        let resp = self.get(&metadata.tarball_url).map_err(|_| {
            PackageManagerError::DownloadFailed(name.to_string(), version.to_string())
        })?;
        if !resp.status().is_success() {
            return Err(PackageManagerError::DownloadFailed(
                name.to_string(),
                version.to_string(),
            ));
        }

        let bytes = resp.bytes().map_err(|_| {
            PackageManagerError::DownloadFailed(name.to_string(), version.to_string())
        })?;

        if let Some(expected) = &metadata.integrity {
            verify_integrity(name, &bytes, expected)?;
        }

        extract_tarball(name, &bytes, target_dir)
    }
}
