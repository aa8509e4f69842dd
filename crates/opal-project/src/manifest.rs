use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A project manifest (`package.json`). Recognized fields get typed access;
/// everything else is captured in `other` and written back verbatim.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scripts: Option<IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<IndexMap<String, String>>,
    #[serde(rename = "devDependencies", skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<IndexMap<String, String>>,
    #[serde(flatten)]
    pub other: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyType {
    Dependencies,
    DevDependencies,
}

impl Manifest {
    /// Runtime and dev dependencies merged in manifest order, runtime
    /// entries winning when a name appears in both.
    #[must_use]
    pub fn all_dependencies(&self) -> IndexMap<String, String> {
        let mut merged = IndexMap::new();
        if let Some(deps) = &self.dependencies {
            merged.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(dev_deps) = &self.dev_dependencies {
            for (name, range) in dev_deps {
                merged
                    .entry(name.clone())
                    .or_insert_with(|| range.clone());
            }
        }
        merged
    }

    #[must_use]
    pub fn runtime_dependencies(&self) -> IndexMap<String, String> {
        self.dependencies.clone().unwrap_or_default()
    }

    /// The declared range for `name`, searching runtime deps before dev.
    #[must_use]
    pub fn dependency_range(&self, name: &str) -> Option<&String> {
        self.dependencies
            .as_ref()
            .and_then(|deps| deps.get(name))
            .or_else(|| {
                self.dev_dependencies
                    .as_ref()
                    .and_then(|deps| deps.get(name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_with(deps: &[(&str, &str)], dev: &[(&str, &str)]) -> Manifest {
        let to_map = |pairs: &[(&str, &str)]| -> Option<IndexMap<String, String>> {
            (!pairs.is_empty()).then(|| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
        };
        Manifest {
            dependencies: to_map(deps),
            dev_dependencies: to_map(dev),
            ..Manifest::default()
        }
    }

    #[test]
    fn merge_keeps_manifest_order() {
        let manifest = manifest_with(&[("a", "^1.0.0"), ("b", "^2.0.0")], &[("c", "^3.0.0")]);
        let names: Vec<String> = manifest.all_dependencies().into_keys().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn runtime_wins_name_clashes() {
        let manifest = manifest_with(&[("a", "^1.0.0")], &[("a", "^9.0.0"), ("b", "*")]);
        let merged = manifest.all_dependencies();
        assert_eq!(merged.get("a"), Some(&"^1.0.0".to_string()));
        assert_eq!(merged.get("b"), Some(&"*".to_string()));
    }

    #[test]
    fn lookup_prefers_runtime() {
        let manifest = manifest_with(&[("a", "^1.0.0")], &[("a", "^9.0.0")]);
        assert_eq!(manifest.dependency_range("a"), Some(&"^1.0.0".to_string()));
        assert_eq!(manifest.dependency_range("missing"), None);
    }
}
