pub const USER_AGENT: &str = "opal/0.1.0";
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

pub const MANIFEST_FILE: &str = "package.json";
pub const LOCK_FILE: &str = "package-lock.json";
pub const MODULES_DIR: &str = "node_modules";
pub const CACHE_DIR: &str = ".package_cache";

/// Files every published package is expected to ship at its root.
pub const REQUIRED_PACKAGE_FILES: &[&str] = &["package.json", "README.md", "LICENSE"];

/// Trees larger than this are not visualized unless forced.
pub const VISUALIZE_NODE_LIMIT: usize = 30;
