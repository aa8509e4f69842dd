use std::path::{Path, PathBuf};

use opal_constants::{CACHE_DIR, LOCK_FILE, MANIFEST_FILE, MODULES_DIR};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the node_modules directory for a project
#[must_use]
pub fn get_modules_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MODULES_DIR)
}

/// Get the package.json path for a project
#[must_use]
pub fn get_manifest_path(project_dir: &Path) -> PathBuf {
    project_dir.join(MANIFEST_FILE)
}

/// Get the lock file path for a project
#[must_use]
pub fn get_lock_path(project_dir: &Path) -> PathBuf {
    project_dir.join(LOCK_FILE)
}

/// The cache lives beside the installed tree, not inside it.
#[must_use]
pub fn get_cache_path(tree_root: &Path) -> PathBuf {
    tree_root
        .parent()
        .map_or_else(|| PathBuf::from(CACHE_DIR), |p| p.join(CACHE_DIR))
}

/// Handle scoped package names in file paths: `@scope/name` becomes the
/// nested directories `@scope/name`.
#[must_use]
pub fn get_scoped_package_path(base_path: &Path, package_name: &str) -> PathBuf {
    let mut path = base_path.to_path_buf();
    for segment in package_name.split('/') {
        path = path.join(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_names_nest() {
        let base = Path::new("node_modules");
        assert_eq!(
            get_scoped_package_path(base, "@types/node"),
            Path::new("node_modules/@types/node")
        );
    }

    #[test]
    fn plain_names_do_not_nest() {
        let base = Path::new("node_modules");
        assert_eq!(
            get_scoped_package_path(base, "lodash"),
            Path::new("node_modules/lodash")
        );
    }

    #[test]
    fn cache_sits_beside_the_tree() {
        assert_eq!(
            get_cache_path(Path::new("proj/node_modules")),
            Path::new("proj/.package_cache")
        );
    }
}
