use std::fs;
use std::path::Path;

use opal_error::Result;
use opal_project::{read_manifest_in, write_manifest_in};
use opal_utils::{get_modules_path, get_scoped_package_path};

pub struct RemoveManager;

impl RemoveManager {
    /// Drop `name` from the manifest and delete its hoisted directory.
    /// Nested copies under other parents are left for the next full
    /// install to reconcile.
    pub fn remove(project_dir: &Path, name: &str) -> Result<()> {
        let mut manifest = read_manifest_in(project_dir)?;

        if manifest.remove_dependency(name) {
            write_manifest_in(project_dir, &manifest)?;
            opal_logger::success(&format!("Removed {name} from package.json"));
        } else {
            opal_logger::warn(&format!("{name} not found in package.json"));
        }

        let installed = get_scoped_package_path(&get_modules_path(project_dir), name);
        if installed.is_symlink() {
            fs::remove_file(&installed)?;
            opal_logger::success(&format!("Removed {name} from node_modules"));
        } else if installed.exists() {
            fs::remove_dir_all(&installed)?;
            opal_logger::success(&format!("Removed {name} from node_modules"));
        } else {
            opal_logger::warn(&format!("{name} not found in node_modules"));
        }

        Ok(())
    }
}
