use std::path::Path;

use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use opal_core::InstallManager;
use opal_registry::HttpRegistry;

use crate::tree;

pub struct InstallHandler;

impl InstallHandler {
    pub fn handle_install(packages: &[String], visualize: bool, force_visualize: bool) -> Result<()> {
        println!(
            "{} {}",
            "opal".bright_cyan().bold(),
            "install".bright_white()
        );
        println!();

        let registry = HttpRegistry::new();
        let project_dir = Path::new(".");
        let manager = InstallManager::new(&registry, project_dir);

        let specific = (!packages.is_empty()).then_some(packages);
        let outcome = manager.install(specific)?;

        if visualize || force_visualize {
            let node_count = outcome.resolution.len();
            if tree::should_visualize(node_count, force_visualize) {
                println!("\nVisualization of installed packages:");
                tree::visualize_installation_tree(&project_dir.join("node_modules"));

                println!("\nVisualization of dependency tree:");
                tree::visualize_dependency_tree(&outcome.resolution);
            }
        }

        if !outcome.is_success() {
            bail!(
                "{} package(s) failed to resolve or install",
                outcome.resolution_failures.len() + outcome.install_failures.len()
            );
        }

        Ok(())
    }
}
