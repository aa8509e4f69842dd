use std::fs;
use std::path::Path;

use opal_constants::VISUALIZE_NODE_LIMIT;
use opal_resolver::{PackageId, Resolution};

/// Big trees make for useless wall-of-text diagrams.
#[must_use]
pub fn should_visualize(node_count: usize, force_visualize: bool) -> bool {
    if node_count > VISUALIZE_NODE_LIMIT && !force_visualize {
        println!(
            "\nWarning: Large dependency tree detected ({node_count} nodes). Visualization disabled."
        );
        println!("Use --force-visualize to override this behavior.");
        return false;
    }
    true
}

/// ASCII rendering of the directory layout under the installed tree.
pub fn visualize_installation_tree(modules_path: &Path) {
    println!("Installation Tree:");
    render_directories(modules_path, "");
}

fn render_directories(path: &Path, prefix: &str) {
    let Ok(entries) = fs::read_dir(path) else {
        return;
    };

    let mut dirs: Vec<String> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    dirs.sort();

    let count = dirs.len();
    for (index, dir) in dirs.iter().enumerate() {
        let is_last = index + 1 == count;
        println!("{prefix}{}{dir}", if is_last { "└── " } else { "├── " });
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        render_directories(&path.join(dir), &child_prefix);
    }
}

/// ASCII rendering of the resolved graph, roots downward. The resolution
/// is a DAG, so shared packages show up once per consumer.
pub fn visualize_dependency_tree(resolution: &Resolution) {
    println!("Dependency Tree:");
    let roots: Vec<&PackageId> = resolution.roots().collect();
    let count = roots.len();
    for (index, root) in roots.iter().enumerate() {
        render_package(resolution, root, 0, index + 1 == count);
    }
}

fn render_package(resolution: &Resolution, id: &PackageId, depth: usize, is_last: bool) {
    let prefix = if depth > 0 {
        format!(
            "{}{}",
            "  ".repeat(depth - 1),
            if is_last { "└── " } else { "├── " }
        )
    } else {
        String::new()
    };
    println!("{prefix}{id}");

    let children = resolution.children(id);
    let count = children.len();
    for (index, child) in children.iter().enumerate() {
        render_package(resolution, child, depth + 1, index + 1 == count);
    }
}
