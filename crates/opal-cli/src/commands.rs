use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "opal")]
#[command(version = "0.1.0")]
#[command(propagate_version = true)]
#[command(about = "A small, reproducible package manager for npm-style registries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Installs dependencies from package.json
    #[command(alias = "i")]
    Install {
        /// Specific declared packages to install (default: all)
        #[arg()]
        packages: Vec<String>,
        /// Disable dependency tree visualization
        #[arg(long = "no-visualize")]
        no_visualize: bool,
        /// Force visualization even for large dependency trees
        #[arg(long = "force-visualize")]
        force_visualize: bool,
    },
    /// Adds packages to package.json and installs them
    Add {
        /// Package name(s) with optional version (e.g. chalk@2.0.0)
        #[arg(required = true)]
        packages: Vec<String>,
        /// Add to devDependencies
        #[arg(short = 'D', long = "dev", alias = "save-dev")]
        dev: bool,
        /// Save exact version (no caret prefix)
        #[arg(short = 'E', long = "save-exact")]
        save_exact: bool,
    },
    /// Removes packages
    #[command(aliases = ["rm", "uninstall"])]
    Remove {
        /// List of packages to remove
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Updates manifest entries to their latest versions
    #[command(aliases = ["up", "upgrade"])]
    Update {
        /// List of packages to update (if empty, updates all)
        #[arg()]
        packages: Vec<String>,
    },
    /// Lists declared dependencies
    #[command(alias = "ls")]
    List,
    /// Initializes a new package.json file
    #[command(alias = "new")]
    Init {
        /// Project name (default: current directory name)
        #[arg()]
        name: Option<String>,
    },
    /// Cleans the package cache and/or the installed tree
    Clean {
        /// Also remove node_modules
        #[arg(long)]
        modules: bool,
    },
}
