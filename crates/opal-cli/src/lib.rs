pub mod commands;
pub mod handlers;
pub mod tree;

use anyhow::Result;
use clap::Parser;

use commands::{Cli, Commands};
use handlers::{
    AddHandler, CleanHandler, InitHandler, InstallHandler, ListHandler, RemoveHandler,
    UpdateHandler,
};

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    opal_logger::init(false);

    match &cli.command {
        Commands::Install {
            packages,
            no_visualize,
            force_visualize,
        } => InstallHandler::handle_install(packages, !no_visualize, *force_visualize),
        Commands::Add {
            packages,
            dev,
            save_exact,
        } => AddHandler::handle_add(packages, *dev, *save_exact),
        Commands::Remove { packages } => RemoveHandler::handle_remove(packages),
        Commands::Update { packages } => UpdateHandler::handle_update(packages),
        Commands::List => ListHandler::handle_list(),
        Commands::Init { name } => InitHandler::handle_init(name.as_deref()),
        Commands::Clean { modules } => CleanHandler::handle_clean(*modules),
    }
}
