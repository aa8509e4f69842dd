pub mod add;
pub mod clean;
pub mod init;
pub mod install;
pub mod list;
pub mod manager;
pub mod remove;
pub mod update;
pub mod validate;

pub use add::AddManager;
pub use clean::CleanManager;
pub use init::InitManager;
pub use install::Installer;
pub use list::ListManager;
pub use manager::{InstallManager, InstallOutcome};
pub use remove::RemoveManager;
pub use update::UpdateManager;
pub use validate::Validator;
