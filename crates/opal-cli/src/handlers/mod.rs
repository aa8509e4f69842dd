pub mod add;
pub mod clean;
pub mod init;
pub mod install;
pub mod list;
pub mod remove;
pub mod update;

pub use add::AddHandler;
pub use clean::CleanHandler;
pub use init::InitHandler;
pub use install::InstallHandler;
pub use list::ListHandler;
pub use remove::RemoveHandler;
pub use update::UpdateHandler;
