use std::env;
use std::path::Path;

use anyhow::Result;

use opal_core::InitManager;

pub struct InitHandler;

impl InitHandler {
    pub fn handle_init(name: Option<&str>) -> Result<()> {
        let fallback = env::current_dir()
            .ok()
            .and_then(|dir| {
                dir.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "new-project".to_string());

        let name = name.unwrap_or(&fallback);
        InitManager::init(Path::new("."), name, None)?;
        Ok(())
    }
}
