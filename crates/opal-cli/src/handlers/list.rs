use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use opal_core::ListManager;

pub struct ListHandler;

impl ListHandler {
    pub fn handle_list() -> Result<()> {
        let listings = ListManager::list(Path::new("."))?;

        if listings.is_empty() {
            println!("No packages installed.");
            return Ok(());
        }

        println!("Declared dependencies:");
        for listing in listings {
            let marker = if listing.dev { " (dev)" } else { "" };
            println!(
                "  {}@{}{}",
                listing.name.bright_white(),
                listing.range.bright_cyan(),
                marker.bright_black()
            );
        }

        Ok(())
    }
}
