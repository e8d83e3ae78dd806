use console::style;

use super::{connect, CommandResult};
use crate::config::Config;
use crate::tui::{notify, spinner};

pub async fn handle_clone(config: &Config, url: Option<String>) -> CommandResult {
    let url = url.unwrap_or_else(|| config.remote.url.clone());

    let session = spinner::spin_async(spinner::GIT_SYNC, connect(config.clone(), url.clone()))
        .await
        .map_err(|e| anyhow::anyhow!("Clone failed, check the URL: {e:#}"))?;

    let catalog = session.load_catalog()?;
    notify::success(format!(
        "Catalog from {} ready at {} ({} products)",
        style(&url).cyan(),
        style(session.checkout_path().display()).cyan(),
        catalog.len()
    ));
    for skipped in &catalog.skipped {
        notify::warn(format!("{} could not be read: {}", skipped.file, skipped.reason));
    }
    Ok(())
}
