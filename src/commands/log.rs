use super::{open_session, CommandResult};
use crate::config::Config;
use crate::tui::catalog_display;

pub fn handle_log(config: &Config, limit: usize) -> CommandResult {
    let session = open_session(config)?;
    let branch = session.current_branch()?;
    let commits = session.history(limit)?;
    catalog_display::display_history(&branch, &commits);
    Ok(())
}
