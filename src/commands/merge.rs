use console::style;

use super::{open_session, CommandResult};
use crate::config::Config;
use crate::session::MergeReport;
use crate::tui::{form, notify, spinner};

pub fn handle_merge(config: &Config, yes: bool) -> CommandResult {
    let session = open_session(config)?;
    let branch = session.current_branch()?;
    let main = session.main_branch().to_string();

    if branch == main {
        notify::info(format!("Already on {}, nothing to deploy", style(&main).cyan()));
        return Ok(());
    }

    if !yes {
        let question = format!("Merge {branch} → {main} = DEPLOY?");
        if form::confirm(&question)? != Some(true) {
            notify::warn("Merge cancelled");
            return Ok(());
        }
    }

    let report = spinner::spin(spinner::GIT_SYNC, || session.merge_to_main())?;
    match report {
        MergeReport::AlreadyOnMain => notify::info("Nothing to deploy"),
        report => notify::success(report),
    }
    Ok(())
}
