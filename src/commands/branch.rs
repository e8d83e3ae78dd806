use console::style;

use super::{open_session, CommandResult};
use crate::config::Config;
use crate::session::Session;
use crate::tui::{form, notify, spinner};

/// List workspaces, marking the current one
pub fn handle_branches(config: &Config) -> CommandResult {
    let session = open_session(config)?;
    let current = session.current_branch()?;

    for branch in session.list_branches()? {
        let marker = if branch == current {
            style("● ").green().bold()
        } else {
            style("  ").dim()
        };
        let label = if branch == session.main_branch() {
            format!("{} {}", style(&branch).cyan().bold(), style("(PROD)").dim())
        } else {
            format!("{}", style(&branch).cyan().bold())
        };
        println!("{marker}{label}");
    }
    Ok(())
}

pub fn handle_switch(config: &Config, name: Option<String>) -> CommandResult {
    let session = open_session(config)?;

    let name = match name {
        Some(name) => name,
        None => {
            let branches = session.list_branches()?;
            if branches.is_empty() {
                println!("No workspaces found");
                return Ok(());
            }
            let current = session.current_branch()?;
            match form::select_branch(&branches, &current)? {
                Some(name) => name,
                None => {
                    notify::warn("Selection cancelled");
                    return Ok(());
                }
            }
        }
    };

    switch(&session, &name)
}

fn switch(session: &Session, name: &str) -> CommandResult {
    match spinner::spin(spinner::GIT_SYNC, || session.switch_branch(name)) {
        Ok(catalog) => {
            notify::success(format!(
                "Workspace: {} ({} products)",
                style(name).cyan(),
                catalog.len()
            ));
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Error switching to workspace '{name}': {e:#}").into()),
    }
}

pub fn handle_new_branch(config: &Config, name: Option<String>) -> CommandResult {
    let session = open_session(config)?;

    let name = match name {
        Some(name) => name,
        None => match form::prompt_branch_name(&session.list_branches()?)? {
            Some(name) => name,
            None => {
                notify::warn("Cancelled");
                return Ok(());
            }
        },
    };

    session.create_branch(&name)?;
    notify::success(format!("Workspace: {}", style(name.trim()).cyan()));
    Ok(())
}
