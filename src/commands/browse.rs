use anyhow::Error;
use console::style;

use super::product::{describe, report_save};
use super::{connect, CommandResult};
use crate::catalog::{Catalog, CatalogEditor};
use crate::config::Config;
use crate::error::CatalogError;
use crate::session::{MergeReport, Session};
use crate::tui::view::{Action, ViewState};
use crate::tui::{catalog_display, form, notify, spinner};

/// Interactive loop: tabs, cards and a menu of actions
pub async fn handle_browse(config: &Config, url: Option<String>) -> CommandResult {
    let mut view = ViewState::new(config.remote.branch.clone());

    let url = match url {
        Some(url) => url,
        None => match form::prompt_remote_url(&config.remote.url)? {
            Some(url) => url,
            None => return Ok(()),
        },
    };

    let connected = spinner::run_async(
        &mut view,
        spinner::GIT_SYNC,
        connect(config.clone(), url),
    )
    .await;

    let session = match connected {
        Ok(session) => {
            refresh(&mut view, &session, None)?;
            Some(session)
        }
        Err(e) => {
            notify::error(format!("Clone failed, check the URL: {e:#}"));
            view.disconnect();
            None
        }
    };

    loop {
        catalog_display::display_view(&view);

        let Some(action) = form::select_action(view.actions())? else {
            break;
        };
        if action == Action::Quit {
            break;
        }
        let Some(session) = session.as_ref() else {
            break;
        };

        if let Err(e) = dispatch(action, session, &mut view) {
            notify::error(format!("{e:#}"));
        }
    }

    Ok(())
}

/// Rebuild the view from the session; `catalog` skips a reload when already fresh
fn refresh(view: &mut ViewState, session: &Session, catalog: Option<Catalog>) -> Result<(), Error> {
    let catalog = match catalog {
        Some(catalog) => catalog,
        None => session.load_catalog()?,
    };
    view.refresh(session.current_branch()?, session.list_branches()?, catalog);
    Ok(())
}

fn dispatch(action: Action, session: &Session, view: &mut ViewState) -> Result<(), Error> {
    match action {
        Action::SwitchWorkspace => {
            let Some(branch) = form::select_branch(&view.branches, &view.branch)? else {
                return Ok(());
            };
            if branch == view.branch {
                return Ok(());
            }
            let catalog = spinner::run(view, spinner::GIT_SYNC, || session.switch_branch(&branch))?;
            refresh(view, session, Some(catalog))?;
            notify::success(format!("Workspace: {}", style(&branch).cyan()));
        }
        Action::NewWorkspace => {
            let Some(name) = form::prompt_branch_name(&view.branches)? else {
                return Ok(());
            };
            let catalog = spinner::run(view, spinner::GIT_SYNC, || session.create_branch(&name))?;
            refresh(view, session, Some(catalog))?;
            notify::success(format!("Workspace: {}", style(&name).cyan()));
        }
        Action::AddProduct => {
            view.open_create();
            save_from_form(session, view, None)?;
        }
        Action::EditProduct => {
            let Some(file) = form::select_product(&view.catalog)? else {
                return Ok(());
            };
            if view.open_edit(&file) {
                save_from_form(session, view, Some(file))?;
            }
        }
        Action::DeleteProduct => {
            let Some(file) = form::select_product(&view.catalog)? else {
                return Ok(());
            };
            let title = view
                .catalog
                .find(&file)
                .map(|entry| describe(&entry.record))
                .unwrap_or_else(|| file.clone());
            if form::confirm(&format!("Delete {title}?"))? != Some(true) {
                return Ok(());
            }
            let catalog = CatalogEditor::new(session).delete(&file)?;
            refresh(view, session, Some(catalog))?;
            notify::success(format!("Deleted {}", style(&file).cyan()));
        }
        Action::MergeToMain => merge(session, view)?,
        Action::Quit => {}
    }
    Ok(())
}

fn save_from_form(
    session: &Session,
    view: &mut ViewState,
    file: Option<String>,
) -> Result<(), Error> {
    let extension = &session.config().catalog.extension;
    let record = form::prompt_record(&view.modal, &view.catalog, extension);
    view.close_modal();

    let Some(record) = record? else {
        return Ok(());
    };
    let outcome = CatalogEditor::new(session).save(&record, file.as_deref())?;
    report_save(&outcome);
    refresh(view, session, Some(outcome.catalog))
}

fn merge(session: &Session, view: &mut ViewState) -> Result<(), Error> {
    let question = format!("Merge {} → {} = DEPLOY?", view.branch, view.main_branch);
    if form::confirm(&question)? != Some(true) {
        return Ok(());
    }

    let result = spinner::run(view, spinner::GIT_SYNC, || session.merge_to_main());
    match &result {
        Ok(MergeReport::AlreadyOnMain) => {}
        Ok(report) => notify::success(format!("Deployed! {report}")),
        Err(e) => match e.downcast_ref::<CatalogError>() {
            Some(conflict @ CatalogError::MergeConflict { .. }) => {
                notify::error(format!("Conflict: {conflict}"))
            }
            _ => notify::error(format!("{e:#}")),
        },
    }

    // Main on success or conflict; reload from wherever the checkout ended up
    refresh(view, session, None)
}
