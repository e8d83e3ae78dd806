use std::path::Path;

use anyhow::Context;
use console::style;
use serde::Serialize;

use super::{open_session, CommandResult};
use crate::catalog::{Catalog, CatalogEditor, Record, SaveOutcome};
use crate::config::Config;
use crate::error::CatalogError;
use crate::tui::view::ViewState;
use crate::tui::{catalog_display, form, notify};

/// Field values given on the command line
#[derive(Debug, Default)]
pub struct ProductFields {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl ProductFields {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// JSON document written by `export` and `list --json`
#[derive(Serialize)]
pub struct CatalogExport<'a> {
    pub branch: &'a str,
    #[serde(flatten)]
    pub catalog: &'a Catalog,
}

pub fn handle_list(config: &Config, json: bool) -> CommandResult {
    let session = open_session(config)?;
    let branch = session.current_branch()?;
    let catalog = session.load_catalog()?;

    if json {
        let export = CatalogExport {
            branch: &branch,
            catalog: &catalog,
        };
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let mut view = ViewState::new(session.main_branch());
    view.refresh(branch, session.list_branches()?, catalog);
    view.end_loading();
    catalog_display::display_view(&view);
    Ok(())
}

pub fn handle_add(config: &Config, fields: ProductFields) -> CommandResult {
    let session = open_session(config)?;
    let catalog = session.load_catalog()?;

    let record = match (&fields.id, &fields.name) {
        (Some(id), Some(name)) => form::apply_form(
            None,
            id,
            name,
            fields.description.as_deref().unwrap_or(""),
            fields.status.as_deref().unwrap_or(""),
        ),
        _ => {
            let mut view = ViewState::new(session.main_branch());
            view.catalog = catalog.clone();
            view.open_create();
            match form::prompt_record(&view.modal, &catalog, &config.catalog.extension)? {
                Some(record) => record,
                None => {
                    notify::warn("Cancelled");
                    return Ok(());
                }
            }
        }
    };

    let file = record.file_name(&config.catalog.extension);
    if catalog.contains_file(&file) {
        return Err(anyhow::anyhow!(
            "{file} already exists, use `gitcat edit {file}` to change it"
        )
        .into());
    }

    let outcome = CatalogEditor::new(&session).save(&record, None)?;
    report_save(&outcome);
    Ok(())
}

pub fn handle_edit(config: &Config, file: &str, fields: ProductFields) -> CommandResult {
    let session = open_session(config)?;
    let catalog = session.load_catalog()?;
    let entry = catalog
        .find(file)
        .ok_or_else(|| CatalogError::UnknownFile(file.to_string()))?;

    let record = if fields.is_empty() {
        let mut view = ViewState::new(session.main_branch());
        view.catalog = catalog.clone();
        view.open_edit(file);
        match form::prompt_record(&view.modal, &catalog, &config.catalog.extension)? {
            Some(record) => record,
            None => {
                notify::warn("Cancelled");
                return Ok(());
            }
        }
    } else {
        let existing = &entry.record;
        form::apply_form(
            Some(existing),
            &existing.id,
            fields.name.as_deref().unwrap_or(&existing.name),
            fields
                .description
                .as_deref()
                .or(existing.description.as_deref())
                .unwrap_or(""),
            fields
                .status
                .as_deref()
                .unwrap_or(&existing.lifecycle_status),
        )
    };

    let outcome = CatalogEditor::new(&session).save(&record, Some(file))?;
    report_save(&outcome);
    Ok(())
}

pub fn handle_delete(config: &Config, file: &str, yes: bool) -> CommandResult {
    let session = open_session(config)?;

    if !yes && form::confirm(&format!("Delete {file}?"))? != Some(true) {
        notify::warn("Cancelled");
        return Ok(());
    }

    let catalog = CatalogEditor::new(&session).delete(file)?;
    notify::success(format!(
        "Deleted {} ({} products left)",
        style(file).cyan(),
        catalog.len()
    ));
    Ok(())
}

/// Write the catalog of the current workspace as JSON
pub fn write_export(path: &Path, branch: &str, catalog: &Catalog) -> anyhow::Result<()> {
    let export = CatalogExport { branch, catalog };
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize catalog")?;
    std::fs::write(path, json + "\n").context(format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn handle_export(config: &Config, path: &Path) -> CommandResult {
    let session = open_session(config)?;
    let branch = session.current_branch()?;
    let catalog = session.load_catalog()?;

    write_export(path, &branch, &catalog)?;
    notify::success(format!(
        "Wrote {} products to {}",
        catalog.len(),
        style(path.display()).cyan()
    ));
    Ok(())
}

pub(crate) fn report_save(outcome: &SaveOutcome) {
    match &outcome.commit {
        Some(commit) => notify::success(format!(
            "Saved & committed {} ({})",
            style(&outcome.file).cyan(),
            &commit[..commit.len().min(7)]
        )),
        None => notify::info(format!("{} unchanged, nothing to commit", outcome.file)),
    }
}

/// Card title for confirmations
pub(crate) fn describe(record: &Record) -> String {
    format!("{} ({})", record.name, record.id)
}

#[cfg(test)]
mod tests {
    use super::{handle_add, write_export, ProductFields};
    use crate::catalog::{Catalog, CatalogEntry, Record};
    use crate::config::Config;
    use crate::session::Session;
    use crate::test_utils::create_catalog_remote;

    #[test]
    fn add_refuses_a_file_that_failed_to_parse() {
        let (_remote, url) = create_catalog_remote(&[("p1.yaml", "id: [broken\n")]);
        let storage = assert_fs::TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.root = storage.path().to_path_buf();
        config.remote.depth = None;
        let mut session = Session::new(config.clone());
        session.initialize(&url).unwrap();

        let fields = ProductFields {
            id: Some("p1".to_string()),
            name: Some("Fiber".to_string()),
            ..ProductFields::default()
        };
        let error = handle_add(&config, fields).unwrap_err();

        assert!(error.to_string().contains("p1.yaml already exists"));
        let untouched = std::fs::read_to_string(session.products_dir().join("p1.yaml")).unwrap();
        assert_eq!(untouched, "id: [broken\n");
    }

    #[test]
    fn export_writes_branch_and_products() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path().join("built-catalog.json");
        let catalog = Catalog {
            entries: vec![CatalogEntry {
                file: "p1.yaml".to_string(),
                record: Record::new("p1", "One"),
            }],
            skipped: Vec::new(),
        };

        write_export(&path, "main", &catalog).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["branch"], "main");
        assert_eq!(written["products"][0]["id"], "p1");
        assert_eq!(written["products"][0]["file"], "p1.yaml");
        assert!(written.get("skipped").is_none());
    }
}
