use anyhow::{Context, Error};

use super::loader::Catalog;
use super::record::Record;
use crate::error::CatalogError;
use crate::session::Session;

/// Result of a successful save
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub file: String,
    /// `None` when the file already held exactly this record
    pub commit: Option<String>,
    pub catalog: Catalog,
}

/// Writes records into the checkout and commits them through the session
pub struct CatalogEditor<'a> {
    session: &'a Session,
}

impl<'a> CatalogEditor<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn relative_path(&self, file: &str) -> String {
        format!("{}/{file}", self.session.products_relative())
    }

    /// Write `record` and commit it
    ///
    /// `existing_file` keeps the name of the file being edited; new records
    /// are written to `<id>.<extension>`, which must not exist yet. The
    /// catalog is reloaded afterwards.
    pub fn save(&self, record: &Record, existing_file: Option<&str>) -> Result<SaveOutcome, Error> {
        record.validate().map_err(CatalogError::from)?;

        let file = match existing_file {
            Some(file) => {
                if file.contains('/') || file.contains('\\') {
                    return Err(CatalogError::UnknownFile(file.to_string()).into());
                }
                file.to_string()
            }
            None => {
                let file = record.file_name(&self.session.config().catalog.extension);
                if self.session.products_dir().join(&file).exists() {
                    return Err(CatalogError::FileExists(file).into());
                }
                file
            }
        };

        let dir = self.session.products_dir();
        std::fs::create_dir_all(&dir)
            .context(format!("Failed to create products directory {}", dir.display()))?;

        let yaml = record
            .to_yaml()
            .context(format!("Failed to serialize product '{}'", record.id))?;
        std::fs::write(dir.join(&file), yaml).context(format!("Failed to write {file}"))?;

        let commit = self
            .session
            .commit(&self.relative_path(&file), &format!("Edit {}", record.id))?;
        let catalog = self.session.load_catalog()?;

        Ok(SaveOutcome {
            file,
            commit,
            catalog,
        })
    }

    /// Remove a record file and commit the deletion
    pub fn delete(&self, file: &str) -> Result<Catalog, Error> {
        let catalog = self.session.load_catalog()?;
        let entry = catalog
            .find(file)
            .ok_or_else(|| CatalogError::UnknownFile(file.to_string()))?;

        let path = self.session.products_dir().join(file);
        std::fs::remove_file(&path).context(format!("Failed to remove {}", path.display()))?;

        self.session.commit_removal(
            &self.relative_path(file),
            &format!("Delete {}", entry.record.id),
        )?;
        self.session.load_catalog()
    }
}
