use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use serde::{Serialize, Serializer};

use super::record::Record;

/// A record together with the file it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub file: String,
    pub record: Record,
}

/// Serialized flat, the record's fields next to `file`; a `file` key of the
/// record itself is left out
impl Serialize for CatalogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a> {
            file: &'a str,
            #[serde(flatten)]
            record: &'a Record,
        }

        if self.record.extra.contains_key("file") {
            let mut record = self.record.clone();
            record.extra.remove("file");
            return Flat {
                file: &self.file,
                record: &record,
            }
            .serialize(serializer);
        }

        Flat {
            file: &self.file,
            record: &self.record,
        }
        .serialize(serializer)
    }
}

/// A file that matched the extension filter but did not parse as a record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

/// Snapshot of the products directory of the checked-out branch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    #[serde(rename = "products")]
    pub entries: Vec<CatalogEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, file: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.file == file)
    }

    /// Whether `file` is in use, by a record or by a file that failed to parse
    pub fn contains_file(&self, file: &str) -> bool {
        self.find(file).is_some() || self.skipped.iter().any(|skipped| skipped.file == file)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

/// Reads record files from one directory
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    dir: PathBuf,
    extension: String,
}

impl CatalogLoader {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == self.extension)
    }

    /// Parse every matching file, sorted by file name
    ///
    /// A missing directory is an empty catalog. Files that fail to parse are
    /// reported in [`Catalog::skipped`] instead of failing the load.
    pub fn load(&self) -> Result<Catalog, Error> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(dir = %self.dir.display(), "products directory missing");
                return Ok(Catalog::default());
            }
            Err(e) => {
                return Err(Error::new(e).context(format!(
                    "Failed to list products directory {}",
                    self.dir.display()
                )))
            }
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.context("Failed to read products directory entry")?;
            let path = entry.path();
            if self.matches(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut catalog = Catalog::default();
        for path in paths {
            let file = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let bytes =
                std::fs::read(&path).context(format!("Failed to read {}", path.display()))?;

            match serde_yaml::from_slice::<Record>(&bytes) {
                Ok(record) => catalog.entries.push(CatalogEntry { file, record }),
                Err(e) => {
                    tracing::warn!(%file, error = %e, "skipping malformed catalog file");
                    catalog.skipped.push(SkippedFile {
                        file,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            records = catalog.len(),
            skipped = catalog.skipped.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }
}
