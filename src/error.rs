use std::path::PathBuf;

use thiserror::Error;

/// Reasons a record is refused before it is written
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id is required")]
    MissingId,

    #[error("name is required")]
    MissingName,

    #[error("id '{0}' cannot be used as a file name")]
    InvalidId(String),
}

/// Catalog failures callers react to individually
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid product: {0}")]
    Validation(#[from] ValidationError),

    #[error(
        "Merging '{branch}' into '{target}' conflicts in {}. Resolve it on the remote and clone again",
        .paths.join(", ")
    )]
    MergeConflict {
        branch: String,
        target: String,
        paths: Vec<String>,
    },

    #[error("'{0}' is not a valid workspace name")]
    InvalidBranchName(String),

    #[error("No product file named '{0}'")]
    UnknownFile(String),

    #[error("'{0}' already exists, edit it instead")]
    FileExists(String),

    #[error("No catalog checkout at {0}. Run `gitcat clone` first")]
    NotInitialized(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::CatalogError;

    #[test]
    fn merge_conflict_lists_paths() {
        let error = CatalogError::MergeConflict {
            branch: "draft".to_string(),
            target: "main".to_string(),
            paths: vec!["products/a.yaml".to_string(), "products/b.yaml".to_string()],
        };

        assert_eq!(
            error.to_string(),
            "Merging 'draft' into 'main' conflicts in products/a.yaml, products/b.yaml. Resolve it on the remote and clone again"
        );
    }
}
