#[cfg(test)]
pub mod repo_extensions;

#[cfg(test)]
pub use repo_extensions::{
    create_catalog_remote, create_test_repo, RepoAssertions, RepoTestOperations,
};
