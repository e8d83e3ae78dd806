//! Git operations module
//!
//! Thin wrappers over `git2`, grouped by concern:
//!
//! - `repository`: open/init a checkout, author signatures
//! - `branches`: list, create, checkout, current branch
//! - `commits`: stage, commit, history
//! - `remotes`: shallow single-branch clone
//! - `merge`: merge a branch into the current one, aborting on conflict

pub mod branches;
pub mod commits;
pub mod merge;
pub mod remotes;
pub mod repository;

pub use merge::operations::MergeOutcome;
pub use remotes::clone::CloneOptions;
pub use repository::core::{CommitInfo, GitRepo};
pub use repository::signature::Identity;
