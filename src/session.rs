//! The repository session: one checkout directory and the repository opened on it.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};

use crate::catalog::{Catalog, CatalogLoader};
use crate::config::Config;
use crate::error::CatalogError;
use crate::git::branches::operations::is_valid_branch_name;
use crate::git::{CommitInfo, GitRepo, MergeOutcome};

/// What `merge_to_main` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeReport {
    /// The active branch already is the deployment branch; nothing happened
    AlreadyOnMain,
    UpToDate { branch: String },
    FastForward { branch: String, commit: String },
    Merged { branch: String, commit: String },
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeReport::AlreadyOnMain => write!(f, "Already on the deployment branch"),
            MergeReport::UpToDate { branch } => write!(f, "'{branch}' is already deployed"),
            MergeReport::FastForward { branch, commit } | MergeReport::Merged { branch, commit } => {
                write!(f, "Deployed '{branch}' at {}", &commit[..commit.len().min(7)])
            }
        }
    }
}

pub struct Session {
    config: Config,
    checkout: PathBuf,
    repo: Option<GitRepo>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let checkout = config.checkout_path();
        Self {
            config,
            checkout,
            repo: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn checkout_path(&self) -> &Path {
        &self.checkout
    }

    /// Name of the deployment branch
    pub fn main_branch(&self) -> &str {
        &self.config.remote.branch
    }

    fn has_checkout(&self) -> bool {
        self.checkout.join(".git").exists()
    }

    /// Make sure the checkout directory exists and holds a clone of `remote_url`
    ///
    /// A checkout left by an earlier run is reopened instead of cloned again.
    pub fn initialize(&mut self, remote_url: &str) -> Result<(), Error> {
        let remote_url = remote_url.trim();
        if remote_url.is_empty() {
            return Err(anyhow::anyhow!("Remote URL is empty"));
        }

        std::fs::create_dir_all(&self.checkout).context(format!(
            "Failed to create checkout directory {}",
            self.checkout.display()
        ))?;

        let repo = if self.has_checkout() {
            let repo = GitRepo::open(&self.checkout)?;
            if let Some(origin) = repo.origin_url() {
                if origin != remote_url {
                    return Err(anyhow::anyhow!(
                        "{} already holds a clone of '{origin}'. Remove it or pick another storage name",
                        self.checkout.display()
                    ));
                }
            }
            tracing::info!(checkout = %self.checkout.display(), "reusing existing checkout");
            repo
        } else {
            tracing::info!(url = %remote_url, checkout = %self.checkout.display(), "cloning catalog");
            GitRepo::clone_remote(
                remote_url,
                &self.checkout,
                &self.config.remote.clone_options(),
            )?
        };

        self.repo = Some(repo.with_identity(self.config.author.clone()));
        Ok(())
    }

    /// Open the checkout left by an earlier `initialize`
    pub fn open_existing(&mut self) -> Result<(), Error> {
        if !self.has_checkout() {
            return Err(CatalogError::NotInitialized(self.checkout.clone()).into());
        }
        let repo = GitRepo::open(&self.checkout)?;
        self.repo = Some(repo.with_identity(self.config.author.clone()));
        Ok(())
    }

    pub fn repo(&self) -> Result<&GitRepo, CatalogError> {
        self.repo
            .as_ref()
            .ok_or_else(|| CatalogError::NotInitialized(self.checkout.clone()))
    }

    pub fn list_branches(&self) -> Result<Vec<String>, Error> {
        self.repo()?.get_all_branches()
    }

    pub fn current_branch(&self) -> Result<String, Error> {
        self.repo()?.get_current_branch()
    }

    /// Check out `name` and reload the catalog from its working tree
    pub fn switch_branch(&self, name: &str) -> Result<Catalog, Error> {
        self.repo()?.checkout_branch(name)?;
        tracing::info!(branch = %name, "switched workspace");
        self.load_catalog()
    }

    /// Create `name` from HEAD and switch to it
    pub fn create_branch(&self, name: &str) -> Result<Catalog, Error> {
        let name = name.trim();
        if !is_valid_branch_name(name) {
            return Err(CatalogError::InvalidBranchName(name.to_string()).into());
        }

        self.repo()?.create_and_checkout_branch(name)?;
        tracing::info!(branch = %name, "created workspace");
        self.load_catalog()
    }

    /// Stage `filepath` (relative to the checkout) and commit it
    ///
    /// Returns `None` when the file was already committed as is.
    pub fn commit(&self, filepath: &str, message: &str) -> Result<Option<String>, Error> {
        let repo = self.repo()?;
        repo.add(&[filepath])?;
        self.commit_staged(repo, filepath, message)
    }

    /// Stage the deletion of `filepath` and commit it
    pub fn commit_removal(&self, filepath: &str, message: &str) -> Result<Option<String>, Error> {
        let repo = self.repo()?;
        repo.remove(filepath)?;
        self.commit_staged(repo, filepath, message)
    }

    fn commit_staged(
        &self,
        repo: &GitRepo,
        filepath: &str,
        message: &str,
    ) -> Result<Option<String>, Error> {
        if !repo.has_staged_changes()? {
            tracing::debug!(%filepath, "nothing to commit");
            return Ok(None);
        }
        let commit = repo.commit(message)?;
        tracing::info!(%filepath, %commit, "committed");
        Ok(Some(commit))
    }

    /// Merge the active branch into the deployment branch
    ///
    /// On conflict the merge is abandoned: HEAD stays on the deployment
    /// branch with its content untouched and a [`CatalogError::MergeConflict`]
    /// is returned.
    pub fn merge_to_main(&self) -> Result<MergeReport, Error> {
        let repo = self.repo()?;
        let main = self.main_branch().to_string();
        let branch = repo.get_current_branch()?;

        if branch == main {
            tracing::debug!(%branch, "merge requested on the deployment branch");
            return Ok(MergeReport::AlreadyOnMain);
        }

        repo.checkout_branch(&main)?;
        let message = format!("Merge branch '{branch}' into {main}");

        let report = match repo.merge(&branch, Some(&message))? {
            MergeOutcome::UpToDate => MergeReport::UpToDate { branch },
            MergeOutcome::FastForward(commit) => MergeReport::FastForward { branch, commit },
            MergeOutcome::Merged(commit) => MergeReport::Merged { branch, commit },
            MergeOutcome::Conflicted(paths) => {
                tracing::warn!(%branch, target = %main, ?paths, "merge conflict");
                return Err(CatalogError::MergeConflict {
                    branch,
                    target: main,
                    paths,
                }
                .into());
            }
        };

        tracing::info!(?report, target = %main, "merged workspace");
        Ok(report)
    }

    /// Recent commits on the active branch, newest first
    pub fn history(&self, limit: usize) -> Result<Vec<CommitInfo>, Error> {
        self.repo()?.list_recent_commits(limit)
    }

    /// Relative path of the products directory inside the checkout
    pub fn products_relative(&self) -> &str {
        &self.config.catalog.dir
    }

    pub fn products_dir(&self) -> PathBuf {
        self.checkout.join(&self.config.catalog.dir)
    }

    pub fn loader(&self) -> CatalogLoader {
        CatalogLoader::new(self.products_dir(), self.config.catalog.extension.clone())
    }

    /// Rebuild the catalog from the working tree of the active branch
    pub fn load_catalog(&self) -> Result<Catalog, Error> {
        self.repo()?;
        self.loader().load()
    }
}
