use anyhow::{Context, Error};
use git2::{Branch, BranchType};

use crate::git::repository::core::GitRepo;

/// Whether `name` is acceptable as a local branch name
pub fn is_valid_branch_name(name: &str) -> bool {
    !name.trim().is_empty() && Branch::name_is_valid(name).unwrap_or(false)
}

impl GitRepo {
    /// Local branch names, sorted
    pub fn get_all_branches(&self) -> Result<Vec<String>, Error> {
        let mut branches = Vec::new();

        let branch_iter = self.repo().branches(Some(BranchType::Local))?;

        for branch in branch_iter {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()? {
                branches.push(name.to_string());
            }
        }

        branches.sort();
        Ok(branches)
    }

    /// Create a new branch from the current HEAD and switch to it
    pub fn create_and_checkout_branch(&self, branch_name: &str) -> Result<(), Error> {
        match self.repo().head() {
            Ok(head) => {
                let target_commit = head.target().context("Failed to get HEAD target")?;

                let commit = self
                    .repo()
                    .find_commit(target_commit)
                    .context("Failed to find HEAD commit")?;

                self.repo()
                    .branch(branch_name, &commit, false)
                    .context(format!("Failed to create branch '{branch_name}'"))?;

                // Same commit as HEAD, so the working tree needs no checkout
                self.repo()
                    .set_head(&format!("refs/heads/{branch_name}"))
                    .context("Failed to set HEAD to new branch")?;
            }
            Err(_) => {
                // No commits yet: leave an unborn branch behind HEAD
                self.repo()
                    .set_head(&format!("refs/heads/{branch_name}"))
                    .context("Failed to set HEAD to new branch")?;
            }
        }

        Ok(())
    }

    pub fn checkout_branch(&self, branch_name: &str) -> Result<(), Error> {
        let branch_ref = format!("refs/heads/{branch_name}");
        let obj = self
            .repo()
            .revparse_single(&branch_ref)
            .context(format!("Branch '{branch_name}' not found"))?;

        if !self.is_bare() {
            self.repo()
                .checkout_tree(&obj, None)
                .context(format!("Failed to check out '{branch_name}'"))?;
        }

        self.repo().set_head(&branch_ref)?;

        Ok(())
    }

    pub fn get_head_symbolic_target(&self) -> Result<String, Error> {
        let head_ref = self
            .repo()
            .find_reference("HEAD")
            .context("Failed to find HEAD reference")?;

        match head_ref.symbolic_target() {
            Some(target) => Ok(target.to_string()),
            None => Err(anyhow::anyhow!("HEAD is not a symbolic reference")),
        }
    }

    /// Get the current branch name
    pub fn get_current_branch(&self) -> Result<String, Error> {
        let head_target = self
            .get_head_symbolic_target()
            .context("Failed to get current branch from HEAD")?;

        let branch_name = head_target
            .strip_prefix("refs/heads/")
            .ok_or_else(|| anyhow::anyhow!("HEAD is not pointing to a branch"))?;

        Ok(branch_name.to_string())
    }
}
