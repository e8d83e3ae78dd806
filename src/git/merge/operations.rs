use anyhow::{Context, Error};

use crate::git::repository::core::GitRepo;

/// Result of merging a branch into the current one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    UpToDate,
    FastForward(String),
    Merged(String),
    /// The merge was aborted; HEAD and the working tree are unchanged
    Conflicted(Vec<String>),
}

impl GitRepo {
    /// Merge a branch into the current branch
    pub fn merge(&self, branch_name: &str, message: Option<&str>) -> Result<MergeOutcome, Error> {
        let branch_ref = format!("refs/heads/{branch_name}");
        let target_commit = self
            .repo()
            .revparse_single(&branch_ref)
            .context(format!("Failed to find branch '{branch_name}'"))?
            .peel_to_commit()
            .context("Failed to get target commit")?;

        let head_commit = self
            .repo()
            .head()
            .context("Failed to get HEAD")?
            .peel_to_commit()
            .context("Failed to get current commit")?;

        if head_commit.id() == target_commit.id() {
            return Ok(MergeOutcome::UpToDate);
        }

        let merge_base = self
            .repo()
            .merge_base(head_commit.id(), target_commit.id())
            .context("Failed to find merge base")?;

        if merge_base == target_commit.id() {
            return Ok(MergeOutcome::UpToDate);
        }

        if merge_base == head_commit.id() {
            // Update the working tree against the old HEAD first, then move the branch
            if !self.is_bare() {
                self.repo()
                    .checkout_tree(target_commit.as_object(), None)
                    .context("Failed to checkout target tree")?;
            }

            let current_branch_name = self
                .get_current_branch()
                .context("Failed to get current branch")?;
            self.repo()
                .reference(
                    &format!("refs/heads/{current_branch_name}"),
                    target_commit.id(),
                    true,
                    "Fast-forward merge",
                )
                .context("Failed to update branch reference")?;

            return Ok(MergeOutcome::FastForward(target_commit.id().to_string()));
        }

        let signature = self
            .create_signature()
            .context("Failed to create signature")?;

        let annotated_commit = self
            .repo()
            .find_annotated_commit(target_commit.id())
            .context("Failed to create annotated commit")?;

        let mut merge_options = git2::MergeOptions::new();
        let mut checkout_opts = git2::build::CheckoutBuilder::new();
        checkout_opts.conflict_style_merge(true);

        self.repo()
            .merge(
                &[&annotated_commit],
                Some(&mut merge_options),
                Some(&mut checkout_opts),
            )
            .context("Failed to perform merge")?;

        let mut index = self
            .repo()
            .index()
            .context("Failed to get index after merge")?;

        if index.has_conflicts() {
            let mut paths = Vec::new();
            for conflict in index.conflicts().context("Failed to read conflicts")? {
                let conflict = conflict.context("Failed to read conflict entry")?;
                let entry = conflict.our.or(conflict.their).or(conflict.ancestor);
                if let Some(entry) = entry {
                    paths.push(String::from_utf8_lossy(&entry.path).into_owned());
                }
            }

            self.abort_merge(&head_commit)?;
            return Ok(MergeOutcome::Conflicted(paths));
        }

        let tree_id = index.write_tree().context("Failed to write merge tree")?;
        let tree = self
            .repo()
            .find_tree(tree_id)
            .context("Failed to find merge tree")?;

        let default_message = format!("Merge branch '{branch_name}'");
        let commit_message = message.unwrap_or(&default_message);

        let merge_commit_id = self
            .repo()
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                commit_message,
                &tree,
                &[&head_commit, &target_commit],
            )
            .context("Failed to create merge commit")?;

        self.repo()
            .cleanup_state()
            .context("Failed to cleanup merge state")?;

        Ok(MergeOutcome::Merged(merge_commit_id.to_string()))
    }

    /// Drop an in-progress merge and restore the index and working tree to `head`
    fn abort_merge(&self, head: &git2::Commit<'_>) -> Result<(), Error> {
        self.repo()
            .reset(head.as_object(), git2::ResetType::Hard, None)
            .context("Failed to reset after conflicted merge")?;
        self.repo()
            .cleanup_state()
            .context("Failed to cleanup merge state")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MergeOutcome;
    use crate::test_utils::{create_test_repo, RepoAssertions, RepoTestOperations};

    #[test]
    fn fast_forward_merge_works() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo) = create_test_repo();

        repo.add_file_and_commit("README.md", "initial", "Initial commit")?
            .create_and_checkout_branch("feature")?;
        repo.add_file_and_commit("feature.txt", "feature content", "Add feature")?
            .checkout_branch("main")?;
        repo.assert_file_not_exists("feature.txt");

        let outcome = repo.merge("feature", None)?;
        assert!(matches!(outcome, MergeOutcome::FastForward(_)));
        repo.assert_current_branch("main")
            .assert_file_exists("feature.txt")
            .assert_commit_messages(&["Add feature", "Initial commit"]);

        assert_eq!(repo.merge("feature", None)?, MergeOutcome::UpToDate);
        assert!(repo.merge("nonexistent", None).is_err());
        Ok(())
    }

    #[test]
    fn diverged_merge_creates_merge_commit() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo) = create_test_repo();

        repo.add_file_and_commit("README.md", "initial", "Initial commit")?
            .create_and_checkout_branch("feature")?;
        repo.add_file_and_commit("feature.txt", "feature", "Add feature")?
            .checkout_branch("main")?;
        repo.add_file_and_commit("hotfix.txt", "hotfix", "Add hotfix")?;

        let outcome = repo.merge("feature", None)?;
        assert!(matches!(outcome, MergeOutcome::Merged(_)));

        repo.assert_current_branch("main")
            .assert_file_exists("feature.txt")
            .assert_file_exists("hotfix.txt");
        assert_eq!(repo.list_commits()?[0].message, "Merge branch 'feature'");
        Ok(())
    }

    #[test]
    fn conflicting_merge_is_aborted() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo) = create_test_repo();

        repo.add_file_and_commit("shared.txt", "base\n", "Initial commit")?
            .create_and_checkout_branch("feature")?;
        repo.add_file_and_commit("shared.txt", "feature side\n", "Feature edit")?
            .add_file_and_commit("extra.txt", "extra\n", "Feature extra")?
            .checkout_branch("main")?;
        repo.add_file_and_commit("shared.txt", "main side\n", "Main edit")?;

        let outcome = repo.merge("feature", None)?;
        assert_eq!(
            outcome,
            MergeOutcome::Conflicted(vec!["shared.txt".to_string()])
        );

        repo.assert_current_branch("main")
            .assert_file_not_exists("extra.txt")
            .assert_commit_messages(&["Main edit", "Initial commit"]);
        let content = std::fs::read_to_string(repo.path().join("shared.txt"))?;
        assert_eq!(content, "main side\n");
        assert_eq!(repo.repo().state(), git2::RepositoryState::Clean);
        Ok(())
    }
}
