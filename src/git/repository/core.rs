use std::path::Path;

use anyhow::{Context, Error};
use git2::Repository;

use super::signature::Identity;

#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub hash: String,
    pub message: String,
}

impl CommitInfo {
    /// First seven characters of the commit hash
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(7)]
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

pub struct GitRepo {
    repo: Repository,
    identity: Option<Identity>,
}

impl GitRepo {
    /// Open a git repository at the specified path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let repo = Repository::open(path).context("Cannot open git repo at given path")?;
        Ok(Self::from_repository(repo))
    }

    /// Initialize a new repository whose first commit lands on `main`
    #[cfg(test)]
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path_ref = path.as_ref();

        if Repository::open(path_ref).is_ok() {
            return Err(anyhow::anyhow!("Directory is already a git repository"));
        }

        let repo = Repository::init(path_ref).context("Failed to initialize git repository")?;

        // Unborn until the first commit
        repo.set_head("refs/heads/main")
            .context("Failed to set HEAD to main")?;

        Ok(Self::from_repository(repo))
    }

    /// Wrap an already opened repository, e.g. one produced by a clone
    pub(crate) fn from_repository(repo: Repository) -> Self {
        Self {
            repo,
            identity: None,
        }
    }

    /// Use a fixed author identity for commits instead of the git config
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Working directory, or the git dir of a bare repository
    #[cfg(test)]
    pub fn path(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Check if this is a bare repository
    pub fn is_bare(&self) -> bool {
        self.repo.is_bare()
    }

    pub(crate) fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Get access to the internal git2 Repository
    pub(crate) fn repo(&self) -> &Repository {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use git2::Repository;

    use crate::{git::GitRepo, test_utils::RepoAssertions};

    #[test]
    fn open_works() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path();
        Repository::init(path).unwrap();
        let repo = GitRepo::open(path).unwrap();

        assert_eq!(
            repo.path().canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn open_fails_in_non_git_folder() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let repo = GitRepo::open(temp_dir.path());

        assert!(repo.is_err());
    }

    #[test]
    fn init_points_head_at_main() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let repo = GitRepo::init(temp_dir.path()).unwrap();

        assert_eq!(
            repo.path().canonicalize().unwrap(),
            temp_dir.path().canonicalize().unwrap()
        );
        assert!(!repo.is_bare());

        // Nothing committed yet, so no branch exists
        assert_eq!(repo.get_all_branches().unwrap().len(), 0);
        repo.assert_current_branch("main");
    }

    #[test]
    fn init_fails_in_git_folder() {
        let temp_dir = assert_fs::TempDir::new().unwrap();
        let path = temp_dir.path();
        Repository::init(path).unwrap();

        assert!(GitRepo::init(path).is_err());
    }

    #[test]
    fn commit_info_short_hash_and_summary() {
        let info = super::CommitInfo {
            hash: "0123456789abcdef".to_string(),
            message: "Edit p1\n\nbody".to_string(),
        };

        assert_eq!(info.short_hash(), "0123456");
        assert_eq!(info.summary(), "Edit p1");
    }
}
