use std::path::Path;

use anyhow::{Context, Error};
use git2::{build::RepoBuilder, FetchOptions};

use crate::git::repository::core::GitRepo;

/// How much of the remote a clone fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    /// Branch to check out, and the only one fetched when `single_branch` is set
    pub branch: String,
    /// History depth; `None` fetches everything
    pub depth: Option<u32>,
    pub single_branch: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            depth: Some(1),
            single_branch: true,
        }
    }
}

/// Remotes libgit2 reaches through its local transport, which cannot fetch shallowly
pub fn is_local_remote(url: &str) -> bool {
    url.starts_with("file://") || (!url.contains("://") && Path::new(url).exists())
}

impl GitRepo {
    /// Clone `url` into `path` and check out `options.branch`
    pub fn clone_remote<P: AsRef<Path>>(
        url: &str,
        path: P,
        options: &CloneOptions,
    ) -> Result<Self, Error> {
        let mut fetch_options = FetchOptions::new();
        match options.depth {
            Some(depth) if !is_local_remote(url) => {
                let depth = i32::try_from(depth)
                    .context(format!("Clone depth {depth} is too large"))?;
                fetch_options.depth(depth);
            }
            Some(_) => {
                tracing::debug!(%url, "local remote, fetching full history");
            }
            None => {}
        }

        let mut builder = RepoBuilder::new();
        builder.branch(&options.branch).fetch_options(fetch_options);

        if options.single_branch {
            let branch = options.branch.clone();
            builder.remote_create(move |repo, name, url| {
                let refspec = format!("+refs/heads/{branch}:refs/remotes/{name}/{branch}");
                repo.remote_with_fetch(name, url, &refspec)
            });
        }

        let repo = builder
            .clone(url, path.as_ref())
            .context(format!("Failed to clone '{url}'"))?;

        Ok(Self::from_repository(repo))
    }

    /// URL of the `origin` remote, if the checkout has one
    pub fn origin_url(&self) -> Option<String> {
        self.repo()
            .find_remote("origin")
            .ok()
            .and_then(|remote| remote.url().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::{is_local_remote, CloneOptions};
    use crate::{
        git::GitRepo,
        test_utils::{create_test_repo, RepoAssertions, RepoTestOperations},
    };

    fn local_options() -> CloneOptions {
        CloneOptions {
            depth: None,
            ..CloneOptions::default()
        }
    }

    #[test]
    fn clone_fetches_only_the_requested_branch() -> Result<(), Box<dyn std::error::Error>> {
        let (source_dir, source) = create_test_repo();
        source
            .add_file_and_commit("README.md", "catalog", "Initial commit")?
            .create_and_checkout_branch("other")?;
        source.add_file_and_commit("other.txt", "other", "Other commit")?;

        let target_dir = assert_fs::TempDir::new()?;
        let url = source_dir.path().to_str().unwrap();
        let repo = GitRepo::clone_remote(url, target_dir.path(), &local_options())?;

        repo.assert_current_branch("main")
            .assert_file_exists("README.md")
            .assert_file_not_exists("other.txt");
        assert_eq!(repo.get_all_branches()?, vec!["main"]);
        assert!(repo.repo().find_reference("refs/remotes/origin/other").is_err());
        assert_eq!(repo.origin_url().as_deref(), Some(url));
        Ok(())
    }

    #[test]
    fn clone_of_missing_remote_fails() {
        let target_dir = assert_fs::TempDir::new().unwrap();
        let missing = target_dir.path().join("does-not-exist");

        let result = GitRepo::clone_remote(
            missing.to_str().unwrap(),
            target_dir.path().join("checkout"),
            &local_options(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn depth_beyond_i32_is_refused_before_fetching() {
        let target_dir = assert_fs::TempDir::new().unwrap();
        let checkout = target_dir.path().join("checkout");
        let options = CloneOptions {
            depth: Some(u32::MAX),
            ..CloneOptions::default()
        };

        let error = GitRepo::clone_remote("https://example.invalid/catalog.git", &checkout, &options)
            .err()
            .unwrap();

        assert!(format!("{error:#}").contains("too large"));
        assert!(!checkout.exists());
    }

    #[test]
    fn local_remote_detection() {
        let temp_dir = assert_fs::TempDir::new().unwrap();

        assert!(is_local_remote("file:///srv/catalog.git"));
        assert!(is_local_remote(temp_dir.path().to_str().unwrap()));
        assert!(!is_local_remote("https://example.com/catalog.git"));
        assert!(!is_local_remote("/definitely/not/here.git"));
    }
}
