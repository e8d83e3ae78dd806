use crate::git::GitRepo;
use anyhow::{Context, Error};

/// Create a new temporary repository for testing with user config set up
#[cfg(test)]
pub fn create_test_repo() -> (assert_fs::TempDir, GitRepo) {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let path = temp_dir.path();
    let repo = GitRepo::init(path).unwrap();
    repo.set_user_config("Test User", "test@example.com")
        .unwrap();
    (temp_dir, repo)
}

/// Create a repository on `main` whose first commit holds the given catalog files
///
/// Returns the temp dir and the path to clone it from.
#[cfg(test)]
pub fn create_catalog_remote(files: &[(&str, &str)]) -> (assert_fs::TempDir, String) {
    let (temp_dir, repo) = create_test_repo();
    repo.add_file("README.md", "catalog\n").unwrap();
    let mut paths = vec!["README.md".to_string()];
    for (name, content) in files {
        let path = format!("products/{name}");
        repo.add_file(&path, content).unwrap();
        paths.push(path);
    }
    let pathspecs: Vec<&str> = paths.iter().map(String::as_str).collect();
    repo.add(&pathspecs).unwrap();
    repo.commit("Initial catalog").unwrap();

    let url = temp_dir.path().to_str().unwrap().to_string();
    (temp_dir, url)
}

/// Test-only trait that adds assertion methods to GitRepo
#[cfg(test)]
pub trait RepoAssertions {
    /// Assert that HEAD's symbolic target matches the expected value
    fn assert_head_symbolic_target(&self, expected_target: &str) -> &Self;

    /// Assert that the current branch matches the expected branch name
    fn assert_current_branch(&self, branch_name: &str) -> &Self;

    /// Assert that a file exists in the repository
    fn assert_file_exists(&self, filename: &str) -> &Self;

    /// Assert that a file does not exist in the repository
    fn assert_file_not_exists(&self, filename: &str) -> &Self;

    /// Assert that commit messages match the expected order (newest first)
    fn assert_commit_messages(&self, expected_messages: &[&str]) -> &Self;
}

/// Test-only trait that adds test helper operations to GitRepo
#[cfg(test)]
pub trait RepoTestOperations {
    /// Write a file, creating parent directories (fluent)
    fn add_file(&self, filename: &str, content: &str) -> Result<&Self, Error>;

    /// Write a file, stage it and commit in one operation (fluent)
    fn add_file_and_commit(
        &self,
        filename: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<&Self, Error>;

    /// Commit staged changes (fluent wrapper that ignores return value)
    fn commit_fluent(&self, message: &str) -> Result<&Self, Error>;
}

#[cfg(test)]
impl RepoAssertions for GitRepo {
    fn assert_head_symbolic_target(&self, expected_target: &str) -> &Self {
        match self.get_head_symbolic_target() {
            Ok(actual_target) => {
                if actual_target != expected_target {
                    panic!(
                        "HEAD symbolic target mismatch. Expected: '{expected_target}', Found: '{actual_target}'"
                    );
                }
            }
            Err(e) => {
                panic!("Failed to get HEAD symbolic target: {e}");
            }
        }
        self
    }

    fn assert_current_branch(&self, branch_name: &str) -> &Self {
        let expected_target = format!("refs/heads/{branch_name}");
        self.assert_head_symbolic_target(&expected_target);
        self
    }

    fn assert_file_exists(&self, filename: &str) -> &Self {
        let file_path = self.path().join(filename);
        if !file_path.exists() {
            panic!("Expected file '{filename}' to exist at path: {file_path:?}");
        }
        self
    }

    fn assert_file_not_exists(&self, filename: &str) -> &Self {
        let file_path = self.path().join(filename);
        if file_path.exists() {
            panic!("Expected file '{filename}' to not exist at path: {file_path:?}");
        }
        self
    }

    fn assert_commit_messages(&self, expected_messages: &[&str]) -> &Self {
        let commits = self.list_commits().unwrap_or_else(|_| Vec::new());

        if commits.len() != expected_messages.len() {
            panic!(
                "Expected {} commits, but found {}. Commits: {:?}",
                expected_messages.len(),
                commits.len(),
                commits.iter().map(|c| &c.message).collect::<Vec<_>>()
            );
        }

        for (i, (commit, expected)) in commits.iter().zip(expected_messages.iter()).enumerate() {
            if commit.message != *expected {
                panic!(
                    "Commit {} message mismatch. Expected: '{}', Found: '{}'",
                    i, expected, commit.message
                );
            }
        }

        self
    }
}

#[cfg(test)]
impl RepoTestOperations for GitRepo {
    fn add_file(&self, filename: &str, content: &str) -> Result<&Self, Error> {
        let file_path = self.path().join(filename);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create parent of '{filename}'"))?;
        }
        std::fs::write(&file_path, content).context(format!("Failed to write '{filename}'"))?;
        Ok(self)
    }

    fn add_file_and_commit(
        &self,
        filename: &str,
        content: &str,
        commit_message: &str,
    ) -> Result<&Self, Error> {
        self.add_file(filename, content)?
            .add(&[filename])?
            .commit_fluent(commit_message)?;

        Ok(self)
    }

    fn commit_fluent(&self, message: &str) -> Result<&Self, Error> {
        self.commit(message)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_catalog_remote, create_test_repo, RepoAssertions, RepoTestOperations};

    #[test]
    fn add_file_creates_parent_directories() -> Result<(), Box<dyn std::error::Error>> {
        let (_temp_dir, repo) = create_test_repo();

        repo.add_file_and_commit("products/p1.yaml", "id: p1\n", "Add p1")?
            .assert_file_exists("products/p1.yaml")
            .assert_commit_messages(&["Add p1"]);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "Expected 2 commits, but found 1")]
    fn assert_commit_messages_panics_on_count_mismatch() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_file_and_commit("a.txt", "a", "First").unwrap();

        repo.assert_commit_messages(&["Second", "First"]);
    }

    #[test]
    fn catalog_remote_has_products_on_main() {
        let (_temp_dir, url) = create_catalog_remote(&[("p1.yaml", "id: p1\nname: One\n")]);
        let repo = crate::git::GitRepo::open(&url).unwrap();

        repo.assert_current_branch("main")
            .assert_file_exists("products/p1.yaml")
            .assert_commit_messages(&["Initial catalog"]);
    }
}
