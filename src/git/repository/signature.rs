use anyhow::{Context, Error};
use git2::Signature;
use serde::{Deserialize, Serialize};

use super::core::GitRepo;

/// Author identity stamped on commits made by the application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_email")]
    pub email: String,
}

fn default_name() -> String {
    "UI".to_string()
}

fn default_email() -> String {
    "ui@tmf".to_string()
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: default_name(),
            email: default_email(),
        }
    }
}

impl GitRepo {
    /// Signature for new commits: the fixed identity if one was set, else git config
    ///
    /// Sessions always set an identity. Repositories built by the test helpers
    /// have none and sign with their local `user.name`/`user.email`.
    pub(crate) fn create_signature(&self) -> Result<Signature<'_>, Error> {
        if let Some(identity) = self.identity() {
            return Signature::now(&identity.name, &identity.email)
                .context("Failed to create signature from configured identity");
        }

        let config = self
            .repo()
            .config()
            .context("Failed to get repository config")?;

        let author_name = config.get_string("user.name").context(
            "Failed to get user.name from git config. Run: git config user.name \"Your Name\"",
        )?;

        let author_email = config.get_string("user.email")
            .context("Failed to get user.email from git config. Run: git config user.email \"your@email.com\"")?;

        Signature::now(&author_name, &author_email)
            .context("Failed to create signature with git config values")
    }

    /// Write user.name and user.email into the repository's local config
    #[cfg(test)]
    pub fn set_user_config(&self, name: &str, email: &str) -> Result<(), Error> {
        let mut config = self
            .repo()
            .config()
            .context("Failed to get repository config")?;

        config
            .set_str("user.name", name)
            .context("Failed to set user.name")?;
        config
            .set_str("user.email", email)
            .context("Failed to set user.email")?;

        Ok(())
    }
}
