use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::git::{CloneOptions, Identity};

/// File picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "gitcat.yaml";

/// Overrides `storage.root`
pub const HOME_ENV: &str = "GITCAT_HOME";

pub const EXAMPLE_REMOTE_URL: &str =
    "https://github.com/teelbendio-arch/tmf-catalog-configurator.git";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Identity stamped on every commit the application makes
    #[serde(default)]
    pub author: Identity,
}

impl Config {
    /// Directory holding the working tree of the cloned catalog
    pub fn checkout_path(&self) -> PathBuf {
        self.storage.checkout_path()
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
    /// Namespace under `root`, one per catalog
    #[serde(default = "default_storage_name")]
    pub name: String,
    #[serde(default = "default_checkout")]
    pub checkout: String,
}

fn default_storage_root() -> PathBuf {
    PathBuf::from(".gitcat")
}

fn default_storage_name() -> String {
    "tmf-catalog".to_string()
}

fn default_checkout() -> String {
    "catalog".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            name: default_storage_name(),
            checkout: default_checkout(),
        }
    }
}

impl StorageConfig {
    pub fn checkout_path(&self) -> PathBuf {
        self.root.join(&self.name).join(&self.checkout)
    }
}

// ---------------------------------------------------------------------------
// Remote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_url")]
    pub url: String,
    /// Branch cloned from the remote; merges target it
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Shallow clone depth, `null` for full history
    #[serde(default = "default_depth")]
    pub depth: Option<u32>,
    #[serde(default = "default_single_branch")]
    pub single_branch: bool,
}

fn default_remote_url() -> String {
    EXAMPLE_REMOTE_URL.to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_depth() -> Option<u32> {
    Some(1)
}

fn default_single_branch() -> bool {
    true
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: default_remote_url(),
            branch: default_branch(),
            depth: default_depth(),
            single_branch: default_single_branch(),
        }
    }
}

impl RemoteConfig {
    pub fn clone_options(&self) -> CloneOptions {
        CloneOptions {
            branch: self.branch.clone(),
            depth: self.depth,
            single_branch: self.single_branch,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Products directory, relative to the checkout
    #[serde(default = "default_catalog_dir")]
    pub dir: String,
    /// Extension of record files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_catalog_dir() -> String {
    "products".to_string()
}

fn default_extension() -> String {
    "yaml".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_catalog_dir(),
            extension: default_extension(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}

/// Explicit path, else `gitcat.yaml` if present, else defaults; then environment overrides
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE)?,
        None => Config::default(),
    };

    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.is_empty() {
            config.storage.root = PathBuf::from(home);
        }
    }

    Ok(config)
}
