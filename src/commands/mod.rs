pub mod branch;
pub mod browse;
pub mod clone;
pub mod log;
pub mod merge;
pub mod product;

use anyhow::{Context, Error};

use crate::config::Config;
use crate::session::Session;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Session on the checkout an earlier `clone` or `browse` left behind
pub fn open_session(config: &Config) -> Result<Session, Error> {
    let mut session = Session::new(config.clone());
    session.open_existing()?;
    Ok(session)
}

/// Clone or reopen the catalog on the blocking pool
pub async fn connect(config: Config, url: String) -> Result<Session, Error> {
    tokio::task::spawn_blocking(move || {
        let mut session = Session::new(config);
        session.initialize(&url)?;
        Ok::<_, Error>(session)
    })
    .await
    .context("Clone task failed")?
}
