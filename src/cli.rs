use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gitcat")]
#[command(about = "Browse and edit a YAML product catalog kept in Git", version)]
pub struct Cli {
    /// Config file (defaults to ./gitcat.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive catalog browser (default)
    Browse {
        /// Remote to open without asking
        #[arg(long)]
        url: Option<String>,
    },
    /// Clone the catalog remote into local storage
    Clone {
        /// Remote URL (defaults to the configured one)
        url: Option<String>,
    },
    /// List workspaces
    Branches {},
    /// Switch workspace (prompts when no name is given)
    Switch { name: Option<String> },
    /// Create a workspace from the current one and switch to it
    NewBranch { name: Option<String> },
    /// Show the products of the current workspace
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product (prompts for missing fields)
    Add {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit the product stored in FILE (prompts when no field is given)
    Edit {
        file: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete the product stored in FILE
    Delete {
        file: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Merge the current workspace into main (deploy)
    Merge {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Recent commits of the current workspace
    Log {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Write the catalog as JSON
    Export {
        #[arg(default_value = "built-catalog.json")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    fn no_subcommand_means_browse() {
        let cli = Cli::try_parse_from(["gitcat"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_add_with_fields() {
        let cli = Cli::try_parse_from([
            "gitcat", "-vv", "add", "--id", "p1", "--name", "Fiber", "--status", "Draft",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Add {
                id, name, status, description,
            }) => {
                assert_eq!(id.as_deref(), Some("p1"));
                assert_eq!(name.as_deref(), Some("Fiber"));
                assert_eq!(status.as_deref(), Some("Draft"));
                assert_eq!(description, None);
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn export_defaults_to_built_catalog() {
        let cli = Cli::try_parse_from(["gitcat", "export"]).unwrap();

        match cli.command {
            Some(Commands::Export { path }) => {
                assert_eq!(path, std::path::PathBuf::from("built-catalog.json"))
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
