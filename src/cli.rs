use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Provision Trello workspaces, boards and lists from a manifest",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Trello API key (overrides config.toml)
    #[arg(long, env = "TRELLO_API_KEY", global = true, hide_env_values = true)]
    pub key: Option<String>,

    /// Trello API token (overrides config.toml)
    #[arg(long, env = "TRELLO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the workspace tree described by a manifest
    Create(CreateArgs),

    /// Show provisioned workspaces from local state
    Show(ShowArgs),

    /// Rename provisioned boards to match a manifest
    Update(UpdateArgs),

    /// Delete a provisioned workspace and its boards
    Delete(DeleteArgs),

    /// Print the calls a create (or update, if provisioned) would issue
    Plan(ManifestArgs),

    /// Check a manifest without contacting Trello
    Validate(ManifestArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Manifest file (.toml or .json)
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Manifest file (.toml or .json)
    pub manifest: PathBuf,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Number of parallel invitation requests
    #[arg(short, long, default_value = "1")]
    pub jobs: usize,

    /// Create even if local state already tracks this workspace
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Manifest file (.toml or .json)
    pub manifest: PathBuf,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Workspace name (all workspaces if omitted)
    pub workspace: Option<String>,

    /// Compare against a manifest
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Workspace name as shown by `trellis show`
    #[arg(required_unless_present = "manifest", conflicts_with = "manifest")]
    pub workspace: Option<String>,

    /// Take the workspace name from a manifest
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Dry run - show what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_delete_needs_a_target() {
        assert!(Cli::try_parse_from(["trellis", "delete"]).is_err());
        assert!(Cli::try_parse_from(["trellis", "delete", "Acme", "-m", "acme.toml"]).is_err());

        let cli = Cli::try_parse_from(["trellis", "delete", "-m", "acme.toml", "--yes"]).unwrap();
        match cli.command {
            Command::Delete(args) => {
                assert!(args.yes);
                assert_eq!(args.manifest, Some(PathBuf::from("acme.toml")));
            }
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn test_create_flags() {
        let cli = Cli::try_parse_from([
            "trellis", "-vv", "create", "acme.toml", "-j", "4", "-n",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Create(args) => {
                assert_eq!(args.jobs, 4);
                assert!(args.dry_run);
                assert!(!args.force);
            }
            _ => panic!("expected create"),
        }
    }
}
