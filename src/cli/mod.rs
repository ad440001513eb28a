pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::store::file::{DEFAULT_LAST_RUN_PATH, DEFAULT_SNAPSHOT_PATH};

pub const DEFAULT_CONFIG_PATH: &str = "feeds.json";

/// Runs the aggregation once. Every flag is optional.
#[derive(Parser, Debug)]
#[command(name = "newswire")]
#[command(about = "Aggregate syndication feeds into a ranked news snapshot", long_about = None)]
pub struct Cli {
    /// Feed list and tunables
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Where the snapshot is written
    #[arg(short, long, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub output: PathBuf,

    /// Where the last-run marker is written
    #[arg(long, default_value = DEFAULT_LAST_RUN_PATH)]
    pub last_run: PathBuf,

    /// Shell command to run when the snapshot changed
    #[arg(long, conflicts_with = "git")]
    pub publish_cmd: Option<String>,

    /// Commit and push the output files with git when the snapshot changed
    #[arg(long)]
    pub git: bool,

    /// Commit message used with --git
    #[arg(long, default_value = "chore: update news snapshot")]
    pub git_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["newswire"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("feeds.json"));
        assert_eq!(cli.output, PathBuf::from("news.json"));
        assert_eq!(cli.last_run, PathBuf::from(".last_run"));
        assert!(cli.publish_cmd.is_none());
        assert!(!cli.git);
    }

    #[test]
    fn test_publish_cmd_conflicts_with_git() {
        let result = Cli::try_parse_from(["newswire", "--git", "--publish-cmd", "true"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_git_with_message() {
        let cli =
            Cli::try_parse_from(["newswire", "--git", "--git-message", "update feed"]).unwrap();
        assert!(cli.git);
        assert_eq!(cli.git_message, "update feed");
    }
}
