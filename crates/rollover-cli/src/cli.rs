use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Moves overdue and incomplete Asana tasks to tomorrow, keeping their time of day
#[derive(Parser, Debug)]
#[command(name = "rollover", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "ROLLOVER_CONFIG", default_value = "rollover.toml", global = true)]
    pub config: PathBuf,

    /// Timezone that decides what "today" is (IANA name or common abbreviation)
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Environment selector: `test` targets the test project, anything else your workspace
    #[arg(long, global = true)]
    pub environment: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Move every due task to tomorrow
    Run(RunCommand),
    /// Show which tasks would move and where, without changing anything
    Preview(PreviewCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Compute and report the moves without updating any task
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    /// Also list fetched tasks that are not due
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "rollover",
            "run",
            "--dry-run",
            "--timezone",
            "EST",
            "--environment",
            "test",
        ])
        .unwrap();
        assert_eq!(cli.timezone.as_deref(), Some("EST"));
        assert_eq!(cli.environment.as_deref(), Some("test"));
        assert!(matches!(cli.command, Commands::Run(RunCommand { dry_run: true })));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["rollover"]).is_err());
    }
}
