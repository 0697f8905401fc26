//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    client::ClientCommands, completions::CompletionsArgs, dashboard::DashboardArgs,
    file::FileCommands, project::ProjectCommands, seller::SellerCommands, shell::ShellArgs,
};

#[derive(Parser, Debug)]
#[command(name = "obra")]
#[command(author, version, about = "Project tracking for furniture and renovation work")]
#[command(long_about = "Manage clients, sellers, projects and project attachments. \
State lives in memory: one-shot commands run against the sample data, and `obra shell` \
keeps one store alive across many commands.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Client management
    #[command(subcommand)]
    Client(ClientCommands),

    /// Seller management
    #[command(subcommand)]
    Seller(SellerCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Project file attachments
    #[command(subcommand)]
    File(FileCommands),

    /// Show project counts and recent activity
    Dashboard(DashboardArgs),

    /// Start an interactive session over one store
    Shell(ShellArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (details for show, table for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Aligned columns
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["obra", "client", "list", "-f", "json", "-q"]).unwrap();
        assert_eq!(cli.global.format, OutputFormat::Json);
        assert!(cli.global.quiet);
        assert!(matches!(cli.command, Commands::Client(_)));
    }
}
