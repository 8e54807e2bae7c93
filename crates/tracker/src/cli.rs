//! Clap derive structures for the `tracker` CLI.
//!
//! Defines the command tree, global flags, and the value enums used by
//! issue subcommands. Depends on clap only, so build.rs can include it.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// tracker -- command-line client for the issue tracker
#[derive(Debug, Parser)]
#[command(
    name = "tracker",
    version,
    about = "List, create, edit and delete issues from the command line",
    long_about = "A command-line client for the issue tracker REST API.\n\n\
        Talks to /issues and /health on the configured server. Use\n\
        `tracker issues browse` for an interactive session.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "TRACKER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "TRACKER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TRACKER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "TRACKER_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TRACKER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Issue field enums ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Open,
    #[value(alias = "in_progress")]
    InProgress,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortFieldArg {
    Id,
    Title,
    Status,
    Priority,
    Assignee,
    #[value(alias = "created_at")]
    CreatedAt,
    #[value(alias = "updated_at")]
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, view and edit issues
    #[command(alias = "i")]
    Issues(IssuesArgs),

    /// Check that the server is up
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ISSUES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub command: IssuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum IssuesCommand {
    /// List one page of issues
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one issue
    Get {
        /// Issue ID
        id: String,
    },

    /// Create an issue
    #[command(alias = "new")]
    Create(CreateArgs),

    /// Change fields of an issue; only changed fields are sent
    #[command(alias = "edit")]
    Update {
        /// Issue ID
        id: String,

        #[command(flatten)]
        fields: UpdateArgs,
    },

    /// Delete an issue
    #[command(alias = "rm")]
    Delete {
        /// Issue ID
        id: String,
    },

    /// Interactive session: page, filter, sort, open, edit and create
    Browse(BrowseArgs),
}

/// Query arguments for `issues list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Issues per page (overrides profile)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=500))]
    pub page_size: Option<u32>,

    /// Free-text search over title and description
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only issues with this status
    #[arg(long)]
    pub status: Option<StatusArg>,

    /// Only issues with this priority
    #[arg(long)]
    pub priority: Option<PriorityArg>,

    /// Only issues assigned to this person
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Sort column [default: updated-at]
    #[arg(long)]
    pub sort_by: Option<SortFieldArg>,

    /// Sort direction [default: asc with --sort-by, otherwise desc]
    #[arg(long)]
    pub sort_order: Option<SortOrderArg>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Issue title
    #[arg(long, short = 't')]
    pub title: String,

    /// Longer description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, default_value = "open")]
    pub status: StatusArg,

    #[arg(long, default_value = "medium")]
    pub priority: PriorityArg,

    /// Person responsible
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description (empty string clears it)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub status: Option<StatusArg>,

    #[arg(long)]
    pub priority: Option<PriorityArg>,

    /// New assignee (empty string clears it)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Issues per page (overrides profile)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=500))]
    pub page_size: Option<u32>,

    /// Open this issue directly instead of the list
    #[arg(long)]
    pub open: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
