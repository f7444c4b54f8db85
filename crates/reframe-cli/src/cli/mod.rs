//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "reframe",
    bin_name = "reframe",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Framework toolkit for server-rendered apps",
    long_about = "Reframe builds apps out of pages and plugins. Plugins declared in \
                  reframe.toml contribute build hooks, browser configs and CLI commands.",
    after_help = "EXAMPLES:\n\
        \x20 reframe init my-app\n\
        \x20 reframe start --production\n\
        \x20 reframe config --format json\n\
        \x20 reframe aws-configure KEY SECRET us-east-1",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new app.
    #[command(
        about = "Create a new app",
        after_help = "EXAMPLES:\n\
            \x20 reframe init my-app\n\
            \x20 reframe init my-app --dry-run\n\
            \x20 reframe init my-app --yes --force"
    )]
    Init(InitArgs),

    /// Build and start the app.
    #[command(
        about = "Start the app",
        after_help = "EXAMPLES:\n\
            \x20 reframe start\n\
            \x20 reframe start ./my-app --production\n\
            \x20 reframe start --log"
    )]
    Start(StartArgs),

    /// Show the composed configuration of an app.
    #[command(
        about = "Show plugins, hooks, resources and commands",
        after_help = "EXAMPLES:\n\
            \x20 reframe config\n\
            \x20 reframe config ./my-app --format json"
    )]
    Config(ConfigArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 reframe completions bash > ~/.local/share/bash-completion/completions/reframe\n\
            \x20 reframe completions zsh  > ~/.zfunc/_reframe\n\
            \x20 reframe completions fish > ~/.config/fish/completions/reframe.fish"
    )]
    Completions(CompletionsArgs),

    /// A command contributed by a plugin of the current app.
    #[command(external_subcommand)]
    External(Vec<String>),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `reframe init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Name of the app; also the directory it is created in.
    #[arg(value_name = "PROJECT_NAME", help = "App name")]
    pub name: String,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Write into an existing directory.
    #[arg(long = "force", help = "Write into an existing directory")]
    pub force: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,
}

// ── start ─────────────────────────────────────────────────────────────────────

/// Arguments for `reframe start`.
#[derive(Debug, Args)]
pub struct StartArgs {
    /// Directory inside the app (default: current directory).
    #[arg(value_name = "DIR", help = "App directory")]
    pub dir: Option<PathBuf>,

    /// Build for production.
    #[arg(short = 'p', long = "production", help = "Production build")]
    pub production: bool,

    /// Show build details.
    #[arg(short = 'l', long = "log", help = "Log pages and build configurations")]
    pub log: bool,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Arguments for `reframe config`.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Directory inside the app (default: current directory).
    #[arg(value_name = "DIR", help = "App directory")]
    pub dir: Option<PathBuf>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ConfigFormat,
}

/// Output format for the `config` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// Human-readable sections.
    Table,
    /// JSON document.
    Json,
    /// TOML document.
    Toml,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `reframe completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
