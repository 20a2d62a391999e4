//! Clap derive structures for the `gibmac` CLI.
//!
//! Only depends on clap so build.rs can pull it in for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gibmac -- macOS recovery image picker and downloader
#[derive(Debug, Parser)]
#[command(
    name = "gibmac",
    version,
    about = "Pick a Mac board ID and MLB, then download its macOS recovery image",
    long_about = "Interactive front end for OpenCore's macrecovery.py.\n\n\
        Run without a subcommand to open the menu. Targets come from\n\
        recovery_urls.txt, boards.json, or a board ID and MLB you type in.",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format for listings
    #[arg(
        long,
        short = 'o',
        env = "GIBMAC_OUTPUT",
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

    /// Directory holding boards.json, recovery_urls.txt and macrecovery.py
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Folder the recovery image is downloaded into
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Python interpreter used to run macrecovery.py
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub python: Option<String>,

    /// Request timeout in seconds for resource updates
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Recovery image family passed to `macrecovery.py -os`.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OsType {
    #[default]
    Default,
    Latest,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive menu (the default)
    Menu,

    /// Download or refresh boards.json, recovery_urls.txt and macrecovery.py
    #[command(alias = "install")]
    Update,

    /// List targets parsed from recovery_urls.txt
    #[command(alias = "ls")]
    Catalog(CatalogArgs),

    /// List board IDs from boards.json
    Boards(BoardsArgs),

    /// Download the recovery image for a board ID
    #[command(alias = "dl")]
    Download(DownloadArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Only show records under this release label (case-insensitive)
    #[arg(long, short = 'r')]
    pub release: Option<String>,
}

#[derive(Debug, Args)]
pub struct BoardsArgs {
    /// Only show boards mapped to this release (case-insensitive)
    #[arg(long, short = 'r')]
    pub release: Option<String>,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Board ID, with or without the "Mac-" prefix
    #[arg(long, short = 'b')]
    pub board: String,

    /// Logic board serial; padded with zeros to 17 characters
    #[arg(long, short = 'm')]
    pub mlb: Option<String>,

    /// Recovery image family
    #[arg(long = "os-type", default_value = "default")]
    pub os_type: OsType,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write a config file, prompting for each setting
    Init {
        /// Accept every default without prompting
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
