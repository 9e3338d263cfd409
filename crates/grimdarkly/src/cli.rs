//! Clap derive structures for the `grimdarkly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// grimdarkly -- search the wargame datasheet catalog
#[derive(Debug, Parser)]
#[command(
    name = "grimdarkly",
    version,
    about = "Search units, weapons and factions of the wargame catalog",
    long_about = "Query the Grimdarkly catalog API from the command line.\n\n\
        Filters combine with AND; keywords must all match. Every search can be\n\
        expressed as a shareable query string and replayed with --query.",
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
    /// Catalog API root (overrides config)
    #[arg(long, short = 'a', env = "GRIMDARKLY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "GRIMDARKLY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, env = "GRIMDARKLY_COLOR", global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GRIMDARKLY_TIMEOUT", global = true)]
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
    /// Plain text, one name per line (scripting)
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse factions and sub-factions
    #[command(alias = "f")]
    Factions(FactionsArgs),

    /// Search and inspect unit datasheets
    #[command(alias = "u")]
    Units(UnitsArgs),

    /// Search and inspect weapon profiles
    #[command(alias = "w")]
    Weapons(WeaponsArgs),

    /// View or change persisted preferences
    Prefs(PrefsArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Factions ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FactionsArgs {
    #[command(subcommand)]
    pub command: FactionsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FactionsCommand {
    /// List factions, including built-in sub-factions when variants are shown
    #[command(alias = "ls")]
    List {
        /// Hide sub-factions regardless of the saved preference
        #[arg(long)]
        no_variants: bool,
    },

    /// Show one faction by id
    Get { id: u32 },
}

// ── Shared search arguments ──────────────────────────────────────────

/// Flags shared by unit and weapon searches.
#[derive(Debug, Args)]
pub struct SearchOpts {
    /// Shareable query string to start from, e.g. "?faction=Orks&minToughness=5"
    #[arg(long)]
    pub query: Option<String>,

    /// Keyword that every result must carry (repeatable, comma-separated ok)
    #[arg(long, short = 'k')]
    pub keyword: Vec<String>,

    /// Sort criterion
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Show every weapon and keyword instead of the first few
    #[arg(long, short = 'e')]
    pub expand: bool,

    /// Print the shareable query string after the results
    #[arg(long)]
    pub share: bool,
}

// ── Units ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UnitsArgs {
    #[command(subcommand)]
    pub command: UnitsCommand,
}

#[derive(Debug, Subcommand)]
pub enum UnitsCommand {
    /// Search unit datasheets
    #[command(alias = "s")]
    Search(UnitSearchArgs),

    /// Show one unit by id or exact name
    Get {
        /// Numeric id or full unit name
        unit: String,

        /// Show every list entry and full ability text
        #[arg(long, short = 'e')]
        expand: bool,
    },
}

#[derive(Debug, Args)]
pub struct UnitSearchArgs {
    /// Name contains
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Faction name
    #[arg(long, short = 'f')]
    pub faction: Option<String>,

    /// Unit type (CHARACTER, BATTLELINE, OTHER)
    #[arg(long = "type", short = 't')]
    pub unit_type: Option<String>,

    #[arg(long)]
    pub min_toughness: Option<String>,
    #[arg(long)]
    pub max_toughness: Option<String>,
    #[arg(long)]
    pub min_wounds: Option<String>,
    #[arg(long)]
    pub max_wounds: Option<String>,
    #[arg(long)]
    pub min_movement: Option<String>,
    #[arg(long)]
    pub max_movement: Option<String>,

    #[command(flatten)]
    pub opts: SearchOpts,
}

// ── Weapons ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WeaponsArgs {
    #[command(subcommand)]
    pub command: WeaponsCommand,
}

#[derive(Debug, Subcommand)]
pub enum WeaponsCommand {
    /// Search weapon profiles
    #[command(alias = "s")]
    Search(WeaponSearchArgs),

    /// Show one weapon by id or exact name
    Get {
        /// Numeric id or full weapon name
        weapon: String,

        /// Show every unit that carries it
        #[arg(long, short = 'e')]
        expand: bool,
    },
}

#[derive(Debug, Args)]
pub struct WeaponSearchArgs {
    /// Name contains
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Weapon type (MELEE, RANGED)
    #[arg(long = "type", short = 't')]
    pub weapon_type: Option<String>,

    #[arg(long)]
    pub min_range: Option<String>,
    #[arg(long)]
    pub max_range: Option<String>,

    /// Armor penetration, e.g. -2
    #[arg(long, allow_hyphen_values = true)]
    pub ap: Option<String>,

    /// Attacks characteristic, e.g. D6
    #[arg(long)]
    pub attacks: Option<String>,

    #[command(flatten)]
    pub opts: SearchOpts,
}

// ── Preferences ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub command: PrefsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommand {
    /// Show the saved preferences
    Show,

    /// Show or hide sub-faction (variant) content
    Variants { state: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value (api_url, defaults.output, defaults.color, defaults.timeout)
    Set { key: String, value: String },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
