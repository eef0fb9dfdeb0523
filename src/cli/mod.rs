//! CLI argument definitions and command dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::deck::DeckModel;

/// xpdeck - X-Plane dataref presets for Stream Deck keypads.
///
/// Loads a tree of YAML keysets, extracts dataref bindings, and pre-renders
/// device-ready key images. Use --robot or --format=json for
/// machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "xpdeck", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "XPDECK_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (show debug information)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory holding the keyset files and the icons/ folder
    #[arg(
        long,
        short = 'd',
        default_value = ".",
        global = true,
        env = "XPDECK_PRESETS_DIR"
    )]
    pub presets_dir: PathBuf,

    /// Target deck model (sets key count and image geometry)
    #[arg(long, short = 'm', default_value = "mk2", global = true, env = "XPDECK_MODEL")]
    pub model: DeckModel,

    /// Override the key count of the target model
    #[arg(long, global = true)]
    pub key_count: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the preset tree and verify all referenced icon files exist
    Check(CheckArgs),

    /// List the dataref bindings extracted from the preset tree
    Datarefs(DatarefsArgs),

    /// Pre-render all key images into a directory
    Render(RenderArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct CheckArgs {}

#[derive(Parser, Debug)]
pub struct DatarefsArgs {
    /// Only show bindings of one keyset
    #[arg(long, short = 'k')]
    pub keyset: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Output directory for the rendered images
    #[arg(value_name = "OUT_DIR")]
    pub out_dir: PathBuf,

    /// TrueType font for label overlays (only needed with --label)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Overlay each button's name on its images
    #[arg(long)]
    pub label: bool,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
