//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organize free-form concepts into a hierarchy by textual containment
#[derive(Parser, Debug)]
#[command(name = "conceptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Additional config file (TOML)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Input shared by all tree commands.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// File with one concept per line, `-` for stdin
    #[arg(value_hint = ValueHint::FilePath)]
    pub source: PathBuf,

    /// Treat input as raw extractor output (capped at `max_concepts`)
    #[arg(short, long)]
    pub extracted: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest concepts and print the resulting hierarchy
    Tree {
        #[command(flatten)]
        input: SourceArgs,
    },

    /// Ingest concepts and print a summary of what was learned
    Ingest {
        #[command(flatten)]
        input: SourceArgs,
    },

    /// Print node count, root and depth
    Stats {
        #[command(flatten)]
        input: SourceArgs,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List concepts sharing a word with the query, as answer context
    Related {
        #[command(flatten)]
        input: SourceArgs,
        /// Free-text question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Look up one concept (case-insensitive) and show its position
    Find {
        #[command(flatten)]
        input: SourceArgs,
        /// Concept text
        text: String,
    },

    /// List concepts without sub-concepts
    Leaves {
        #[command(flatten)]
        input: SourceArgs,
    },

    /// Ingest concepts and check every structural invariant
    Verify {
        #[command(flatten)]
        input: SourceArgs,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}
