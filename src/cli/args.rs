//! Defines the command-line arguments and subcommands for the tablefit CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tablefit",
    version,
    about = "Table-driven acceptance tests checked against row fixtures."
)]
pub struct FitArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// YAML configuration file (imports, page extensions, music catalog).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Namespace searched for short fixture names. Repeatable.
    #[arg(long = "import", global = true)]
    pub imports: Vec<String>,

    /// env_logger-style filter string (e.g. "info,tablefit=debug"); overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_filter: Option<String>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a qualified name into namespace and short name.
    Name {
        /// The dotted name, e.g. eg.music.Display.
        input: String,
        /// Print the parts as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run one page and show the checked tables.
    Run {
        /// The path to the page file to run.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Discover and run every page under a directory.
    Test {
        /// The directory (or single page) to run.
        #[arg(default_value = "pages")]
        path: PathBuf,
    },
    /// List all registered fixtures.
    ListFixtures,
}
