//! Command-line interface for crewmates.
//!
//! This module provides the CLI structure and command handlers for the
//! `crewctl` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, BucketScheme, BulkDeleteCommand, ConfigCommand, EditCommand, ExportCommand,
    ExportFormatArg, ListCommand, OutputFormat, ReportCommand, SortArg, StatsCommand,
    TrendCommand, ViewArgs,
};

use crate::logging::Verbosity;

/// crewctl - Build and browse your crew
///
/// Create crewmates, filter and sort the collection, see statistics and
/// achievements, and move crews in and out as JSON or CSV.
#[derive(Debug, Parser)]
#[command(name = "crewctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List crewmates
    List(ListCommand),

    /// Show one crewmate
    Show {
        /// Crewmate id
        id: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a crewmate
    Add(AddCommand),

    /// Edit a crewmate
    Edit(EditCommand),

    /// Toggle a crewmate's favorite flag
    Favorite {
        /// Crewmate id
        id: String,
    },

    /// Delete a crewmate
    Delete {
        /// Crewmate id
        id: String,
    },

    /// Delete several crewmates at once
    BulkDelete(BulkDeleteCommand),

    /// Show collection statistics
    Stats(StatsCommand),

    /// Show crewmates created per day
    Trend(TrendCommand),

    /// Show achievements, score and rank
    Achievements {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Export crewmates to JSON and/or CSV
    Export(ExportCommand),

    /// Import crewmates from a JSON file
    Import {
        /// JSON file containing an array of crewmates
        file: PathBuf,
    },

    /// Write a markdown crew report
    Report(ReportCommand),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
