//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::{ExportFormat, GalleryConfig};
use crate::crewmate::CrewmateColor;
use crate::view::{CategoryFilter, SortKey, TimeRange, ViewParams};

/// Filtering and sorting shared by commands that work on the visible set.
#[derive(Debug, Clone, Default, Args)]
pub struct ViewArgs {
    /// Keep only `all`, `favorites`, or one color (e.g. `red`)
    #[arg(short, long, value_name = "FILTER")]
    pub filter: Option<CategoryFilter>,

    /// Case-insensitive name search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Creation window: 7d, 30d, 90d or all
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<TimeRange>,
}

impl ViewArgs {
    /// Build view parameters for browsing commands.
    ///
    /// Without `--range` nothing is hidden by creation time; only the sort
    /// falls back to the configured default.
    #[must_use]
    pub fn to_params(&self, defaults: &GalleryConfig) -> ViewParams {
        ViewParams {
            time_range: self.range.unwrap_or(TimeRange::All),
            filter: self.filter.clone().unwrap_or_default(),
            search: self.search.clone().unwrap_or_default(),
            sort: self.sort.map_or(defaults.default_sort, SortKey::from),
        }
    }

    /// Build view parameters for the analytics view, which also falls back
    /// to the configured time range.
    #[must_use]
    pub fn to_analytics_params(&self, defaults: &GalleryConfig) -> ViewParams {
        ViewParams {
            time_range: self.range.unwrap_or(defaults.default_time_range),
            ..self.to_params(defaults)
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// View options
    #[command(flatten)]
    pub view: ViewArgs,

    /// Maximum number of rows
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Display name (at least 2 characters)
    pub name: String,

    /// Speed from 0 to 100
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub speed: u8,

    /// One of the twelve crewmate colors
    #[arg(long, default_value = "red")]
    pub color: CrewmateColor,

    /// Free-text category
    #[arg(long)]
    pub category: Option<String>,

    /// Free-text success metric
    #[arg(long)]
    pub metric: Option<String>,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Crewmate id
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New speed
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub speed: Option<u8>,

    /// New color
    #[arg(long)]
    pub color: Option<CrewmateColor>,

    /// New category
    #[arg(long, conflicts_with = "clear_category")]
    pub category: Option<String>,

    /// Remove the category
    #[arg(long)]
    pub clear_category: bool,

    /// New success metric
    #[arg(long, conflicts_with = "clear_metric")]
    pub metric: Option<String>,

    /// Remove the success metric
    #[arg(long)]
    pub clear_metric: bool,
}

/// Bulk delete arguments.
#[derive(Debug, Args)]
pub struct BulkDeleteCommand {
    /// Ids to delete
    #[arg(required_unless_present = "visible")]
    pub ids: Vec<String>,

    /// Delete every crewmate matched by the view options instead
    #[arg(long)]
    pub visible: bool,

    /// View options
    #[command(flatten)]
    pub view: ViewArgs,

    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// View options
    #[command(flatten)]
    pub view: ViewArgs,

    /// Speed grouping to show
    #[arg(long, value_enum, default_value = "tiers")]
    pub buckets: BucketScheme,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Trend command arguments.
#[derive(Debug, Args)]
pub struct TrendCommand {
    /// Window: 7d, 30d, 90d or all (last year)
    #[arg(short, long, value_name = "RANGE")]
    pub range: Option<TimeRange>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// File format; defaults to the configured one
    #[arg(long, value_enum)]
    pub format: Option<ExportFormatArg>,

    /// Output directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Export only these ids instead of the visible set
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<String>,

    /// View options
    #[command(flatten)]
    pub view: ViewArgs,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// View options
    #[command(flatten)]
    pub view: ViewArgs,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Write settings as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace settings with a JSON export
    Import {
        /// Settings JSON file
        file: PathBuf,
    },
}

/// Sort argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Most recent first
    Newest,
    /// Oldest first
    Oldest,
    /// Alphabetical
    Name,
    /// Fastest first
    Speed,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::Name => Self::Name,
            SortArg::Speed => Self::Speed,
        }
    }
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// JSON records
    Json,
    /// CSV rows
    Csv,
    /// Both files
    Both,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => Self::Json,
            ExportFormatArg::Csv => Self::Csv,
            ExportFormatArg::Both => Self::Both,
        }
    }
}

/// Speed grouping shown by `stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BucketScheme {
    /// Slow / medium / fast
    #[default]
    Tiers,
    /// Five 20-point bands
    Bands,
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One name per line
    Plain,
    /// Aligned columns
    #[default]
    Table,
    /// JSON output
    Json,
}
