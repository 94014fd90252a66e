// CLI Layer
// ユーザー入力の受付とコマンドルーティング

pub mod command_context;
pub mod commands;

use crate::core::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bankflow - Banking Export ETL CLI
///
/// Decode, clean and load obfuscated banking exports.
#[derive(Parser, Debug)]
#[command(name = "bankflow")]
#[command(author = "Bankflow Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batch ETL pipeline for banking exports")]
#[command(long_about = "Bankflow - Banking Export ETL CLI

Turns obfuscated CSV exports into clean, typed tables and loads them
into a relational store with a lineage log.

Pipeline stages:
  • decode   Rename obfuscated headers using the column map
  • clean    Coerce types, derive flags and tag malformed values
  • load     Bulk-load cleaned tables and record lineage
  • schema   Generate DDL from the cleaned tables

Supported databases: PostgreSQL, MySQL, SQLite")]
#[command(propagate_version = true)]
#[command(after_help = "GETTING STARTED:
  1. Initialize a new project:     bankflow init
  2. Put raw CSVs and the map in:  data/raw/
  3. Run the whole pipeline:       bankflow run
  4. Inspect the result:           bankflow peek / bankflow verify

For detailed help on each command, use: bankflow <command> --help")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Target environment
    #[arg(short, long, global = true, value_name = "ENV", default_value = Config::DEFAULT_ENVIRONMENT)]
    pub env: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize a new pipeline project
    ///
    /// Writes the default configuration file and creates the data directories.
    ///
    /// EXAMPLES:
    ///   bankflow init
    ///   bankflow init --force
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Decode obfuscated CSV exports into named tables
    ///
    /// Reads the column map, renames every obfuscated header and adds a
    /// source_file lineage column.
    Decode,

    /// Clean decoded tables
    ///
    /// Coerces numeric and datetime columns, derives is_vip / is_blocked /
    /// is_flagged and tags malformed phone numbers and e-mail addresses.
    Clean,

    /// Load cleaned tables into the database
    ///
    /// Replaces each table and appends one lineage row per table.
    ///
    /// EXAMPLES:
    ///   bankflow load
    ///   bankflow load --env production
    Load,

    /// Generate a DDL script from the cleaned tables
    Schema {
        /// Output file (defaults to schema_file in the configuration)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the columns of every cleaned table
    Peek,

    /// Compare database tables with the cleaned tables
    Verify,

    /// Run decode, clean and load in sequence
    Run,
}
