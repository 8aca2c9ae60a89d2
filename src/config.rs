//! Configuration types for wordshard
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Validated runtime configuration for indexing runs
//!
//! The shard data directory is configuration, not protocol: every command
//! resolves the same five shard files under it.

use crate::error::ConfigError;
use crate::search::DEFAULT_RESULT_LIMIT;
use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// Default eligible extension for corpus files
const DEFAULT_EXTENSION: &str = ".txt";

/// Sharded full-text index over SQLite
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordshard",
    version,
    about = "Sharded full-text index over SQLite",
    long_about = "Builds and queries a full-text inverted index whose storage is split across\n\
                  five SQLite databases: a document store, an occurrence store, and three word\n\
                  stores partitioned by word length.",
    after_help = "EXAMPLES:\n    \
        wordshard index ./corpus\n    \
        wordshard index ./mail --ext .txt --ext .eml --exclude '\\.snapshot'\n    \
        wordshard search hello world\n    \
        wordshard search            # interactive loop\n    \
        wordshard schema recreate"
)]
pub struct CliArgs {
    /// Directory holding one SQLite file per shard
    #[arg(
        short = 's',
        long,
        global = true,
        default_value = "shards",
        value_name = "DIR"
    )]
    pub data_dir: PathBuf,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose output (debug-level logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Recreate the schema and index a directory tree
    Index {
        /// Root of the corpus to index
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Eligible file extension (can be repeated; default .txt)
        #[arg(long = "ext", value_name = "EXT", action = clap::ArgAction::Append)]
        extensions: Vec<String>,

        /// Skip paths matching pattern (can be repeated)
        #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
        exclude_patterns: Vec<String>,

        /// Index into the existing schema instead of resetting it first.
        /// Ids restart at 1 each run, so this only makes sense on shards
        /// that are empty for other reasons.
        #[arg(long)]
        keep_schema: bool,
    },

    /// Search the index; with no terms, start an interactive loop
    Search {
        /// Search terms
        #[arg(value_name = "TERM")]
        terms: Vec<String>,

        /// Maximum number of results to resolve
        #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_LIMIT, value_name = "NUM")]
        limit: usize,
    },

    /// Manage the schema on every shard
    Schema {
        #[arg(value_enum, value_name = "ACTION")]
        action: SchemaAction,
    },

    /// Serve the storage boundary over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
}

/// Schema lifecycle actions
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Drop and recreate all tables on every shard
    Recreate,
    /// Drop all tables on every shard
    Drop,
}

/// Validated configuration for one indexing run
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Corpus root directory
    pub root: PathBuf,

    /// Shard data directory
    pub data_dir: PathBuf,

    /// Normalized eligible extensions, each with a leading dot
    pub extensions: Vec<String>,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Reset + recreate the schema before indexing
    pub reset_schema: bool,

    /// Show the progress display
    pub show_progress: bool,
}

impl IndexConfig {
    /// Validate CLI arguments for the `index` subcommand
    pub fn new(
        root: PathBuf,
        data_dir: PathBuf,
        extensions: Vec<String>,
        exclude_patterns: Vec<String>,
        keep_schema: bool,
        quiet: bool,
    ) -> Result<Self, ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::InvalidRoot {
                path: root,
                reason: "not a directory".into(),
            });
        }

        let extensions = normalize_extensions(extensions)?;

        let exclude_patterns = exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(parent) = data_dir.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                let reason = format!("parent directory '{}' does not exist", parent.display());
                return Err(ConfigError::InvalidDataDir {
                    path: data_dir,
                    reason,
                });
            }
        }

        Ok(Self {
            root,
            data_dir,
            extensions,
            exclude_patterns,
            reset_schema: !keep_schema,
            show_progress: !quiet,
        })
    }
}

/// Validate the search result limit
pub fn validate_limit(limit: usize) -> Result<usize, ConfigError> {
    if limit == 0 {
        return Err(ConfigError::InvalidLimit { limit });
    }
    Ok(limit)
}

/// Normalize extensions to the dotted form, defaulting to `.txt`
fn normalize_extensions(extensions: Vec<String>) -> Result<Vec<String>, ConfigError> {
    let mut normalized: Vec<String> = extensions
        .into_iter()
        .map(|ext| ext.trim().to_string())
        .filter(|ext| !ext.is_empty() && *ext != ".")
        .map(|ext| {
            if ext.starts_with('.') {
                ext
            } else {
                format!(".{}", ext)
            }
        })
        .collect();

    if normalized.is_empty() {
        normalized.push(DEFAULT_EXTENSION.to_string());
    }
    normalized.dedup();
    Ok(normalized)
}
