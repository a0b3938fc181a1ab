//! Command line interface for the dump splitter.

use std::path::PathBuf;

use clap::Parser;

use crate::split::{OutputEncoding, DEFAULT_GROUP_COLUMN, DEFAULT_ROWS_PER_FILE_LIMIT};

/// Environment variable consulted when the source path argument is omitted.
pub const SOURCE_PATH_ENV: &str = "CSV_SPLITTER_FILE_PATH";

/// Splits large CSV dumps into per-region files.
#[derive(Parser, Debug)]
#[command(name = "dumpsplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Splits a CSV dump into per-region files", long_about = None)]
pub struct Cli {
    /// Path to the source CSV dump
    #[arg(env = SOURCE_PATH_ENV)]
    pub source: PathBuf,

    /// Maximum data rows per generated file
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_ROWS_PER_FILE_LIMIT,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub limit: u64,

    /// Zero-based index of the region column
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_GROUP_COLUMN as u8,
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    pub column: u8,

    /// Directory that receives the generated files
    #[arg(short, long, default_value = "./")]
    pub output_dir: PathBuf,

    /// Write only the mobile-number column
    #[arg(short = 'i', long)]
    pub only_ids: bool,

    /// Repeat the header row in every generated file
    #[arg(short = 'H', long)]
    pub include_header: bool,

    /// Encoding of the generated files
    #[arg(long, value_enum, default_value_t = OutputEncoding::Utf8)]
    pub encoding: OutputEncoding,
}
