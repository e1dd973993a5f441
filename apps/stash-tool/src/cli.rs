use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stash_core::StoreConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags mapped onto `StoreConfig`.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Pretty-print JSON files
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Skip fsync before renaming written files into place
    #[arg(long, global = true)]
    pub no_sync: bool,

    /// Do not create missing parent directories
    #[arg(long, global = true)]
    pub no_create_dirs: bool,

    /// CSV field delimiter (single ASCII character)
    #[arg(long, global = true, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

impl StoreArgs {
    pub fn to_config(&self) -> StoreConfig {
        StoreConfig {
            pretty_json: self.pretty,
            sync_writes: !self.no_sync,
            create_parent_dirs: !self.no_create_dirs,
            csv_delimiter: self.delimiter,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a settings file, creating it from defaults when missing
    Config {
        /// Path of the JSON settings file
        path: PathBuf,
    },

    /// Append one row to a CSV log
    CsvAppend {
        /// Path of the CSV file
        path: PathBuf,

        /// Fields of the new row
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Print every row of a CSV log
    CsvShow {
        /// Path of the CSV file
        path: PathBuf,

        /// Print the last appended row first
        #[arg(long)]
        newest_first: bool,
    },

    /// Save a record as a snapshot and read it back into a narrower type
    SnapshotDemo {
        /// Path of the snapshot file
        path: PathBuf,
    },
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() && *b != b'"' && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(format!(
            "delimiter must be one ASCII character other than a quote or newline, got {s:?}"
        )),
    }
}
