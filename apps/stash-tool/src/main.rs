//! CLI for the stash persistence helpers.
//!
//! Provides commands for:
//! - Bootstrapping and printing a JSON settings file
//! - Appending to and listing a CSV log
//! - Writing a snapshot and reading it back into a different struct

mod cli;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use stash_core::helpers::newest_first;
use stash_core::{ConfigStore, SnapshotStore, StoreConfig, TabularLog};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Settings written by `stash-tool config` on first use.
#[derive(Debug, Serialize, Deserialize)]
struct ToolSettings {
    data_dir: String,
    log_level: String,
    retention_days: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            log_level: "info".to_string(),
            retention_days: 30,
        }
    }
}

/// Record written by the snapshot demo.
#[derive(Debug, Serialize, Deserialize)]
struct Point {
    x: i64,
    y: i64,
    z: i64,
    name: String,
}

/// Narrower view read back from the same snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PointView {
    x: Option<i32>,
    y: Option<i32>,
    name: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = cli.store.to_config();
    run(cli.command, &config)
}

fn run(command: Commands, config: &StoreConfig) -> anyhow::Result<()> {
    match command {
        Commands::Config { path } => {
            let mut settings = ToolSettings::default();
            ConfigStore::new(config)
                .load(&path, &mut settings)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Commands::CsvAppend { path, fields } => {
            let total = TabularLog::new(config)
                .append(&path, &[fields])
                .with_context(|| format!("Failed to append to {}", path.display()))?;
            println!("{} rows in {}", total, path.display());
        }
        Commands::CsvShow { path, newest_first: reverse } => {
            let mut rows = TabularLog::new(config)
                .read_all(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if reverse {
                rows = newest_first(rows);
            }
            for row in rows {
                println!("{}", row.join(" | "));
            }
        }
        Commands::SnapshotDemo { path } => {
            let store = SnapshotStore::new(config);
            let point = Point {
                x: 3,
                y: 4,
                z: 5,
                name: "Pythagoras".to_string(),
            };
            store
                .save(&path, &point)
                .with_context(|| format!("Failed to save snapshot {}", path.display()))?;

            let mut view = PointView::default();
            store
                .read(&path, &mut view)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            tracing::info!("Read {:?} back from {}", view, path.display());
            println!("saved: {point:?}");
            println!("read:  {view:?}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_core::read_csv;
    use tempfile::tempdir;

    #[test]
    fn test_run_csv_append_then_show() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.csv");
        let config = StoreConfig::default();

        for fields in [vec!["a", "1"], vec!["b", "2"]] {
            run(
                Commands::CsvAppend {
                    path: path.clone(),
                    fields: fields.into_iter().map(String::from).collect(),
                },
                &config,
            )
            .unwrap();
        }
        run(
            Commands::CsvShow {
                path: path.clone(),
                newest_first: true,
            },
            &config,
        )
        .unwrap();

        assert_eq!(read_csv(&path).unwrap(), vec![vec!["a", "1"], vec!["b", "2"]]);
    }

    #[test]
    fn test_run_config_bootstraps_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");

        run(Commands::Config { path: path.clone() }, &StoreConfig::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"retention_days\":30"));
    }

    #[test]
    fn test_run_snapshot_demo() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("point.snap");

        run(Commands::SnapshotDemo { path: path.clone() }, &StoreConfig::default()).unwrap();

        let mut view = PointView::default();
        stash_core::read_snapshot(&path, &mut view).unwrap();
        assert_eq!((view.x, view.y, view.name.as_str()), (Some(3), Some(4), "Pythagoras"));
    }

    #[test]
    fn test_run_reports_corrupt_settings() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let err = run(Commands::Config { path }, &StoreConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("is corrupt. Please delete the file"));
    }
}
