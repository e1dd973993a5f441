//! File-backed persistence helpers.
//!
//! Provides a JSON config store that creates missing files from defaults,
//! a CBOR snapshot store that decodes across struct shapes, an append-only
//! CSV log, and a few standalone helpers and a session lookup.

pub mod config;
pub mod error;
pub mod helpers;
pub mod persistence;
pub mod session;

pub use config::StoreConfig;
pub use error::{Result, StashError};
pub use persistence::{
    append_csv, load_config, read_csv, read_snapshot, save_json, save_snapshot, ConfigStore, Row,
    SnapshotStore, TabularLog,
};
