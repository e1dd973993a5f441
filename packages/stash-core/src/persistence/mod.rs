//! File persistence: JSON config store, CBOR snapshot store and CSV append log.
//!
//! Every operation opens, reads or rewrites its file and closes it before
//! returning. Nothing is cached between calls and nothing is retried.


pub mod config_store;
pub mod io_utils;
mod merge;
pub mod snapshot;
pub mod tabular;

pub use config_store::{load_config, save_json, ConfigStore};
pub use snapshot::{read_snapshot, save_snapshot, SnapshotStore};
pub use tabular::{append_csv, read_csv, Row, TabularLog};
