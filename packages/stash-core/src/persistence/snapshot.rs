//! Snapshot store: one self-describing CBOR value per file.
//!
//! File layout:
//!
//! ```text
//! +---------+-------------------+------------------+
//! | "STSN"  | crc32 (u32, LE)   | CBOR payload     |
//! +---------+-------------------+------------------+
//! ```
//!
//! CBOR keeps field names next to the data, so a snapshot written from one
//! struct can be read into another that shares only some of its fields.

use std::path::Path;

use ciborium::Value as CborValue;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{Result, StashError};

use super::io_utils::write_atomic;
use super::merge::{merge_cbor, shares_any_field};

/// Magic number for snapshot files: "STSN" in ASCII
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"STSN";
/// Magic plus checksum
const HEADER_LEN: usize = 8;

/// Saves and reads whole-file snapshots.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    config: StoreConfig,
}

impl SnapshotStore {
    /// Creates a snapshot store with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Encodes `value` and overwrites `path` with it.
    ///
    /// # Errors
    /// `Encode` when `value` cannot be represented (the file is untouched), or
    /// an I/O error from the write.
    pub fn save<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = path.as_ref();

        let mut payload = Vec::new();
        ciborium::into_writer(value, &mut payload).map_err(|e| StashError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
        bytes.extend_from_slice(&SNAPSHOT_MAGIC);
        bytes.extend_from_slice(&compute_checksum(&payload).to_le_bytes());
        bytes.extend_from_slice(&payload);

        write_atomic(path, &bytes, &self.config)?;
        tracing::debug!("Saved snapshot {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Decodes the snapshot at `path` into `dest`.
    ///
    /// Fields the destination does not declare are ignored; fields the
    /// snapshot does not carry keep their current value in `dest`. A stored
    /// value that only decodes on its own (an enum in another variant than
    /// `dest`) replaces `dest` wholesale.
    ///
    /// # Errors
    /// `FileUnreadable` if the file cannot be read. `Decode` if the header is
    /// damaged, a field has an incompatible type, or a struct destination has
    /// no field in common with the snapshot. `dest` is untouched on error.
    pub fn read<T>(&self, path: impl AsRef<Path>, dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|source| StashError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let payload = split_payload(&bytes).map_err(|reason| decode_error::<T>(path, reason))?;

        let source: CborValue =
            ciborium::from_reader(payload).map_err(|e| decode_error::<T>(path, e))?;
        let mut merged = CborValue::serialized(&*dest).map_err(|e| StashError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let decoded = if shares_any_field(&merged, &source) {
            merge_cbor(&mut merged, source.clone());
            merged.deserialized::<T>().map_err(|e| e.to_string())
        } else {
            Err("no fields in common with the stored value".to_string())
        };
        // An overlay cannot switch enum variants; a complete value still decodes alone
        *dest = match decoded {
            Ok(value) => value,
            Err(reason) => source
                .deserialized()
                .map_err(|_| decode_error::<T>(path, reason))?,
        };

        tracing::debug!("Read snapshot {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Validates the header and returns the CBOR payload.
fn split_payload(bytes: &[u8]) -> std::result::Result<&[u8], String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("file too short ({} bytes)", bytes.len()));
    }
    let (header, payload) = bytes.split_at(HEADER_LEN);
    if header[..4] != SNAPSHOT_MAGIC {
        return Err("invalid snapshot magic".to_string());
    }
    let stored = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let computed = compute_checksum(payload);
    if stored != computed {
        return Err(format!(
            "checksum mismatch (stored {stored:#010x}, computed {computed:#010x})"
        ));
    }
    Ok(payload)
}

fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

fn decode_error<T>(path: &Path, reason: impl std::fmt::Display) -> StashError {
    StashError::Decode {
        path: path.to_path_buf(),
        type_name: std::any::type_name::<T>(),
        reason: reason.to_string(),
    }
}

/// Saves a snapshot with the default store configuration.
pub fn save_snapshot<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    SnapshotStore::default().save(path, value)
}

/// Reads a snapshot into `dest` with the default store configuration.
///
/// See [`SnapshotStore::read`].
pub fn read_snapshot<T>(path: impl AsRef<Path>, dest: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    SnapshotStore::default().read(path, dest)
}
