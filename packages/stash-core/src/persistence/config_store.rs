//! JSON config store with create-on-missing semantics.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::{Result, StashError};

use super::io_utils::{read_if_exists, write_atomic};
use super::merge::merge_json;

/// Loads and saves one JSON document per file.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: StoreConfig,
}

impl ConfigStore {
    /// Creates a config store with the given configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Loads `path` into `dest`.
    ///
    /// A missing file is created from the current value of `dest`, which is
    /// left unchanged. An existing file is merged over `dest`: fields absent
    /// from the file keep their current value. When the merged value does not
    /// decode (an enum whose variant differs from `dest`), the file is decoded
    /// on its own.
    ///
    /// # Errors
    /// `ConfigCorrupt` if the file cannot be read or does not fit the shape of
    /// `T`; `dest` is untouched in that case. Writing the default on first use
    /// fails with an I/O or `Encode` error.
    pub fn load<T>(&self, path: impl AsRef<Path>, dest: &mut T) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let path = path.as_ref();

        let bytes = match read_if_exists(path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::info!("File '{}' does not exist, creating blank", path.display());
                return self.save(path, &*dest);
            }
            Err(e) => return Err(corrupt(path, e)),
        };

        let source: serde_json::Value =
            serde_json::from_slice(&bytes).map_err(|e| corrupt(path, e))?;
        let mut merged = serde_json::to_value(&*dest).map_err(|e| StashError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        merge_json(&mut merged, source.clone());
        *dest = match serde_json::from_value(merged) {
            Ok(value) => value,
            // An overlay cannot switch enum variants; a complete file still decodes alone
            Err(merge_err) => {
                serde_json::from_value(source).map_err(|_| corrupt(path, merge_err))?
            }
        };

        tracing::debug!("Loaded config {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Serializes `value` as JSON and overwrites `path`.
    ///
    /// # Errors
    /// `Encode` if `value` cannot be serialized (nothing is written), or an
    /// I/O error from the write.
    pub fn save<T>(&self, path: impl AsRef<Path>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = path.as_ref();
        let encoded = if self.config.pretty_json {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
        .map_err(|e| StashError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        write_atomic(path, &encoded, &self.config)?;
        tracing::debug!("Saved config {} ({} bytes)", path.display(), encoded.len());
        Ok(())
    }
}

fn corrupt(path: &Path, reason: impl std::fmt::Display) -> StashError {
    StashError::ConfigCorrupt {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Loads a JSON config file with the default store configuration.
///
/// See [`ConfigStore::load`].
pub fn load_config<T>(path: impl AsRef<Path>, dest: &mut T) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    ConfigStore::default().load(path, dest)
}

/// Saves `value` as JSON with the default store configuration.
pub fn save_json<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    ConfigStore::default().save(path, value)
}
