//! Store configuration.

/// Options shared by the config, snapshot and tabular stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Pretty-print JSON config files
    pub pretty_json: bool,
    /// Sync the temporary file to disk before the atomic rename
    pub sync_writes: bool,
    /// Create missing parent directories when writing
    pub create_parent_dirs: bool,
    /// Field delimiter for tabular files
    pub csv_delimiter: u8,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            pretty_json: false,
            sync_writes: true,
            create_parent_dirs: true,
            csv_delimiter: b',',
        }
    }
}
