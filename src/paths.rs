//! Single source of truth for AgroSmart filesystem layout.
//!
//! This module defines WHERE data lives. It has no I/O, no validation,
//! no business logic.
//!
//! ```text
//! ~/.agrosmart/
//! ├── config.toml                  # User config
//! └── data/                        # Durable key-value storage
//!     └── agrosmartHistory.json    # Recommendation history (newest first)
//! ```

use std::path::{Path, PathBuf};

/// User's agrosmart home directory: `~/.agrosmart/`
pub fn agrosmart_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".agrosmart")
}

/// Config file: `~/.agrosmart/config.toml`
pub fn config_path() -> PathBuf {
    agrosmart_home().join("config.toml")
}

/// Default storage directory: `~/.agrosmart/data/`
pub fn default_data_dir() -> PathBuf {
    agrosmart_home().join("data")
}

/// File backing one storage key: `{data_dir}/{key}.json`
pub fn storage_file(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{key}.json"))
}

/// Staging file used while overwriting a key: `{data_dir}/{key}.json.tmp`
pub fn storage_staging_file(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{key}.json.tmp"))
}

/// Export file name for a given date: `agromart-recommendations-YYYY-MM-DD.csv`
pub fn export_file_name(date: chrono::NaiveDate) -> String {
    format!("agromart-recommendations-{}.csv", date.format("%Y-%m-%d"))
}
