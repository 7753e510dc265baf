use agrosmart::config::Config;
use agrosmart::paths;
use agrosmart::HistoryStore;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Write the whole history to `agromart-recommendations-<date>.csv`
pub fn execute(config: &Config, output: Option<PathBuf>) -> Result<i32> {
    let history = super::open_history(config);

    let dir = match output {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match write_export(&history, &dir, Utc::now().date_naive())? {
        Some(path) => {
            super::success("Data exported successfully");
            println!("   {} ({} records)", path.display(), history.len());
        }
        None => super::warning("No data to export"),
    }
    Ok(0)
}

/// Write the CSV for `date` into `dir`; `None` when there is nothing to write
fn write_export(history: &HistoryStore, dir: &Path, date: NaiveDate) -> Result<Option<PathBuf>> {
    if history.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(paths::export_file_name(date));
    let csv = history.to_csv().context("Failed to build CSV")?;
    fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}
